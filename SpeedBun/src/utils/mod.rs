//! Utility functions

pub mod hash;

pub use hash::bin_hash;
