//! Binary reading and writing primitives
//!
//! All chunk and codec parsing goes through [`BinaryCursor`].

mod cursor;
mod record;
mod writer;

pub use cursor::{ALIGNMENT_FILLER, BinaryCursor};
pub use record::BinaryRecord;
pub use writer::ChunkWriteExt;
