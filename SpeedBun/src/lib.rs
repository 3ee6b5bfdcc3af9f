//! # SpeedBun
//!
//! A pure-Rust library for reading the chunk containers (`.BUN`, `.BIN`) of
//! classic racing game assets.
//!
//! ## Supported Formats
//!
//! - **Chunk streams** - Tagged, length-prefixed chunks, padding and nested
//!   compressed super-chunks, assembled from one or more files
//! - **JDLZ** - LZ77 variant, compression and decompression
//! - **COMP** - Legacy LZ, decompression and stored output
//! - **RAWW** - Stored data
//! - **HUFF** - Detection only
//!
//! ## Quick Start
//!
//! ### Decoding a Chunk Stream
//!
//! ```no_run
//! use std::sync::Arc;
//! use speedbun::chunk::{ChunkDeserializer, RawChunkReader, ReaderRegistry};
//!
//! let registry = ReaderRegistry::new().with_reader(RawChunkReader::new(0x0003_4110));
//! let mut deserializer = ChunkDeserializer::new(Arc::new(registry));
//! deserializer.add_data_from_file("STREAML4RA.BUN");
//! deserializer.add_data_from_file("L4RA.BUN");
//!
//! for result in deserializer.start()? {
//!     println!("0x{:08X}: {}", result.chunk_id, result.value.kind());
//! }
//! # Ok::<(), speedbun::Error>(())
//! ```
//!
//! ### Compressing Data
//!
//! ```
//! use speedbun::compression::{compress, decompress, Algorithm};
//!
//! let data = b"section section section section".repeat(8);
//! let packed = compress(&data, Some(Algorithm::Jlz))?;
//! assert_eq!(decompress(&packed)?, data);
//! # Ok::<(), speedbun::Error>(())
//! ```
//!
//! ### Using the Prelude
//!
//! ```
//! use speedbun::prelude::*;
//!
//! // Now you have access to:
//! // - ChunkDeserializer, ReaderRegistry, ChunkReader, BinaryCursor
//! // - compress, decompress, Algorithm
//! // - TrackSection, Scenery, VisibleSection, DecodedValue
//! // - Error, Result, and more
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `speedbun` command-line binary

pub mod binary;
pub mod chunk;
pub mod compression;
pub mod error;
pub mod model;
pub mod utils;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};

    pub use crate::binary::{BinaryCursor, BinaryRecord, ChunkWriteExt};

    pub use crate::chunk::{
        ChunkDeserializer, ChunkHeader, ChunkInfo, ChunkKind, ChunkReader, DeserializeOptions,
        LoadHandle, RawChunkReader, ReaderRegistry, SegmentMarkers, inspect_chunks,
        link_sections,
    };

    pub use crate::compression::{
        Algorithm, CompressionHeader, JlzOptions, compress, compress_with_options, decompress,
    };

    pub use crate::model::{
        ChunkResult, CollisionVolume, DecodedValue, Region, Scenery, SceneryInfo,
        SceneryInstance, SolidObjectList, TexturePack, TrackSection, VisibleSection,
    };

    pub use crate::utils::bin_hash;
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
