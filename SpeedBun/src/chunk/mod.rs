//! Chunk streams
//!
//! A `.BUN` stream is a flat sequence of chunks, each an 8-byte
//! `{ id: u32, length: i32 }` header followed by `length` bytes. Id 0 is
//! padding. A `JDLZ` header in place of a chunk header marks a compressed
//! super-chunk whose decompressed content is another chunk stream.

mod deserializer;
mod header;
mod inspect;
mod link;
mod markers;
mod reader;
mod walker;

pub use deserializer::{ChunkDeserializer, DeserializeOptions, LoadHandle};
pub use header::{
    ChunkHeader, PADDING_ID, SUPER_CHUNK_ID, SUPER_CHUNK_LENGTH, SUPER_CHUNK_SIZE_OFFSET,
};
pub use inspect::{ChunkInfo, ChunkKind, inspect_chunks};
pub use link::link_sections;
pub use markers::SegmentMarkers;
pub use reader::{ChunkReader, RawChunkReader, ReaderRegistry};
pub use walker::{ChunkBody, ChunkEntry, ChunkWalker};
