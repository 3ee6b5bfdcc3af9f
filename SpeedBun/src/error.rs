//! Error types for `SpeedBun`

use thiserror::Error;

/// The error type for `SpeedBun` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Cursor Errors ====================
    /// A read would run past the end of the buffer.
    #[error("read of {requested} bytes at position {position} exceeds buffer of {length} bytes")]
    OutOfRange {
        /// Cursor position at the time of the read.
        position: usize,
        /// Number of bytes requested.
        requested: usize,
        /// Total length of the buffer.
        length: usize,
    },

    // ==================== Codec Errors ====================
    /// The data does not start with a known compression header.
    #[error("unknown compression format (signature {signature:02X?})")]
    UnknownFormat {
        /// The first bytes of the input (up to four).
        signature: Vec<u8>,
    },

    /// The codec dispatcher cannot decode the given signature.
    #[error("unsupported compression format: {fourcc}")]
    UnsupportedFormat {
        /// Printable form of the FourCC found in the header.
        fourcc: String,
    },

    /// The requested operation exists in the format but is not implemented.
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Compressed data is corrupt or truncated.
    #[error("{codec} decompression failed: {message}")]
    DecompressionFailed {
        /// Codec name (`JLZ`, `OLDLZ`, ...).
        codec: &'static str,
        /// Description of the failure.
        message: String,
    },

    // ==================== Chunk Stream Errors ====================
    /// A chunk header or body does not fit in the remaining stream.
    #[error("malformed chunk at offset 0x{offset:X}: {message}")]
    MalformedChunk {
        /// Absolute offset of the chunk in the logical stream.
        offset: usize,
        /// Description of the inconsistency.
        message: String,
    },

    /// A reader was handed a chunk with a different id than it decodes.
    #[error("chunk id mismatch: expected 0x{expected:08X}, found 0x{found:08X}")]
    ChunkIdMismatch {
        /// The id the reader decodes.
        expected: u32,
        /// The id found in the chunk header.
        found: u32,
    },

    /// A chunk's declared length disagrees with the bytes available to it.
    #[error("chunk length mismatch: header declares {declared} bytes, {available} available")]
    ChunkLengthMismatch {
        /// Length from the chunk header.
        declared: i64,
        /// Body bytes actually available.
        available: usize,
    },

    /// Compressed super-chunks are nested deeper than allowed.
    #[error("compressed chunks nested deeper than {max_depth} levels")]
    NestingTooDeep {
        /// The configured maximum depth.
        max_depth: usize,
    },

    // ==================== Model Errors ====================
    /// A track section name is not of the form `A0`..`Z99`.
    #[error("invalid section name: {0:?}")]
    InvalidSectionName(String),

    /// A track section id is outside `100..=2699`.
    #[error("invalid section id: {0}")]
    InvalidSectionId(u16),
}

/// A specialized Result type for `SpeedBun` operations.
pub type Result<T> = std::result::Result<T, Error>;
