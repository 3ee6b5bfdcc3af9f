use serde::Serialize;

use crate::binary::BinaryCursor;
use crate::error::{Error, Result};

/// Id of padding chunks. Their body is skipped unread.
pub const PADDING_ID: u32 = 0;

/// Id of an embedded compressed super-chunk (`JDLZ` as a little-endian word).
pub const SUPER_CHUNK_ID: u32 = 0x5A4C444A;

/// Length field value that marks a `JDLZ` chunk as a super-chunk. This is the
/// codec's version and header-size bytes, so a bare JDLZ blob reads as one.
pub const SUPER_CHUNK_LENGTH: i32 = 0x00001002;

/// Offset of the compressed-size word inside a super-chunk.
pub const SUPER_CHUNK_SIZE_OFFSET: usize = 12;

/// The `{ id, length }` pair in front of every chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChunkHeader {
    pub id: u32,
    /// Body length, excluding this header.
    pub length: i32,
}

impl ChunkHeader {
    pub const SIZE: usize = 8;

    pub fn read(cursor: &mut BinaryCursor<'_>) -> Result<Self> {
        let id = cursor.read_u32()?;
        let length = cursor.read_i32()?;
        Ok(Self { id, length })
    }

    #[must_use]
    pub fn is_padding(&self) -> bool {
        self.id == PADDING_ID
    }

    #[must_use]
    pub fn is_super_chunk(&self) -> bool {
        self.id == SUPER_CHUNK_ID && self.length == SUPER_CHUNK_LENGTH
    }

    /// Body length, or `None` if the length field is negative.
    #[must_use]
    pub fn body_len(&self) -> Option<usize> {
        usize::try_from(self.length).ok()
    }

    /// Read a header and check it against what a reader expects.
    ///
    /// # Errors
    /// Returns [`Error::ChunkIdMismatch`] if the id differs, or
    /// [`Error::ChunkLengthMismatch`] if the length is negative or longer than
    /// the bytes left after the header.
    pub fn expect(cursor: &mut BinaryCursor<'_>, id: u32) -> Result<Self> {
        let header = Self::read(cursor)?;

        if header.id != id {
            return Err(Error::ChunkIdMismatch {
                expected: id,
                found: header.id,
            });
        }

        match header.body_len() {
            Some(length) if length <= cursor.remaining() => Ok(header),
            _ => Err(Error::ChunkLengthMismatch {
                declared: i64::from(header.length),
                available: cursor.remaining(),
            }),
        }
    }
}
