//! Iteration over the top level of a chunk stream

use super::header::{ChunkHeader, SUPER_CHUNK_SIZE_OFFSET};
use crate::compression::HEADER_SIZE;
use crate::error::{Error, Result};

/// What a chunk holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkBody<'a> {
    Padding,
    /// Compressed blob of a super-chunk, starting at its codec header.
    Compressed(&'a [u8]),
    /// A data chunk, header included.
    Data(&'a [u8]),
}

/// One chunk found by [`ChunkWalker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkEntry<'a> {
    /// Stream offset of the chunk header.
    pub offset: usize,
    pub header: ChunkHeader,
    pub body: ChunkBody<'a>,
}

/// Walks chunks from the start of a stream.
///
/// Every chunk is checked to lie inside the stream. The first structural
/// error is yielded once and ends the iteration.
#[derive(Debug, Clone)]
pub struct ChunkWalker<'a> {
    data: &'a [u8],
    position: usize,
    failed: bool,
}

impl<'a> ChunkWalker<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            failed: false,
        }
    }

    fn malformed(offset: usize, message: String) -> Error {
        Error::MalformedChunk { offset, message }
    }

    /// Bytes `start..start + length` of the stream, if they exist.
    fn span(&self, start: usize, length: usize, what: &str) -> Result<&'a [u8]> {
        start
            .checked_add(length)
            .and_then(|end| self.data.get(start..end))
            .ok_or_else(|| {
                Self::malformed(
                    start,
                    format!(
                        "{what} of {length} bytes runs past the end of the {} byte stream",
                        self.data.len()
                    ),
                )
            })
    }

    fn next_entry(&mut self) -> Result<ChunkEntry<'a>> {
        let offset = self.position;
        let raw = self.span(offset, ChunkHeader::SIZE, "chunk header")?;
        let header = ChunkHeader {
            id: u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]),
            length: i32::from_le_bytes([raw[4], raw[5], raw[6], raw[7]]),
        };

        let body_len = header.body_len().ok_or_else(|| {
            Self::malformed(
                offset,
                format!("chunk 0x{:08X} has negative length {}", header.id, header.length),
            )
        })?;

        let (body, consumed) = if header.is_padding() {
            self.span(offset + ChunkHeader::SIZE, body_len, "padding")?;
            (ChunkBody::Padding, ChunkHeader::SIZE + body_len)
        } else if header.is_super_chunk() {
            let size_field = self.span(offset + SUPER_CHUNK_SIZE_OFFSET, 4, "compressed header")?;
            let size = u32::from_le_bytes([size_field[0], size_field[1], size_field[2], size_field[3]])
                as usize;
            if size < HEADER_SIZE {
                return Err(Self::malformed(
                    offset,
                    format!("compressed size {size} is smaller than its header"),
                ));
            }
            (
                ChunkBody::Compressed(self.span(offset, size, "compressed blob")?),
                size,
            )
        } else {
            let length = ChunkHeader::SIZE + body_len;
            (ChunkBody::Data(self.span(offset, length, "chunk")?), length)
        };

        self.position = offset + consumed;
        Ok(ChunkEntry {
            offset,
            header,
            body,
        })
    }
}

impl<'a> Iterator for ChunkWalker<'a> {
    type Item = Result<ChunkEntry<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.position >= self.data.len() {
            return None;
        }

        let entry = self.next_entry();
        self.failed = entry.is_err();
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::header::{SUPER_CHUNK_ID, SUPER_CHUNK_LENGTH};
    use crate::compression::{JlzOptions, jlz};

    fn chunk(id: u32, body: &[u8]) -> Vec<u8> {
        let mut data = id.to_le_bytes().to_vec();
        data.extend_from_slice(&(body.len() as i32).to_le_bytes());
        data.extend_from_slice(body);
        data
    }

    #[test]
    fn test_walk_kinds() {
        let mut stream = chunk(0, &[0; 8]);
        stream.extend(chunk(0x1234, &[1, 2, 3, 4]));

        // A JDLZ blob read as a chunk header is the super-chunk sentinel
        let packed = jlz::compress(&chunk(0x99, &[7; 32]), &JlzOptions::default());
        assert_eq!(&packed[4..8], &SUPER_CHUNK_LENGTH.to_le_bytes());
        stream.extend_from_slice(&packed);

        let entries: Vec<ChunkEntry<'_>> = ChunkWalker::new(&stream)
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].body, ChunkBody::Padding);
        assert_eq!(entries[1].offset, 16);
        assert_eq!(entries[1].body, ChunkBody::Data(&stream[16..28]));
        assert_eq!(entries[2].header.id, SUPER_CHUNK_ID);
        assert!(matches!(entries[2].body, ChunkBody::Compressed(blob) if blob.len() == packed.len()));
    }

    #[test]
    fn test_truncated_header() {
        let mut stream = chunk(0x1234, &[]);
        stream.extend_from_slice(&[1, 2, 3]);

        let mut walker = ChunkWalker::new(&stream);
        assert!(walker.next().unwrap().is_ok());
        assert!(matches!(
            walker.next(),
            Some(Err(Error::MalformedChunk { offset: 8, .. }))
        ));
        assert!(walker.next().is_none());
    }

    #[test]
    fn test_negative_and_overlong_lengths() {
        let mut stream = 0x1234u32.to_le_bytes().to_vec();
        stream.extend_from_slice(&(-4i32).to_le_bytes());
        assert!(ChunkWalker::new(&stream).next().unwrap().is_err());

        let mut stream = chunk(0x1234, &[0; 4]);
        stream[4] = 200;
        assert!(ChunkWalker::new(&stream).next().unwrap().is_err());
    }

    #[test]
    fn test_empty_stream() {
        assert!(ChunkWalker::new(&[]).next().is_none());
    }
}
