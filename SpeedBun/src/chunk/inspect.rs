//! Chunk stream inspection
//!
//! Lists the chunk tree of a stream without decoding any chunk bodies.

use serde::Serialize;

use super::deserializer::DeserializeOptions;
use super::walker::{ChunkBody, ChunkWalker};
use crate::compression::{self, CompressionHeader};
use crate::error::{Error, Result};

/// A chunk found while inspecting a stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkInfo {
    /// Offset of the chunk header within its stream. Children of a compressed
    /// chunk are relative to the decompressed data.
    pub offset: u64,
    pub id: u32,
    pub length: i32,
    pub kind: ChunkKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChunkKind {
    Padding,
    Data,
    Compressed {
        algorithm: compression::Algorithm,
        compressed_size: u32,
        uncompressed_size: u32,
        children: Vec<ChunkInfo>,
    },
}

impl ChunkInfo {
    /// Number of chunks in this subtree, this one included.
    #[must_use]
    pub fn count(&self) -> usize {
        match &self.kind {
            ChunkKind::Compressed { children, .. } => {
                1 + children.iter().map(ChunkInfo::count).sum::<usize>()
            }
            _ => 1,
        }
    }
}

/// Walk a stream and describe every chunk, expanding compressed super-chunks.
///
/// Super-chunks whose codec cannot decode are listed without children.
///
/// # Errors
/// Returns [`Error::MalformedChunk`] for chunks that do not fit the stream,
/// [`Error::NestingTooDeep`] past the configured depth, and codec errors other
/// than [`Error::NotSupported`].
pub fn inspect_chunks(data: &[u8], options: &DeserializeOptions) -> Result<Vec<ChunkInfo>> {
    inspect_level(data, options, 0)
}

fn inspect_level(data: &[u8], options: &DeserializeOptions, depth: usize) -> Result<Vec<ChunkInfo>> {
    let mut chunks = Vec::new();

    for entry in ChunkWalker::new(data) {
        let entry = entry?;

        let kind = match entry.body {
            ChunkBody::Padding => ChunkKind::Padding,
            ChunkBody::Data(_) => ChunkKind::Data,
            ChunkBody::Compressed(blob) => {
                if depth >= options.max_nesting_depth {
                    return Err(Error::NestingTooDeep {
                        max_depth: options.max_nesting_depth,
                    });
                }

                let header = CompressionHeader::parse(blob)?;
                let children = match compression::decompress(blob) {
                    Ok(inner) => inspect_level(&inner, options, depth + 1)?,
                    Err(Error::NotSupported(reason)) => {
                        tracing::warn!(
                            "Cannot expand chunk at 0x{:X}: {reason}",
                            entry.offset
                        );
                        Vec::new()
                    }
                    Err(e) => return Err(e),
                };

                ChunkKind::Compressed {
                    algorithm: header.algorithm,
                    compressed_size: header.compressed_size,
                    uncompressed_size: header.uncompressed_size,
                    children,
                }
            }
        };

        chunks.push(ChunkInfo {
            offset: entry.offset as u64,
            id: entry.header.id,
            length: entry.header.length,
            kind,
        });
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::{Algorithm, JlzOptions, jlz};

    fn chunk(id: u32, body: &[u8]) -> Vec<u8> {
        let mut data = id.to_le_bytes().to_vec();
        data.extend_from_slice(&(body.len() as i32).to_le_bytes());
        data.extend_from_slice(body);
        data
    }

    #[test]
    fn test_inspect_tree() {
        let mut inner = chunk(0x10, &[1; 4]);
        inner.extend(chunk(0x11, &[2; 4]));

        let mut stream = chunk(0, &[0; 8]);
        stream.extend(jlz::compress(&inner, &JlzOptions::default()));
        stream.extend(chunk(0x12, &[]));

        let chunks = inspect_chunks(&stream, &DeserializeOptions::default()).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].kind, ChunkKind::Padding);
        assert_eq!(chunks[2].kind, ChunkKind::Data);
        assert_eq!(chunks.iter().map(ChunkInfo::count).sum::<usize>(), 5);

        match &chunks[1].kind {
            ChunkKind::Compressed {
                algorithm,
                uncompressed_size,
                children,
                ..
            } => {
                assert_eq!(*algorithm, Algorithm::Jlz);
                assert_eq!(*uncompressed_size as usize, inner.len());
                assert_eq!(children[1].offset, 12);
                assert_eq!(children[1].id, 0x11);
            }
            other => panic!("expected compressed chunk, got {other:?}"),
        }
    }

    #[test]
    fn test_inspect_json_shape() {
        let chunks = inspect_chunks(&chunk(0x10, &[0; 4]), &DeserializeOptions::default()).unwrap();
        let json = serde_json::to_value(&chunks).unwrap();
        assert_eq!(json[0]["id"], 0x10);
        assert_eq!(json[0]["kind"]["type"], "data");
    }
}
