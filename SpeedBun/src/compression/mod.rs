//! Compression codecs used by `.BUN` chunk streams
//!
//! Every compressed blob starts with the same 16-byte header:
//!
//! ```text
//! 0x0 - 0x3 = FourCC ('JDLZ', 'HUFF', 'COMP', 'RAWW')
//! 0x4       = version
//! 0x5       = header size (0x10)
//! 0x6 - 0x7 = flags
//! 0x8 - 0xB = uncompressed size (little-endian)
//! 0xC - 0xF = compressed size (little-endian)
//! ```
//!
//! [`decompress`] and [`compress`] pick the codec from the header or the caller's
//! preference.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::binary::BinaryCursor;
use crate::error::{Error, Result};

pub mod huff;
pub mod jlz;
pub mod oldlz;
pub mod raw;

pub use jlz::JlzOptions;

/// Size of the header shared by all codecs.
pub const HEADER_SIZE: usize = 16;

/// Compression algorithm identified by its FourCC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Algorithm {
    /// Huffman coder, `HUFF` v1. Decoding is not validated.
    Huff,
    /// Legacy LZ, `COMP` v1. Decode only.
    OldLz,
    /// Stored data, `RAWW` v1.
    Raw,
    /// Primary LZ77 variant, `JDLZ` v2.
    Jlz,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [Algorithm::Jlz, Algorithm::Huff, Algorithm::Raw, Algorithm::OldLz];

    /// The four ASCII bytes that open the header.
    #[must_use]
    pub const fn fourcc(self) -> [u8; 4] {
        match self {
            Algorithm::Huff => *b"HUFF",
            Algorithm::OldLz => *b"COMP",
            Algorithm::Raw => *b"RAWW",
            Algorithm::Jlz => *b"JDLZ",
        }
    }

    /// The FourCC read as a little-endian `u32`.
    #[must_use]
    pub const fn magic(self) -> u32 {
        u32::from_le_bytes(self.fourcc())
    }

    /// Version byte expected after the FourCC.
    #[must_use]
    pub const fn version(self) -> u8 {
        match self {
            Algorithm::Jlz => 0x02,
            Algorithm::Huff | Algorithm::OldLz | Algorithm::Raw => 0x01,
        }
    }

    #[must_use]
    pub fn from_magic(magic: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.magic() == magic)
    }

    /// Whether `data` carries this algorithm's header.
    #[must_use]
    pub fn matches(self, data: &[u8]) -> bool {
        data.len() >= HEADER_SIZE && data[..4] == self.fourcc() && data[4] == self.version()
    }

    /// Identify the codec of a compressed blob from its FourCC and version.
    ///
    /// # Errors
    /// Returns [`Error::UnknownFormat`] if the data is shorter than a header or no
    /// codec matches.
    pub fn detect(data: &[u8]) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.matches(data))
            .ok_or_else(|| Error::UnknownFormat {
                signature: data[..data.len().min(4)].to_vec(),
            })
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Huff => "HUFF",
            Algorithm::OldLz => "OLDLZ",
            Algorithm::Raw => "RAW",
            Algorithm::Jlz => "JLZ",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jlz" | "jdlz" => Ok(Algorithm::Jlz),
            "huff" => Ok(Algorithm::Huff),
            "oldlz" | "comp" => Ok(Algorithm::OldLz),
            "raw" | "raww" => Ok(Algorithm::Raw),
            _ => Err(format!(
                "Invalid algorithm '{s}'. Valid values: jlz/jdlz, huff, oldlz/comp, raw/raww"
            )),
        }
    }
}

/// The 16-byte header in front of every compressed blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompressionHeader {
    pub algorithm: Algorithm,
    pub version: u8,
    pub header_size: u8,
    pub flags: u16,
    pub uncompressed_size: u32,
    /// Total blob size for JDLZ (header included); body size for stored data.
    pub compressed_size: u32,
}

impl CompressionHeader {
    /// A header with the algorithm's version byte and a 16-byte header size.
    #[must_use]
    pub fn new(algorithm: Algorithm, uncompressed_size: u32, compressed_size: u32) -> Self {
        Self {
            algorithm,
            version: algorithm.version(),
            header_size: HEADER_SIZE as u8,
            flags: 0,
            uncompressed_size,
            compressed_size,
        }
    }

    /// Parse the header at the start of `data`.
    ///
    /// # Errors
    /// Returns [`Error::UnknownFormat`] if the data is too short or the FourCC is
    /// not one of the known codecs.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let unknown = || Error::UnknownFormat {
            signature: data[..data.len().min(4)].to_vec(),
        };

        if data.len() < HEADER_SIZE {
            return Err(unknown());
        }

        let mut cursor = BinaryCursor::new(data);
        let algorithm = Algorithm::from_magic(cursor.read_u32()?).ok_or_else(unknown)?;

        Ok(Self {
            algorithm,
            version: cursor.read_u8()?,
            header_size: cursor.read_u8()?,
            flags: cursor.read_u16()?,
            uncompressed_size: cursor.read_u32()?,
            compressed_size: cursor.read_u32()?,
        })
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[..4].copy_from_slice(&self.algorithm.fourcc());
        bytes[4] = self.version;
        bytes[5] = self.header_size;
        bytes[6..8].copy_from_slice(&self.flags.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.uncompressed_size.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.compressed_size.to_le_bytes());
        bytes
    }
}

/// Printable FourCC of arbitrary data, for error messages.
fn fourcc_display(data: &[u8]) -> String {
    data.iter()
        .take(4)
        .map(|&b| if b.is_ascii_graphic() { char::from(b) } else { '.' })
        .collect()
}

/// Decompress a blob, choosing the codec from its header.
///
/// # Errors
/// Returns [`Error::UnsupportedFormat`] for unknown signatures,
/// [`Error::NotSupported`] for HUFF data and [`Error::DecompressionFailed`] for
/// corrupt input.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let algorithm = Algorithm::detect(data).map_err(|_| Error::UnsupportedFormat {
        fourcc: fourcc_display(data),
    })?;

    tracing::debug!("Decompressing {} bytes of {algorithm} data", data.len());

    match algorithm {
        Algorithm::Jlz => jlz::decompress(data),
        Algorithm::Huff => huff::decompress(data),
        Algorithm::Raw => raw::decompress(data),
        Algorithm::OldLz => oldlz::decompress(data),
    }
}

/// Compress with default codec settings.
///
/// See [`compress_with_options`].
///
/// # Errors
/// Returns [`Error::NotSupported`] if the preferred codec cannot encode.
pub fn compress(data: &[u8], preferred: Option<Algorithm>) -> Result<Vec<u8>> {
    compress_with_options(data, preferred, &JlzOptions::default())
}

/// Compress `data`.
///
/// With a preferred algorithm that codec is used directly. Without one, every
/// codec that can encode is tried and the smallest output wins; if none is
/// smaller than the input plus a header, the data is stored as RAW.
///
/// # Errors
/// Returns [`Error::NotSupported`] if the preferred codec cannot encode.
pub fn compress_with_options(
    data: &[u8],
    preferred: Option<Algorithm>,
    jlz_options: &JlzOptions,
) -> Result<Vec<u8>> {
    match preferred {
        Some(Algorithm::Jlz) => Ok(jlz::compress(data, jlz_options)),
        Some(Algorithm::Huff) => huff::compress(data),
        Some(Algorithm::OldLz) => oldlz::compress(data),
        Some(Algorithm::Raw) => Ok(raw::compress(data)),
        None => {
            let mut best = jlz::compress(data, jlz_options);

            match huff::compress(data) {
                Ok(huff) if huff.len() < best.len() => best = huff,
                Ok(_) => {}
                Err(Error::NotSupported(reason)) => {
                    tracing::debug!("Skipping HUFF candidate: {reason}");
                }
                Err(e) => return Err(e),
            }

            if best.len() < data.len() + HEADER_SIZE {
                Ok(best)
            } else {
                tracing::debug!("No codec beats stored size for {} bytes, using RAW", data.len());
                Ok(raw::compress(data))
            }
        }
    }
}

// ============================================================================
// Shared LZ helpers
// ============================================================================

/// Read one byte of compressed input.
pub(crate) fn next_byte(codec: &'static str, input: &[u8], pos: &mut usize) -> Result<u8> {
    let byte = *input.get(*pos).ok_or_else(|| Error::DecompressionFailed {
        codec,
        message: format!("input ended at byte {pos}"),
    })?;
    *pos += 1;
    Ok(byte)
}

/// Copy `length` bytes from `distance` bytes back, one byte at a time so that
/// overlapping runs repeat.
pub(crate) fn copy_match(
    codec: &'static str,
    output: &mut [u8],
    out_pos: usize,
    distance: usize,
    length: usize,
) -> Result<()> {
    if distance == 0 || distance > out_pos {
        return Err(Error::DecompressionFailed {
            codec,
            message: format!("match distance {distance} at output position {out_pos}"),
        });
    }
    if out_pos + length > output.len() {
        return Err(Error::DecompressionFailed {
            codec,
            message: format!(
                "match of {length} bytes at {out_pos} overruns output of {} bytes",
                output.len()
            ),
        });
    }

    for i in out_pos..out_pos + length {
        output[i] = output[i - distance];
    }
    Ok(())
}
