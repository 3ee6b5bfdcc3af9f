//! JDLZ: byte-oriented LZ77 with two interleaved flag streams
//!
//! After the 16-byte header the body is a sequence of tokens steered by two
//! flag bytes, each refilled when its eight bits are used up:
//!
//! - flags1, one bit per token: 1 = match, 0 = literal byte
//! - flags2, one bit per match: 1 = short form, 0 = long form
//!
//! A match is two bytes `b0 b1`:
//!
//! ```text
//! short: distance = (b0 & 0x0F) + 1             (1..=16)
//!        length   = (b1 | (b0 & 0xF0) << 4) + 3 (3..=4098)
//! long:  distance = (b1 | (b0 & 0xE0) << 3) + 17 (17..=2064)
//!        length   = (b0 & 0x1F) + 3             (3..=34)
//! ```
//!
//! The header's compressed size covers the whole blob, header included.

use super::{Algorithm, CompressionHeader, HEADER_SIZE, copy_match, next_byte};
use crate::error::{Error, Result};

const CODEC: &str = "JLZ";

const MIN_MATCH: usize = 3;
const MAX_SHORT_DISTANCE: usize = 16;
const MAX_LONG_DISTANCE: usize = 2064;
const MAX_SHORT_LENGTH: usize = 4098;
const MAX_LONG_LENGTH: usize = 34;

/// Encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JlzOptions {
    /// Entries in the hash table of recent positions. Always a power of two.
    pub hash_size: usize,
    /// Candidates examined along a hash chain before settling.
    pub max_search_depth: usize,
}

impl Default for JlzOptions {
    fn default() -> Self {
        Self {
            hash_size: 0x2000,
            max_search_depth: 16,
        }
    }
}

impl JlzOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hash table size, rounded up to a power of two.
    #[must_use]
    pub fn with_hash_size(mut self, hash_size: usize) -> Self {
        self.hash_size = hash_size.max(1).next_power_of_two();
        self
    }

    #[must_use]
    pub fn with_max_search_depth(mut self, depth: usize) -> Self {
        self.max_search_depth = depth;
        self
    }
}

#[must_use]
pub fn is_jlz(data: &[u8]) -> bool {
    Algorithm::Jlz.matches(data)
}

// ============================================================================
// Decoder
// ============================================================================

/// Decompress a JDLZ blob.
///
/// # Errors
/// Returns [`Error::DecompressionFailed`] if the header is not JDLZ, the
/// compressed size does not fit the input, or a token reads or writes out of
/// bounds.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    if !is_jlz(input) {
        return Err(failed("missing JDLZ header".to_string()));
    }

    let header = CompressionHeader::parse(input)?;
    let end = header.compressed_size as usize;
    if end < HEADER_SIZE || end > input.len() {
        return Err(failed(format!(
            "compressed size {end} does not fit {} bytes of input",
            input.len()
        )));
    }
    let input = &input[..end];

    let mut output = vec![0u8; header.uncompressed_size as usize];
    let mut in_pos = HEADER_SIZE;
    let mut out_pos = 0;

    // The 0x100 sentinel marks when eight bits have been shifted out
    let mut flags1: u32 = 1;
    let mut flags2: u32 = 1;

    while out_pos < output.len() {
        if flags1 == 1 {
            flags1 = u32::from(next_byte(CODEC, input, &mut in_pos)?) | 0x100;
        }
        if flags2 == 1 {
            flags2 = u32::from(next_byte(CODEC, input, &mut in_pos)?) | 0x100;
        }

        if flags1 & 1 == 1 {
            let b0 = usize::from(next_byte(CODEC, input, &mut in_pos)?);
            let b1 = usize::from(next_byte(CODEC, input, &mut in_pos)?);

            let (distance, length) = if flags2 & 1 == 1 {
                ((b0 & 0x0F) + 1, (b1 | ((b0 & 0xF0) << 4)) + MIN_MATCH)
            } else {
                ((b1 | ((b0 & 0xE0) << 3)) + 17, (b0 & 0x1F) + MIN_MATCH)
            };

            copy_match(CODEC, &mut output, out_pos, distance, length)?;
            out_pos += length;
            flags2 >>= 1;
        } else {
            output[out_pos] = next_byte(CODEC, input, &mut in_pos)?;
            out_pos += 1;
        }
        flags1 >>= 1;
    }

    Ok(output)
}

fn failed(message: String) -> Error {
    Error::DecompressionFailed {
        codec: CODEC,
        message,
    }
}

// ============================================================================
// Encoder
// ============================================================================

/// Hash of the three bytes at the start of `bytes`.
fn hash3(bytes: &[u8], hash_size: usize) -> usize {
    let mixed =
        i32::from(bytes[0]) ^ ((i32::from(bytes[1]) ^ (i32::from(bytes[2]) << 4)) << 4);
    (mixed.wrapping_mul(-0x1A1) as usize) & (hash_size - 1)
}

/// Flag byte being filled while tokens are emitted. Its slot in the output is
/// reserved up front and patched once the byte is complete.
struct FlagByte {
    slot: usize,
    value: u8,
    bit: u8,
}

impl FlagByte {
    fn reserve(output: &mut Vec<u8>) -> Self {
        let slot = output.len();
        output.push(0);
        Self {
            slot,
            value: 0,
            bit: 1,
        }
    }

    fn set(&mut self) {
        self.value |= self.bit;
    }

    /// Move to the next bit. When the byte is full it is written to its slot
    /// and a fresh slot is reserved.
    fn advance(&mut self, output: &mut Vec<u8>) {
        self.bit <<= 1;
        if self.bit == 0 {
            output[self.slot] = self.value;
            *self = Self::reserve(output);
        }
    }

    /// Write a partly used byte, or drop the slot if it was reserved last and
    /// never used.
    fn finish(&self, output: &mut Vec<u8>) {
        if self.bit > 1 {
            output[self.slot] = self.value;
        } else if self.slot + 1 == output.len() {
            output.truncate(self.slot);
        }
    }
}

/// Compress `input` into a JDLZ blob.
///
/// Matches are found with a hash chain over three-byte prefixes. Short-form
/// matches may be up to 4098 bytes long, so runs compress well. Empty input
/// gives a bare 16-byte header.
#[must_use]
pub fn compress(input: &[u8], options: &JlzOptions) -> Vec<u8> {
    let hash_size = options.hash_size.max(1).next_power_of_two();
    let header = CompressionHeader::new(Algorithm::Jlz, input.len() as u32, 0);

    let mut output = Vec::with_capacity(HEADER_SIZE + input.len() + input.len() / 8 + 2);
    output.extend_from_slice(&header.to_bytes());

    if !input.is_empty() {
        encode_tokens(input, hash_size, options.max_search_depth, &mut output);
    }

    let compressed_size = output.len() as u32;
    output[12..16].copy_from_slice(&compressed_size.to_le_bytes());

    tracing::trace!(
        "JLZ compressed {} -> {} bytes (hash {hash_size}, depth {})",
        input.len(),
        output.len(),
        options.max_search_depth
    );

    output
}

fn encode_tokens(input: &[u8], hash_size: usize, max_search_depth: usize, output: &mut Vec<u8>) {
    let mut hash_head = vec![0usize; hash_size];
    let mut hash_chain = vec![0usize; input.len()];

    let mut flags1 = FlagByte::reserve(output);
    let mut flags2 = FlagByte::reserve(output);

    // The first byte is always a literal
    output.push(input[0]);
    flags1.bit <<= 1;
    let mut in_pos = 1;

    while in_pos < input.len() {
        let remaining = input.len() - in_pos;
        let mut best_length = MIN_MATCH - 1;
        let mut best_distance = 0;

        if remaining >= MIN_MATCH {
            let hash = hash3(&input[in_pos..], hash_size);
            let mut match_pos = hash_head[hash];
            hash_head[hash] = in_pos;
            hash_chain[in_pos] = match_pos;
            let mut prev_match_pos = in_pos;

            for _ in 0..max_search_depth {
                // Chains only ever point backwards
                if match_pos >= prev_match_pos {
                    break;
                }
                let distance = in_pos - match_pos;
                if distance > MAX_LONG_DISTANCE {
                    break;
                }

                let limit = if distance <= MAX_SHORT_DISTANCE {
                    MAX_SHORT_LENGTH
                } else {
                    MAX_LONG_LENGTH
                };
                let max_length = remaining.min(limit);
                if best_length >= max_length {
                    break;
                }

                let length = input[in_pos..in_pos + max_length]
                    .iter()
                    .zip(&input[match_pos..])
                    .take_while(|(a, b)| a == b)
                    .count();
                if length > best_length {
                    best_length = length;
                    best_distance = distance;
                }

                prev_match_pos = match_pos;
                match_pos = hash_chain[match_pos];
            }
        }

        if best_length >= MIN_MATCH {
            let code = best_length - MIN_MATCH;
            flags1.set();

            if best_distance <= MAX_SHORT_DISTANCE {
                flags2.set();
                output.push(((best_distance - 1) | ((code >> 4) & 0xF0)) as u8);
                output.push(code as u8);
            } else {
                let distance = best_distance - 17;
                output.push((code | ((distance >> 3) & 0xE0)) as u8);
                output.push(distance as u8);
            }

            in_pos += best_length;
            flags1.advance(output);
            flags2.advance(output);
        } else {
            output.push(input[in_pos]);
            in_pos += 1;
            flags1.advance(output);
        }
    }

    flags2.finish(output);
    flags1.finish(output);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(data: &[u8]) -> Vec<u8> {
        let packed = compress(data, &JlzOptions::default());
        assert!(is_jlz(&packed));
        decompress(&packed).unwrap()
    }

    #[test]
    fn test_empty_input() {
        let packed = compress(&[], &JlzOptions::default());
        assert_eq!(packed.len(), HEADER_SIZE);

        let header = CompressionHeader::parse(&packed).unwrap();
        assert_eq!(header.uncompressed_size, 0);
        assert_eq!(header.compressed_size, 16);
        assert!(decompress(&packed).unwrap().is_empty());
    }

    #[test]
    fn test_header_fields() {
        let data = b"hello hello hello hello";
        let packed = compress(data, &JlzOptions::default());

        assert_eq!(&packed[..6], b"JDLZ\x02\x10");
        let header = CompressionHeader::parse(&packed).unwrap();
        assert_eq!(header.uncompressed_size as usize, data.len());
        assert_eq!(header.compressed_size as usize, packed.len());
    }

    #[test]
    fn test_single_byte() {
        assert_eq!(roundtrip(&[0x5A]), [0x5A]);
    }

    #[test]
    fn test_overlapping_run() {
        let data = vec![0xAAu8; 5000];
        let packed = compress(&data, &JlzOptions::default());
        // One literal then a couple of long short-form matches
        assert!(packed.len() < 40);
        assert_eq!(decompress(&packed).unwrap(), data);
    }

    #[test]
    fn test_long_distance_matches() {
        // A 40-byte phrase repeated far enough apart to need long-form matches
        let phrase: Vec<u8> = (0u8..40).collect();
        let mut data = phrase.clone();
        data.extend((0..200).map(|i: u32| (i * 7 + 3) as u8));
        data.extend_from_slice(&phrase);

        assert_eq!(roundtrip(&data), data);
    }

    #[test]
    fn test_mixed_content() {
        let mut data = Vec::new();
        for i in 0u32..20_000 {
            let value = match i % 7 {
                0 => (i >> 3) as u8,
                1..=3 => b'x',
                _ => (i.wrapping_mul(2_654_435_761) >> 24) as u8,
            };
            data.push(value);
        }
        assert_eq!(roundtrip(&data), data);
    }

    #[test]
    fn test_options_are_honored() {
        let data: Vec<u8> = b"abcabcabcabcabcabc-abcabcabcabc".repeat(50);

        let tiny = JlzOptions::new().with_hash_size(3).with_max_search_depth(1);
        assert_eq!(tiny.hash_size, 4);

        let packed = compress(&data, &tiny);
        assert_eq!(decompress(&packed).unwrap(), data);
    }

    #[test]
    fn test_hand_built_stream() {
        // "ab" literals, then a short match (distance 2, length 4), then 'c'
        let mut body = vec![0b0000_0100u8, 0b0000_0001, b'a', b'b', 0x01, 0x01, b'c'];
        let mut blob = CompressionHeader::new(Algorithm::Jlz, 7, 0).to_bytes().to_vec();
        blob.append(&mut body);
        let size = blob.len() as u32;
        blob[12..16].copy_from_slice(&size.to_le_bytes());

        assert_eq!(decompress(&blob).unwrap(), b"abababc");
    }

    #[test]
    fn test_long_form_token() {
        // 17 literals then a long match: distance 17, length 3
        let mut blob = CompressionHeader::new(Algorithm::Jlz, 20, 0).to_bytes().to_vec();
        let literals: Vec<u8> = (b'a'..=b'q').collect();

        // flags1 covers tokens 0..8 (all literals)
        blob.push(0x00);
        blob.push(0x00);
        blob.extend_from_slice(&literals[..8]);
        // tokens 8..16 literals
        blob.push(0x00);
        blob.extend_from_slice(&literals[8..16]);
        // token 16 literal, token 17 long match
        blob.push(0b10);
        blob.push(literals[16]);
        blob.extend_from_slice(&[0x00, 0x00]);

        let size = blob.len() as u32;
        blob[12..16].copy_from_slice(&size.to_le_bytes());

        let mut expected = literals.clone();
        expected.extend_from_slice(&literals[..3]);
        assert_eq!(decompress(&blob).unwrap(), expected);
    }

    #[test]
    fn test_corrupt_distance() {
        // A match before any output exists
        let mut blob = CompressionHeader::new(Algorithm::Jlz, 4, 0).to_bytes().to_vec();
        blob.extend_from_slice(&[0x01, 0x01, 0x00, 0x01]);
        let size = blob.len() as u32;
        blob[12..16].copy_from_slice(&size.to_le_bytes());

        assert!(matches!(
            decompress(&blob),
            Err(Error::DecompressionFailed { codec: "JLZ", .. })
        ));
    }

    #[test]
    fn test_truncated_input() {
        let data = b"some text that is long enough to compress, some text".to_vec();
        let mut packed = compress(&data, &JlzOptions::default());
        packed.truncate(packed.len() - 4);
        assert!(decompress(&packed).is_err());
    }
}
