//! `COMP` blobs from older titles
//!
//! Two layouts share the header. With header flags `0x0001` the body is stored
//! verbatim and the compressed size is the body length. Otherwise the body is
//! LZ-coded under 16-bit flag words (low byte first): a 0 bit is a literal, a 1
//! bit a two-byte match where
//!
//! ```text
//! length   = (b0 & 0x0F) + 3
//! distance = (b0 & 0xF0) << 4 | b1
//! ```
//!
//! Only the stored layout can be produced.

use super::{Algorithm, CompressionHeader, HEADER_SIZE, copy_match, next_byte, raw};
use crate::error::{Error, Result};

const CODEC: &str = "OLDLZ";

/// Header flag marking a stored body.
pub const STORED_FLAG: u16 = 0x0001;

#[must_use]
pub fn is_oldlz(data: &[u8]) -> bool {
    Algorithm::OldLz.matches(data)
}

/// Decompress a `COMP` blob.
///
/// # Errors
/// Returns [`Error::DecompressionFailed`] if the header is not `COMP` or a token
/// points outside the data.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    if !is_oldlz(input) {
        return Err(Error::DecompressionFailed {
            codec: CODEC,
            message: "missing COMP header".to_string(),
        });
    }

    let header = CompressionHeader::parse(input)?;

    if header.flags == STORED_FLAG {
        let end = HEADER_SIZE + header.compressed_size as usize;
        return input
            .get(HEADER_SIZE..end)
            .map(<[u8]>::to_vec)
            .ok_or_else(|| Error::DecompressionFailed {
                codec: CODEC,
                message: format!(
                    "stored body of {} bytes exceeds input of {} bytes",
                    header.compressed_size,
                    input.len()
                ),
            });
    }

    let mut output = vec![0u8; header.uncompressed_size as usize];
    let mut in_pos = HEADER_SIZE;
    let mut out_pos = 0;
    let mut flags: u32 = 1;

    while out_pos < output.len() {
        if flags == 1 {
            let low = u32::from(next_byte(CODEC, input, &mut in_pos)?);
            let high = u32::from(next_byte(CODEC, input, &mut in_pos)?);
            flags = low | (high << 8) | 0x1_0000;
        }

        if flags & 1 == 0 {
            output[out_pos] = next_byte(CODEC, input, &mut in_pos)?;
            out_pos += 1;
        } else {
            let b0 = usize::from(next_byte(CODEC, input, &mut in_pos)?);
            let b1 = usize::from(next_byte(CODEC, input, &mut in_pos)?);
            let length = (b0 & 0x0F) + 3;
            let distance = ((b0 & 0xF0) << 4) | b1;

            copy_match(CODEC, &mut output, out_pos, distance, length)?;
            out_pos += length;
        }
        flags >>= 1;
    }

    Ok(output)
}

/// LZ encoding for `COMP` is not available.
///
/// # Errors
/// Always returns [`Error::NotSupported`]; use [`compress_stored`].
pub fn compress(_input: &[u8]) -> Result<Vec<u8>> {
    Err(Error::NotSupported(
        "OLDLZ encoding is not available, only stored COMP output".to_string(),
    ))
}

/// Wrap `input` as a stored `COMP` blob.
#[must_use]
pub fn compress_stored(input: &[u8]) -> Vec<u8> {
    let mut output = raw::compress(input);
    output[..4].copy_from_slice(&Algorithm::OldLz.fourcc());
    output[6..8].copy_from_slice(&STORED_FLAG.to_le_bytes());
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(uncompressed: u32, body: &[u8]) -> Vec<u8> {
        let mut data = CompressionHeader::new(Algorithm::OldLz, uncompressed, body.len() as u32)
            .to_bytes()
            .to_vec();
        data.extend_from_slice(body);
        data
    }

    #[test]
    fn test_stored_roundtrip() {
        let packed = compress_stored(b"plain bytes");
        assert!(is_oldlz(&packed));
        assert_eq!(&packed[..8], b"COMP\x01\x10\x01\x00");
        assert_eq!(decompress(&packed).unwrap(), b"plain bytes");
    }

    #[test]
    fn test_lz_stream() {
        // literals 'x' 'y', then a match of length 5 at distance 2, then 'z'
        let body = [0b0000_0100, 0x00, b'x', b'y', 0x02, 0x02, b'z'];
        let data = blob(8, &body);
        assert_eq!(decompress(&data).unwrap(), b"xyxyxyxz");
    }

    #[test]
    fn test_flag_word_refill() {
        // Seventeen literals need a second flag word
        let mut body = vec![0x00, 0x00];
        body.extend(b'a'..=b'p');
        body.extend_from_slice(&[0x00, 0x00, b'q']);
        let data = blob(17, &body);

        let expected: Vec<u8> = (b'a'..=b'q').collect();
        assert_eq!(decompress(&data).unwrap(), expected);
    }

    #[test]
    fn test_zero_distance_rejected() {
        let body = [0b0000_0010, 0x00, b'x', 0x00, 0x00];
        let data = blob(4, &body);
        assert!(matches!(
            decompress(&data),
            Err(Error::DecompressionFailed { codec: "OLDLZ", .. })
        ));
    }

    #[test]
    fn test_encode_not_supported() {
        assert!(matches!(compress(b"abc"), Err(Error::NotSupported(_))));
    }
}
