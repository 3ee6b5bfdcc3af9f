//! Stored (`RAWW`) blobs: the header followed by the data as-is

use super::{Algorithm, CompressionHeader, HEADER_SIZE};
use crate::error::{Error, Result};

#[must_use]
pub fn is_raw(data: &[u8]) -> bool {
    Algorithm::Raw.matches(data)
}

/// Wrap `data` in a RAW header. Both size fields hold the data length.
#[must_use]
pub fn compress(data: &[u8]) -> Vec<u8> {
    let size = data.len() as u32;
    let header = CompressionHeader::new(Algorithm::Raw, size, size);

    let mut output = Vec::with_capacity(HEADER_SIZE + data.len());
    output.extend_from_slice(&header.to_bytes());
    output.extend_from_slice(data);
    output
}

/// Return the stored bytes behind a RAW header.
///
/// # Errors
/// Returns an error if the header is not RAW or the data is shorter than the
/// declared size.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if !is_raw(data) {
        return Err(Error::DecompressionFailed {
            codec: "RAW",
            message: "missing RAWW header".to_string(),
        });
    }

    let header = CompressionHeader::parse(data)?;
    let end = HEADER_SIZE + header.uncompressed_size as usize;

    data.get(HEADER_SIZE..end)
        .map(<[u8]>::to_vec)
        .ok_or_else(|| Error::DecompressionFailed {
            codec: "RAW",
            message: format!(
                "declared {} bytes but only {} follow the header",
                header.uncompressed_size,
                data.len() - HEADER_SIZE
            ),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_layout() {
        let packed = compress(&[1, 2, 3]);
        assert_eq!(packed.len(), 19);
        assert_eq!(
            packed,
            [
                b'R', b'A', b'W', b'W', 0x01, 0x10, 0x00, 0x00, 3, 0, 0, 0, 3, 0, 0, 0, 1, 2, 3
            ]
        );
        assert_eq!(decompress(&packed).unwrap(), [1, 2, 3]);
    }

    #[test]
    fn test_raw_empty() {
        let packed = compress(&[]);
        assert_eq!(packed.len(), HEADER_SIZE);
        assert!(decompress(&packed).unwrap().is_empty());
    }

    #[test]
    fn test_raw_truncated() {
        let mut packed = compress(&[1, 2, 3, 4]);
        packed.truncate(HEADER_SIZE + 2);
        assert!(matches!(
            decompress(&packed),
            Err(Error::DecompressionFailed { codec: "RAW", .. })
        ));
    }
}
