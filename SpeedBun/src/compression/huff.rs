//! `HUFF` blobs
//!
//! The header is recognised so that callers can tell these blobs apart, but the
//! bitstream layout has not been confirmed against known-good samples. Both
//! directions report [`Error::NotSupported`] rather than produce unverified
//! output.

use super::{Algorithm, CompressionHeader};
use crate::error::{Error, Result};

#[must_use]
pub fn is_huff(data: &[u8]) -> bool {
    Algorithm::Huff.matches(data)
}

/// # Errors
/// Returns [`Error::DecompressionFailed`] for data without a HUFF header and
/// [`Error::NotSupported`] otherwise.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    if !is_huff(input) {
        return Err(Error::DecompressionFailed {
            codec: "HUFF",
            message: "missing HUFF header".to_string(),
        });
    }

    let header = CompressionHeader::parse(input)?;
    tracing::warn!(
        "HUFF blob of {} bytes ({} uncompressed) cannot be decoded",
        input.len(),
        header.uncompressed_size
    );

    Err(Error::NotSupported(format!(
        "HUFF decoding is not available ({} byte payload)",
        header.uncompressed_size
    )))
}

/// # Errors
/// Always returns [`Error::NotSupported`].
pub fn compress(_input: &[u8]) -> Result<Vec<u8>> {
    Err(Error::NotSupported("HUFF encoding is not available".to_string()))
}
