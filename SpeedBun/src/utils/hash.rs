//! Hashing utilities

/// String hash used for asset keys (`h = c + 33 * h`, seeded with `0xFFFFFFFF`)
#[must_use]
pub fn bin_hash(s: &str) -> u32 {
    s.chars()
        .fold(u32::MAX, |hash, c| hash.wrapping_mul(33).wrapping_add(c as u32))
}
