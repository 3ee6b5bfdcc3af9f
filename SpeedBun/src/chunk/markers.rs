//! Segment markers for streams assembled from several files

use serde::Serialize;

/// Start offsets of each input inside the concatenated stream.
///
/// Markers are cumulative and strictly increasing: the first is 0 and each
/// following one is the previous marker plus the previous segment's length.
/// An empty segment adds no marker since it would start where the next one
/// does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SegmentMarkers {
    markers: Vec<u64>,
    total_len: u64,
}

impl SegmentMarkers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a segment of `length` bytes. Returns its start offset.
    pub fn push(&mut self, length: u64) -> u64 {
        let start = self.total_len;
        if self.markers.last() != Some(&start) {
            self.markers.push(start);
        }
        self.total_len += length;
        start
    }

    /// Offset of `position` relative to the segment containing it.
    #[must_use]
    pub fn base_offset_for(&self, position: u64) -> u64 {
        let index = self.markers.partition_point(|&m| m <= position);
        match index.checked_sub(1) {
            Some(i) => position - self.markers[i],
            None => position,
        }
    }

    /// Index of the segment containing `position`.
    #[must_use]
    pub fn segment_of(&self, position: u64) -> Option<usize> {
        self.markers
            .partition_point(|&m| m <= position)
            .checked_sub(1)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u64] {
        &self.markers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Length of the whole stream.
    #[must_use]
    pub fn total_len(&self) -> u64 {
        self.total_len
    }

    pub fn clear(&mut self) {
        self.markers.clear();
        self.total_len = 0;
    }
}
