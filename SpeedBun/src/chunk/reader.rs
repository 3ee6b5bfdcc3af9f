//! Chunk reader contract and registry

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::binary::BinaryCursor;
use crate::error::Result;
use crate::model::DecodedValue;

/// Decoder for one chunk id.
///
/// `decode` receives a cursor over the whole chunk, header included, and the
/// chunk's offset relative to the start of the file it came from. Errors are
/// not caught by the deserializer.
pub trait ChunkReader: Send + Sync {
    fn chunk_id(&self) -> u32;

    fn decode(&self, cursor: &mut BinaryCursor<'_>, base_offset: u64) -> Result<DecodedValue>;
}

/// Reader that keeps the chunk bytes as they are.
#[derive(Debug, Clone, Copy)]
pub struct RawChunkReader {
    id: u32,
}

impl RawChunkReader {
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self { id }
    }
}

impl ChunkReader for RawChunkReader {
    fn chunk_id(&self) -> u32 {
        self.id
    }

    fn decode(&self, cursor: &mut BinaryCursor<'_>, _base_offset: u64) -> Result<DecodedValue> {
        let remaining = cursor.remaining();
        Ok(DecodedValue::Unrecognized(cursor.read_bytes(remaining)?.to_vec()))
    }
}

/// Readers by chunk id. The first reader registered for an id is kept.
#[derive(Clone, Default)]
pub struct ReaderRegistry {
    readers: HashMap<u32, Arc<dyn ChunkReader>>,
}

impl ReaderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reader. Returns `false` if its id already has one.
    pub fn register<R: ChunkReader + 'static>(&mut self, reader: R) -> bool {
        self.register_arc(Arc::new(reader))
    }

    pub fn register_arc(&mut self, reader: Arc<dyn ChunkReader>) -> bool {
        let id = reader.chunk_id();
        if self.readers.contains_key(&id) {
            tracing::debug!("Reader for chunk 0x{id:08X} already registered, ignoring");
            return false;
        }
        self.readers.insert(id, reader);
        true
    }

    /// Builder form of [`ReaderRegistry::register`].
    #[must_use]
    pub fn with_reader<R: ChunkReader + 'static>(mut self, reader: R) -> Self {
        self.register(reader);
        self
    }

    #[must_use]
    pub fn get(&self, id: u32) -> Option<&dyn ChunkReader> {
        self.readers.get(&id).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn contains(&self, id: u32) -> bool {
        self.readers.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.readers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }

    /// Registered ids in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.readers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl fmt::Debug for ReaderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.ids().iter().map(|id| format!("0x{id:08X}")))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tagged {
        id: u32,
        tag: u8,
    }

    impl ChunkReader for Tagged {
        fn chunk_id(&self) -> u32 {
            self.id
        }

        fn decode(&self, _cursor: &mut BinaryCursor<'_>, _base: u64) -> Result<DecodedValue> {
            Ok(DecodedValue::Unrecognized(vec![self.tag]))
        }
    }

    #[test]
    fn test_first_registered_reader_wins() {
        let mut registry = ReaderRegistry::new();
        assert!(registry.register(Tagged { id: 7, tag: 1 }));
        assert!(!registry.register(Tagged { id: 7, tag: 2 }));
        assert_eq!(registry.len(), 1);

        let data = [0u8; 8];
        let mut cursor = BinaryCursor::new(&data);
        let value = registry.get(7).unwrap().decode(&mut cursor, 0).unwrap();
        assert_eq!(value, DecodedValue::Unrecognized(vec![1]));
    }

    #[test]
    fn test_raw_reader_copies_chunk() {
        let registry = ReaderRegistry::new().with_reader(RawChunkReader::new(0x42));
        assert!(registry.contains(0x42));
        assert!(registry.get(0x43).is_none());

        let data = [0x42, 0, 0, 0, 2, 0, 0, 0, 0xAA, 0xBB];
        let mut cursor = BinaryCursor::new(&data);
        let value = registry.get(0x42).unwrap().decode(&mut cursor, 0).unwrap();
        assert_eq!(value, DecodedValue::Unrecognized(data.to_vec()));
        assert_eq!(format!("{registry:?}"), "[\"0x00000042\"]");
    }
}
