//! Chunk deserializer: assembles input, walks chunks and dispatches readers

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use super::link::link_sections;
use super::markers::SegmentMarkers;
use super::reader::ReaderRegistry;
use super::walker::{ChunkBody, ChunkWalker};
use crate::binary::BinaryCursor;
use crate::compression;
use crate::error::{Error, Result};
use crate::model::ChunkResult;

/// Settings for a deserialization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeserializeOptions {
    /// How many compressed super-chunks may be nested inside each other.
    pub max_nesting_depth: usize,
}

impl Default for DeserializeOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: 8,
        }
    }
}

impl DeserializeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}

/// Handle to a file load started by [`ChunkDeserializer::add_data_from_file`].
#[derive(Debug, Clone)]
pub struct LoadHandle {
    path: PathBuf,
    cancelled: Arc<AtomicBool>,
}

impl LoadHandle {
    /// Drop this file from the next pass. Has no effect once the pass started.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

struct PendingLoad {
    handle: LoadHandle,
    thread: JoinHandle<std::io::Result<Vec<u8>>>,
}

type FinishedCallback = Box<dyn FnMut() + Send>;
type FinishedChunksCallback = Box<dyn FnMut(&[ChunkResult]) + Send>;

/// Decodes a chunk stream assembled from buffers and files.
///
/// Buffers are concatenated in the order they were added, followed by loaded
/// files in the order they were requested. Each input starts a new segment, so
/// readers see offsets relative to their own file.
///
/// ```no_run
/// use std::sync::Arc;
/// use speedbun::chunk::{ChunkDeserializer, RawChunkReader, ReaderRegistry};
///
/// let registry = ReaderRegistry::new().with_reader(RawChunkReader::new(0x0003_4110));
/// let mut deserializer = ChunkDeserializer::new(Arc::new(registry));
/// deserializer.add_data_from_file("STREAML4RA.BUN");
/// let results = deserializer.start()?;
/// # Ok::<(), speedbun::Error>(())
/// ```
pub struct ChunkDeserializer {
    registry: Arc<ReaderRegistry>,
    options: DeserializeOptions,
    depth: usize,
    buffers: Vec<Vec<u8>>,
    markers: SegmentMarkers,
    pending: Vec<PendingLoad>,
    results: Vec<ChunkResult>,
    on_finished: Vec<FinishedCallback>,
    on_finished_chunks: Vec<FinishedChunksCallback>,
}

impl ChunkDeserializer {
    #[must_use]
    pub fn new(registry: Arc<ReaderRegistry>) -> Self {
        Self::with_options(registry, DeserializeOptions::default())
    }

    #[must_use]
    pub fn with_options(registry: Arc<ReaderRegistry>, options: DeserializeOptions) -> Self {
        Self {
            registry,
            options,
            depth: 0,
            buffers: Vec::new(),
            markers: SegmentMarkers::new(),
            pending: Vec::new(),
            results: Vec::new(),
            on_finished: Vec::new(),
            on_finished_chunks: Vec::new(),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<ReaderRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn options(&self) -> &DeserializeOptions {
        &self.options
    }

    /// Segment start offsets of the buffers registered so far.
    #[must_use]
    pub fn markers(&self) -> &SegmentMarkers {
        &self.markers
    }

    #[must_use]
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// File loads not yet collected by a pass.
    #[must_use]
    pub fn pending_loads(&self) -> usize {
        self.pending.len()
    }

    /// Append an in-memory buffer as a new segment.
    pub fn add_data(&mut self, data: Vec<u8>) {
        let start = self.markers.push(data.len() as u64);
        tracing::debug!("Added {} byte segment at 0x{start:X}", data.len());
        self.buffers.push(data);
    }

    /// Start reading a file in the background. It is appended when the next
    /// pass begins, unless the load fails or is cancelled first.
    pub fn add_data_from_file<P: AsRef<Path>>(&mut self, path: P) -> LoadHandle {
        let handle = LoadHandle {
            path: path.as_ref().to_path_buf(),
            cancelled: Arc::new(AtomicBool::new(false)),
        };

        let path = handle.path.clone();
        let cancelled = Arc::clone(&handle.cancelled);
        let thread = std::thread::spawn(move || {
            let interrupted = || std::io::Error::new(std::io::ErrorKind::Interrupted, "load cancelled");
            if cancelled.load(Ordering::SeqCst) {
                return Err(interrupted());
            }
            let data = std::fs::read(&path)?;
            if cancelled.load(Ordering::SeqCst) {
                return Err(interrupted());
            }
            Ok(data)
        });

        self.pending.push(PendingLoad {
            handle: handle.clone(),
            thread,
        });
        handle
    }

    /// Cancel pending loads and drop all buffers and markers.
    pub fn clear_data(&mut self) {
        for load in self.pending.drain(..) {
            load.handle.cancel();
        }
        self.buffers.clear();
        self.markers.clear();
    }

    /// Called after every successful pass.
    pub fn on_finished<F: FnMut() + Send + 'static>(&mut self, callback: F) {
        self.on_finished.push(Box::new(callback));
    }

    /// Called after every successful pass with the results about to be returned.
    pub fn on_finished_chunks<F: FnMut(&[ChunkResult]) + Send + 'static>(&mut self, callback: F) {
        self.on_finished_chunks.push(Box::new(callback));
    }

    /// Wait for file loads and add the ones that completed.
    fn collect_loads(&mut self) {
        for load in std::mem::take(&mut self.pending) {
            let path = load.handle.path().display().to_string();
            match load.thread.join() {
                Ok(Ok(_)) if load.handle.is_cancelled() => {
                    tracing::warn!("Dropping cancelled load of {path}");
                }
                Ok(Ok(data)) => self.add_data(data),
                Ok(Err(e)) => tracing::warn!("Dropping load of {path}: {e}"),
                Err(_) => tracing::warn!("Dropping load of {path}: reader thread panicked"),
            }
        }
    }

    /// Run one pass over everything added so far.
    ///
    /// Waits for file loads, concatenates all segments and walks the chunks.
    /// Compressed super-chunks are expanded and walked by a nested pass with the
    /// same registry. Chunks without a reader are skipped. After the walk the
    /// link pass runs and the callbacks fire.
    ///
    /// The results are handed over; the deserializer keeps its buffers but no
    /// results.
    ///
    /// # Errors
    /// Returns [`Error::MalformedChunk`] for chunks that do not fit the stream,
    /// [`Error::NestingTooDeep`] for super-chunks nested beyond the configured
    /// depth, and any error from the codecs or readers.
    pub fn start(&mut self) -> Result<Vec<ChunkResult>> {
        self.collect_loads();

        let stream: Cow<'_, [u8]> = match self.buffers.as_slice() {
            [] => Cow::Borrowed(&[]),
            [single] => Cow::Borrowed(single),
            many => Cow::Owned(many.concat()),
        };

        tracing::info!(
            "Deserializing {} bytes from {} segment(s) at depth {}",
            stream.len(),
            self.buffers.len(),
            self.depth
        );

        let pass = Pass {
            registry: &self.registry,
            markers: &self.markers,
            options: self.options,
            depth: self.depth,
        };

        if let Err(e) = pass.walk(&stream, &mut self.results) {
            self.results.clear();
            return Err(e);
        }

        link_sections(&mut self.results);

        for callback in &mut self.on_finished {
            callback();
        }
        for callback in &mut self.on_finished_chunks {
            callback(&self.results);
        }

        tracing::info!("Pass finished with {} result(s)", self.results.len());
        Ok(std::mem::take(&mut self.results))
    }
}

impl std::fmt::Debug for ChunkDeserializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkDeserializer")
            .field("registry", &self.registry)
            .field("options", &self.options)
            .field("depth", &self.depth)
            .field("markers", &self.markers)
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl Drop for ChunkDeserializer {
    fn drop(&mut self) {
        for load in &self.pending {
            load.handle.cancel();
        }
    }
}

/// Borrowed state of one pass over an assembled stream.
struct Pass<'a> {
    registry: &'a Arc<ReaderRegistry>,
    markers: &'a SegmentMarkers,
    options: DeserializeOptions,
    depth: usize,
}

impl Pass<'_> {
    fn walk(&self, stream: &[u8], results: &mut Vec<ChunkResult>) -> Result<()> {
        for entry in ChunkWalker::new(stream) {
            let entry = entry?;
            let id = entry.header.id;

            match entry.body {
                ChunkBody::Padding => {}
                ChunkBody::Compressed(blob) => {
                    results.extend(self.expand(entry.offset, blob)?);
                }
                ChunkBody::Data(bytes) => {
                    let Some(reader) = self.registry.get(id) else {
                        tracing::trace!("Skipping chunk 0x{id:08X} at 0x{:X}", entry.offset);
                        continue;
                    };

                    let base_offset = self.markers.base_offset_for(entry.offset as u64);
                    tracing::debug!(
                        "Decoding chunk 0x{id:08X} at 0x{:X} (file offset 0x{base_offset:X})",
                        entry.offset
                    );

                    let mut cursor = BinaryCursor::new(bytes);
                    let value = reader.decode(&mut cursor, base_offset)?;
                    results.push(ChunkResult::new(id, value));
                }
            }
        }
        Ok(())
    }

    /// Decompress a super-chunk and run a nested pass over it.
    fn expand(&self, offset: usize, blob: &[u8]) -> Result<Vec<ChunkResult>> {
        if self.depth >= self.options.max_nesting_depth {
            return Err(Error::NestingTooDeep {
                max_depth: self.options.max_nesting_depth,
            });
        }

        let decompressed = compression::decompress(blob)?;
        tracing::debug!(
            "Expanded super-chunk at 0x{offset:X}: {} -> {} bytes",
            blob.len(),
            decompressed.len()
        );

        let mut nested = ChunkDeserializer::with_options(Arc::clone(self.registry), self.options);
        nested.depth = self.depth + 1;
        nested.add_data(decompressed);
        nested.start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::BinaryCursor;
    use crate::chunk::reader::{ChunkReader, RawChunkReader};
    use crate::compression::{JlzOptions, jlz};
    use crate::model::DecodedValue;
    use std::sync::Mutex;

    fn chunk(id: u32, body: &[u8]) -> Vec<u8> {
        let mut data = id.to_le_bytes().to_vec();
        data.extend_from_slice(&(body.len() as i32).to_le_bytes());
        data.extend_from_slice(body);
        data
    }

    /// Records the base offset it was called with.
    struct OffsetReader(u32);

    impl ChunkReader for OffsetReader {
        fn chunk_id(&self) -> u32 {
            self.0
        }

        fn decode(&self, _cursor: &mut BinaryCursor<'_>, base_offset: u64) -> Result<DecodedValue> {
            Ok(DecodedValue::Unrecognized(base_offset.to_le_bytes().to_vec()))
        }
    }

    fn registry(ids: &[u32]) -> Arc<ReaderRegistry> {
        let mut registry = ReaderRegistry::new();
        for &id in ids {
            registry.register(RawChunkReader::new(id));
        }
        Arc::new(registry)
    }

    #[test]
    fn test_padding_only_stream() {
        let mut deserializer = ChunkDeserializer::new(registry(&[0x10]));
        let mut stream = chunk(0, &[0; 8]);
        stream.extend(chunk(0, &[]));
        deserializer.add_data(stream);

        assert!(deserializer.start().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_chunk_is_skipped() {
        let mut deserializer = ChunkDeserializer::new(registry(&[0x10]));
        deserializer.add_data(chunk(0xDEAD_BEEF, &[0; 4]));
        assert!(deserializer.start().unwrap().is_empty());
    }

    #[test]
    fn test_known_chunk_decoded() {
        let mut deserializer = ChunkDeserializer::new(registry(&[0x10]));
        let body = chunk(0x10, &[1, 2]);
        deserializer.add_data(body.clone());

        let results = deserializer.start().unwrap();
        assert_eq!(results, vec![ChunkResult::new(0x10, DecodedValue::Unrecognized(body))]);
    }

    #[test]
    fn test_markers_per_buffer() {
        let mut deserializer = ChunkDeserializer::new(registry(&[]));
        deserializer.add_data(vec![0; 100]);
        deserializer.add_data(vec![0; 150]);
        deserializer.add_data(vec![0; 8]);
        assert_eq!(deserializer.markers().as_slice(), &[0, 100, 250]);
        assert_eq!(deserializer.buffer_count(), 3);
    }

    #[test]
    fn test_base_offset_is_file_relative() {
        let mut registry = ReaderRegistry::new();
        registry.register(OffsetReader(0x20));
        let mut deserializer = ChunkDeserializer::new(Arc::new(registry));

        // First file: 100 bytes of padding
        deserializer.add_data(chunk(0, &[0; 92]));
        // Second file: padding to 80, then the chunk
        let mut second = chunk(0, &[0; 72]);
        second.extend(chunk(0x20, &[0; 4]));
        deserializer.add_data(second);

        let results = deserializer.start().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].value,
            DecodedValue::Unrecognized(80u64.to_le_bytes().to_vec())
        );
    }

    #[test]
    fn test_super_chunk_matches_flat_stream() {
        let mut leaves = chunk(0x10, &[1, 1, 1, 1]);
        leaves.extend(chunk(0xDEAD_BEEF, &[9; 3]));
        leaves.extend(chunk(0x11, &[2; 40]));
        leaves.extend(chunk(0x10, &[3; 12]));

        let mut flat = ChunkDeserializer::new(registry(&[0x10, 0x11]));
        flat.add_data(leaves.clone());
        let expected = flat.start().unwrap();
        assert_eq!(expected.len(), 3);

        let mut nested = ChunkDeserializer::new(registry(&[0x10, 0x11]));
        let mut stream = chunk(0, &[0; 8]);
        stream.extend(jlz::compress(&leaves, &JlzOptions::default()));
        nested.add_data(stream);

        assert_eq!(nested.start().unwrap(), expected);
    }

    #[test]
    fn test_nesting_depth_limit() {
        let inner = jlz::compress(&chunk(0x10, &[1; 8]), &JlzOptions::default());
        let outer = jlz::compress(&inner, &JlzOptions::default());

        let options = DeserializeOptions::new().with_max_nesting_depth(1);
        let mut deserializer = ChunkDeserializer::with_options(registry(&[0x10]), options);
        deserializer.add_data(outer.clone());
        assert!(matches!(
            deserializer.start(),
            Err(Error::NestingTooDeep { max_depth: 1 })
        ));

        let mut deserializer = ChunkDeserializer::new(registry(&[0x10]));
        deserializer.add_data(outer);
        assert_eq!(deserializer.start().unwrap().len(), 1);
    }

    #[test]
    fn test_truncated_chunk_is_malformed() {
        let mut deserializer = ChunkDeserializer::new(registry(&[0x10]));
        let mut stream = chunk(0x10, &[0; 8]);
        stream.truncate(12);
        deserializer.add_data(stream);

        assert!(matches!(
            deserializer.start(),
            Err(Error::MalformedChunk { offset: 0, .. })
        ));
    }

    #[test]
    fn test_callbacks_and_results_handed_over() {
        let finished = Arc::new(Mutex::new(0usize));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let mut deserializer = ChunkDeserializer::new(registry(&[0x10]));
        deserializer.add_data(chunk(0x10, &[]));

        let counter = Arc::clone(&finished);
        deserializer.on_finished(move || *counter.lock().unwrap() += 1);
        let sink = Arc::clone(&seen);
        deserializer.on_finished_chunks(move |results| {
            sink.lock().unwrap().extend(results.iter().map(|r| r.chunk_id));
        });

        let results = deserializer.start().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(*finished.lock().unwrap(), 1);
        assert_eq!(*seen.lock().unwrap(), vec![0x10]);

        // Buffers are kept, so a second pass yields the same chunk again
        assert_eq!(deserializer.start().unwrap().len(), 1);
        assert_eq!(*finished.lock().unwrap(), 2);
    }

    #[test]
    fn test_clear_data() {
        let mut deserializer = ChunkDeserializer::new(registry(&[0x10]));
        deserializer.add_data(chunk(0x10, &[]));
        let handle = deserializer.add_data_from_file("/nonexistent/file.bun");

        deserializer.clear_data();
        assert!(handle.is_cancelled());
        assert_eq!(deserializer.buffer_count(), 0);
        assert_eq!(deserializer.pending_loads(), 0);
        assert!(deserializer.markers().is_empty());
        assert!(deserializer.start().unwrap().is_empty());
    }

    #[test]
    fn test_failed_load_is_dropped() {
        let mut deserializer = ChunkDeserializer::new(registry(&[0x10]));
        deserializer.add_data(chunk(0x10, &[]));
        deserializer.add_data_from_file("/nonexistent/file.bun");

        assert_eq!(deserializer.start().unwrap().len(), 1);
        assert_eq!(deserializer.pending_loads(), 0);
    }
}
