//! Chunk listing command

use std::path::PathBuf;

use serde::Serialize;

use crate::chunk::{ChunkInfo, ChunkKind, DeserializeOptions, SegmentMarkers, inspect_chunks};

#[derive(Serialize)]
struct SegmentReport {
    path: String,
    offset: u64,
    length: u64,
}

#[derive(Serialize)]
struct ChunksReport {
    segments: Vec<SegmentReport>,
    chunks: Vec<ChunkInfo>,
}

/// List the chunks of the files read as one stream.
pub fn execute(paths: &[PathBuf], json: bool, max_depth: usize) -> anyhow::Result<()> {
    let mut stream = Vec::new();
    let mut markers = SegmentMarkers::new();
    let mut segments = Vec::with_capacity(paths.len());

    for path in paths {
        let data = std::fs::read(path)?;
        let offset = markers.push(data.len() as u64);
        segments.push(SegmentReport {
            path: path.display().to_string(),
            offset,
            length: data.len() as u64,
        });
        stream.extend_from_slice(&data);
    }

    let options = DeserializeOptions::new().with_max_nesting_depth(max_depth);
    let chunks = inspect_chunks(&stream, &options)?;

    if json {
        let report = ChunksReport { segments, chunks };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Segments:");
    for (i, segment) in segments.iter().enumerate() {
        println!(
            "  [{i}] 0x{:08X}  {} ({} bytes)",
            segment.offset, segment.path, segment.length
        );
    }
    println!();

    let total: usize = chunks.iter().map(ChunkInfo::count).sum();
    println!("Chunks ({total}):");
    println!("  {:<10}  {:<10}  {:<10}  {:>10}  Kind", "Offset", "File off.", "Id", "Length");
    for chunk in &chunks {
        let file_offset = markers.base_offset_for(chunk.offset);
        print_chunk(chunk, Some(file_offset), 0);
    }

    Ok(())
}

fn print_chunk(chunk: &ChunkInfo, file_offset: Option<u64>, depth: usize) {
    let indent = "  ".repeat(depth);
    let file_offset = file_offset.map_or_else(|| "-".to_string(), |o| format!("0x{o:08X}"));

    let kind = match &chunk.kind {
        ChunkKind::Padding => "padding".to_string(),
        ChunkKind::Data => "data".to_string(),
        ChunkKind::Compressed {
            algorithm,
            compressed_size,
            uncompressed_size,
            ..
        } => format!("{algorithm} {compressed_size} -> {uncompressed_size} bytes"),
    };

    println!(
        "  {indent}0x{:08X}  {file_offset:<10}  0x{:08X}  {:>10}  {kind}",
        chunk.offset, chunk.id, chunk.length
    );

    if let ChunkKind::Compressed { children, .. } = &chunk.kind {
        for child in children {
            print_chunk(child, None, depth + 1);
        }
    }
}
