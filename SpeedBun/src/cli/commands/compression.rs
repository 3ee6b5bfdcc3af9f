//! Compression CLI commands

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::progress::{DISK, LOOKING_GLASS, PACKAGE, print_done, print_step, size_change};
use crate::compression::{
    self, Algorithm, CompressionHeader, JlzOptions, compress_with_options, oldlz,
};

/// Options for the `compress` command.
pub struct CompressArgs {
    pub algorithm: Option<Algorithm>,
    pub stored: bool,
    pub hash_size: usize,
    pub search_depth: usize,
}

fn default_output(path: &Path, suffix: &str) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("bin");
    path.with_file_name(format!("{stem}_{suffix}.{ext}"))
}

/// Show the codec of a compressed blob and its header.
pub fn detect(path: &Path) -> anyhow::Result<()> {
    let data = std::fs::read(path)?;
    let header = CompressionHeader::parse(&data)?;
    let algorithm = Algorithm::detect(&data)?;

    println!("Compressed blob: {}", path.display());
    println!();
    println!("Algorithm:         {algorithm}");
    println!("Version:           0x{:02X}", header.version);
    println!("Header size:       {} bytes", header.header_size);
    println!("Flags:             0x{:04X}", header.flags);
    println!("Uncompressed size: {} bytes", header.uncompressed_size);
    println!("Compressed size:   {} bytes", header.compressed_size);
    println!("File size:         {} bytes", data.len());

    if algorithm == Algorithm::OldLz && header.flags == oldlz::STORED_FLAG {
        println!("(stored, not compressed)");
    }

    Ok(())
}

/// Decompress a blob through the codec dispatcher.
pub fn decompress(path: &Path, output: Option<&Path>, show_progress: bool) -> anyhow::Result<()> {
    let output_path = output.map_or_else(|| default_output(path, "decompressed"), Path::to_path_buf);
    let start = Instant::now();

    if show_progress {
        print_step(1, 3, LOOKING_GLASS, &format!("Reading {}", path.display()));
    }
    let data = std::fs::read(path)?;

    if show_progress {
        print_step(2, 3, PACKAGE, "Decompressing...");
    }
    let decompressed = compression::decompress(&data)?;

    if show_progress {
        print_step(3, 3, DISK, &format!("Writing {}", output_path.display()));
    }
    std::fs::write(&output_path, &decompressed)?;

    if show_progress {
        println!();
        println!("  Compressed size:   {} bytes", data.len());
        println!("  Decompressed size: {} bytes", decompressed.len());
        print_done(start.elapsed());
    }

    Ok(())
}

/// Compress a file through the codec dispatcher.
pub fn compress(
    path: &Path,
    output: Option<&Path>,
    args: &CompressArgs,
    show_progress: bool,
) -> anyhow::Result<()> {
    let output_path = output.map_or_else(|| default_output(path, "compressed"), Path::to_path_buf);
    let start = Instant::now();

    if show_progress {
        print_step(1, 3, LOOKING_GLASS, &format!("Reading {}", path.display()));
    }
    let data = std::fs::read(path)?;

    if show_progress {
        let method = match (args.stored, args.algorithm) {
            (true, _) => "stored COMP".to_string(),
            (false, Some(algorithm)) => algorithm.to_string(),
            (false, None) => "best codec".to_string(),
        };
        print_step(2, 3, PACKAGE, &format!("Compressing with {method}..."));
    }

    let packed = if args.stored {
        oldlz::compress_stored(&data)
    } else {
        let options = JlzOptions::new()
            .with_hash_size(args.hash_size)
            .with_max_search_depth(args.search_depth);
        compress_with_options(&data, args.algorithm, &options)?
    };

    if show_progress {
        print_step(3, 3, DISK, &format!("Writing {}", output_path.display()));
    }
    std::fs::write(&output_path, &packed)?;

    if show_progress {
        let algorithm = Algorithm::detect(&packed)?;
        println!();
        println!("  Algorithm:         {algorithm}");
        println!("  Original size:     {} bytes", data.len());
        println!(
            "  Compressed size:   {} bytes ({})",
            packed.len(),
            size_change(data.len(), packed.len())
        );
        print_done(start.elapsed());
    }

    Ok(())
}
