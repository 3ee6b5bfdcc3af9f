use clap::Subcommand;
use std::path::PathBuf;

use crate::compression::Algorithm;

pub mod chunks;
pub mod compression;

#[derive(Subcommand)]
pub enum Commands {
    /// Show the codec and header fields of a compressed blob
    Detect {
        /// Compressed file
        path: PathBuf,
    },

    /// Decompress a blob (JDLZ, COMP or RAWW)
    Decompress {
        /// Compressed file
        path: PathBuf,

        /// Output file (defaults to <name>_decompressed.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Compress a file
    Compress {
        /// Input file
        path: PathBuf,

        /// Output file (defaults to <name>_compressed.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Codec: jlz/jdlz, raw, oldlz/comp, huff. Picks the smallest when omitted
        #[arg(short, long)]
        algorithm: Option<Algorithm>,

        /// Store the data as an uncompressed COMP blob
        #[arg(long, conflicts_with = "algorithm")]
        stored: bool,

        /// JDLZ hash table size (rounded up to a power of two)
        #[arg(long, default_value_t = 0x2000)]
        hash_size: usize,

        /// JDLZ hash chain search depth
        #[arg(long, default_value_t = 16)]
        search_depth: usize,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// List the chunk tree of one or more files read as a single stream
    Chunks {
        /// Files, concatenated in order
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Maximum nesting depth of compressed chunks
        #[arg(long, default_value_t = 8)]
        max_depth: usize,
    },
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Detect { path } => compression::detect(path),
            Commands::Decompress {
                path,
                output,
                quiet,
            } => compression::decompress(path, output.as_deref(), !*quiet),
            Commands::Compress {
                path,
                output,
                algorithm,
                stored,
                hash_size,
                search_depth,
                quiet,
            } => compression::compress(
                path,
                output.as_deref(),
                &compression::CompressArgs {
                    algorithm: *algorithm,
                    stored: *stored,
                    hash_size: *hash_size,
                    search_depth: *search_depth,
                },
                !*quiet,
            ),
            Commands::Chunks {
                paths,
                json,
                max_depth,
            } => chunks::execute(paths, *json, *max_depth),
        }
    }
}
