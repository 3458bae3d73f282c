use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use huffpack::archive::Archive;
use huffpack::config::{CompressionConfig, HeaderFormat};
use huffpack::fs::{self as hfs, SplitPaths};
use huffpack::Compressor;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Huffman file compressor.
#[derive(Parser, Debug)]
#[command(author, version, about = "Deterministic Huffman file compressor", long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a file
    Compress {
        input: PathBuf,
        /// Archive path (defaults to <input>.huf)
        #[arg(short, long, conflicts_with = "split")]
        output: Option<PathBuf>,
        /// Write header and payload to separate .hdr/.enc files
        #[arg(long)]
        split: bool,
        /// Use the binary header encoding
        #[arg(long)]
        binary_header: bool,
    },
    /// Decompress an archive, or a split pair when given the .hdr file
    Decompress {
        input: PathBuf,
        /// Decoded file path (defaults to <input>.dec)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the code table stored in an archive or header file
    Inspect { input: PathBuf },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => CompressionConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CompressionConfig::default(),
    };

    match cli.command {
        Command::Compress {
            input,
            output,
            split,
            binary_header,
        } => {
            if binary_header {
                config.header_format = HeaderFormat::Binary;
            }
            let compressor = Compressor::new(config);
            if split {
                hfs::compress_file_split(&compressor, &input)
                    .with_context(|| format!("compressing {}", input.display()))?;
            } else {
                hfs::compress_file(&compressor, &input, output.as_deref())
                    .with_context(|| format!("compressing {}", input.display()))?;
            }
        }
        Command::Decompress { input, output } => {
            let compressor = Compressor::new(config);
            let is_header = input
                .extension()
                .is_some_and(|ext| ext == hfs::HEADER_EXTENSION);
            if is_header {
                let paths = SplitPaths::beside(&input);
                hfs::decompress_split(&compressor, &paths, output.as_deref())
                    .with_context(|| format!("decompressing {}", input.display()))?;
            } else {
                hfs::decompress_file(&compressor, &input, output.as_deref())
                    .with_context(|| format!("decompressing {}", input.display()))?;
            }
        }
        Command::Inspect { input } => {
            let data = std::fs::read(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let is_header = input
                .extension()
                .is_some_and(|ext| ext == hfs::HEADER_EXTENSION);
            let archive = if is_header {
                Archive::from_parts(&data, &[])
            } else {
                Archive::from_bytes(&data)
            }
            .with_context(|| format!("parsing {}", input.display()))?;

            println!(
                "payload: {} bytes, {} meaningful bits",
                archive.payload.total_bytes, archive.payload.cutoff_index
            );
            for record in &archive.records {
                println!(
                    "{:#04x}  {:>10}  {}",
                    record.symbol, record.frequency, record.path
                );
            }
        }
    }

    Ok(())
}
