//! File collaborators around the in-memory compressor
//!
//! Inputs are read whole; outputs are written next to the input unless an
//! explicit path is given. Single-file archives use `.huf`; split mode writes
//! the header to `.hdr` and the payload to `.enc`. Decoded output goes to
//! `.dec`.

use crate::archive::Archive;
use crate::error::CompressError;
use crate::Compressor;
use std::fs;
use std::path::{Path, PathBuf};

pub const ARCHIVE_EXTENSION: &str = "huf";
pub const HEADER_EXTENSION: &str = "hdr";
pub const PAYLOAD_EXTENSION: &str = "enc";
pub const DECODED_EXTENSION: &str = "dec";

/// Locations of a split header/payload pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPaths {
    pub header: PathBuf,
    pub payload: PathBuf,
}

impl SplitPaths {
    /// `<stem>.hdr` and `<stem>.enc` beside `path`
    pub fn beside(path: &Path) -> Self {
        Self {
            header: path.with_extension(HEADER_EXTENSION),
            payload: path.with_extension(PAYLOAD_EXTENSION),
        }
    }
}

/// Compress `input` into a single archive file and return its path
pub fn compress_file(
    compressor: &Compressor,
    input: &Path,
    output: Option<&Path>,
) -> Result<PathBuf, CompressError> {
    let data = fs::read(input)?;
    let archive = compressor.compress_to_archive(&data)?;
    let target = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension(ARCHIVE_EXTENSION));
    fs::write(&target, &archive)?;
    tracing::info!(
        input = %input.display(),
        output = %target.display(),
        original = data.len(),
        compressed = archive.len(),
        "wrote archive"
    );
    Ok(target)
}

/// Compress `input` into separate header and payload files
pub fn compress_file_split(
    compressor: &Compressor,
    input: &Path,
) -> Result<SplitPaths, CompressError> {
    let data = fs::read(input)?;
    let archive = compressor.compress(&data)?.to_archive();
    let paths = SplitPaths::beside(input);
    fs::write(
        &paths.header,
        archive.header_bytes(compressor.config().header_format)?,
    )?;
    fs::write(&paths.payload, &archive.payload.bytes)?;
    tracing::info!(
        header = %paths.header.display(),
        payload = %paths.payload.display(),
        payload_bytes = archive.payload.total_bytes,
        "wrote split archive"
    );
    Ok(paths)
}

/// Decompress a single archive file and return the path of the decoded file
pub fn decompress_file(
    compressor: &Compressor,
    input: &Path,
    output: Option<&Path>,
) -> Result<PathBuf, CompressError> {
    let data = fs::read(input)?;
    let decoded = compressor.decompress_archive(&data)?;
    write_decoded(input, output, &decoded)
}

/// Decompress a split header/payload pair
pub fn decompress_split(
    compressor: &Compressor,
    paths: &SplitPaths,
    output: Option<&Path>,
) -> Result<PathBuf, CompressError> {
    let header = fs::read(&paths.header)?;
    let payload = fs::read(&paths.payload)?;
    let archive = Archive::from_parts(&header, &payload)?;
    let decoded = compressor.decompress_parsed(&archive)?;
    write_decoded(&paths.payload, output, &decoded)
}

fn write_decoded(
    input: &Path,
    output: Option<&Path>,
    decoded: &[u8],
) -> Result<PathBuf, CompressError> {
    let target = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension(DECODED_EXTENSION));
    fs::write(&target, decoded)?;
    tracing::info!(output = %target.display(), bytes = decoded.len(), "wrote decoded file");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_paths() {
        let paths = SplitPaths::beside(Path::new("/tmp/data/notes.txt"));
        assert_eq!(paths.header, Path::new("/tmp/data/notes.hdr"));
        assert_eq!(paths.payload, Path::new("/tmp/data/notes.enc"));
    }

    #[test]
    fn test_missing_input() {
        let compressor = Compressor::default();
        let result = compress_file(&compressor, Path::new("/nonexistent/huffpack/input"), None);
        assert!(matches!(result, Err(CompressError::IoError(_))));
    }
}
