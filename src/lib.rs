//! huffpack: deterministic Huffman compression.
//!
//! Pipeline:
//! - count byte frequencies
//! - build the Huffman tree (ties broken by smallest covered symbol)
//! - serialize the code table as a header
//! - pack the code bits MSB-first with explicit padding accounting
//!
//! Decompression rebuilds the tree from the header's code paths alone and
//! walks the unpacked bits back into symbols.

pub mod archive;
pub mod bits;
pub mod codec;
pub mod config;
pub mod error;
pub mod frequency;
pub mod fs;
pub mod tree;
pub mod walker;

use crate::archive::Archive;
use crate::bits::PackedPayload;
use crate::codec::CodeTableRecord;
use crate::config::CompressionConfig;
use crate::error::CompressError;
use crate::frequency::FrequencyTable;

/// Compressed output container
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompressedOutput {
    pub original_size: usize,
    pub compressed_size: usize,
    pub records: Vec<CodeTableRecord>,
    pub payload: PackedPayload,
    pub ratio: f64,
    pub metadata: CompressionMetadata,
}

/// Metadata about the compression process
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompressionMetadata {
    pub entropy_bits: f64,
    pub symbol_count: usize,
    pub max_code_len: usize,
}

impl CompressedOutput {
    /// Header + payload view used for storage
    pub fn to_archive(&self) -> Archive {
        Archive::new(self.records.clone(), self.payload.clone())
    }
}

/// The main compressor engine
pub struct Compressor {
    config: CompressionConfig,
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new(CompressionConfig::default())
    }
}

impl Compressor {
    /// Create a new compressor with the given configuration
    pub fn new(config: CompressionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    /// Compress data into a code table and packed payload
    pub fn compress(&self, data: &[u8]) -> Result<CompressedOutput, CompressError> {
        if data.is_empty() {
            return Err(CompressError::EmptyInput);
        }
        if data.len() > self.config.max_input_size {
            return Err(CompressError::InputTooLarge {
                size: data.len(),
                limit: self.config.max_input_size,
            });
        }

        let table = FrequencyTable::from_bytes(data);
        let entropy_bits = table.entropy_bits();
        let tree = tree::build(&table)?;
        let records = codec::serialize(&tree);
        let code_bits = walker::encode(&tree, data)?;
        let payload = bits::pack(&code_bits)?;

        let archive = Archive::new(records, payload);
        let compressed_size = archive.to_bytes(self.config.header_format)?.len();
        tracing::debug!(
            original = data.len(),
            compressed = compressed_size,
            payload_bits = archive.payload.cutoff_index,
            "compressed input"
        );

        let Archive { records, payload } = archive;
        let output = CompressedOutput {
            original_size: data.len(),
            compressed_size,
            records,
            payload,
            ratio: compressed_size as f64 / data.len() as f64,
            metadata: CompressionMetadata {
                entropy_bits,
                symbol_count: tree.symbol_count(),
                max_code_len: tree.max_code_len(),
            },
        };

        if self.config.verify_roundtrip {
            let decoded = self.decompress(&output)?;
            if decoded != data {
                return Err(CompressError::SizeMismatch {
                    expected: data.len(),
                    actual: decoded.len(),
                });
            }
        }
        Ok(output)
    }

    /// Decompress data, checking it against the recorded original size
    pub fn decompress(&self, output: &CompressedOutput) -> Result<Vec<u8>, CompressError> {
        let decoded = decode_parts(&output.records, &output.payload)?;
        if decoded.len() != output.original_size {
            return Err(CompressError::SizeMismatch {
                expected: output.original_size,
                actual: decoded.len(),
            });
        }
        Ok(decoded)
    }

    /// Compress into a single self-describing archive buffer
    pub fn compress_to_archive(&self, data: &[u8]) -> Result<Vec<u8>, CompressError> {
        let output = self.compress(data)?;
        output.to_archive().to_bytes(self.config.header_format)
    }

    /// Decompress an archive buffer produced by [`Compressor::compress_to_archive`]
    pub fn decompress_archive(&self, data: &[u8]) -> Result<Vec<u8>, CompressError> {
        let archive = Archive::from_bytes(data)?;
        self.decompress_parsed(&archive)
    }

    /// Decompress an already parsed archive
    pub fn decompress_parsed(&self, archive: &Archive) -> Result<Vec<u8>, CompressError> {
        let decoded = decode_parts(&archive.records, &archive.payload)?;
        tracing::debug!(
            symbols = archive.records.len(),
            decoded = decoded.len(),
            "decompressed archive"
        );
        Ok(decoded)
    }
}

fn decode_parts(
    records: &[CodeTableRecord],
    payload: &PackedPayload,
) -> Result<Vec<u8>, CompressError> {
    let tree = codec::rebuild(records)?;
    let bits = payload.unpack()?;
    walker::decode(&tree, &bits)
}
