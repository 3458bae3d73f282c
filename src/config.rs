//! Configuration for huffpack

use crate::error::CompressError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Encoding used for the code-table header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderFormat {
    /// `totalBytes;cutoff` line followed by a `symbol:path:freq;` record line
    #[default]
    Text,
    /// `HUFB` magic, length prefix, bincode body
    Binary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    pub header_format: HeaderFormat,
    pub max_input_size: usize,
    pub verify_roundtrip: bool,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            header_format: HeaderFormat::Text,
            max_input_size: 100 * 1024 * 1024, // 100 MB
            verify_roundtrip: false,
        }
    }
}

impl CompressionConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, CompressError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CompressError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = CompressionConfig::from_json(r#"{"header_format": "binary"}"#).unwrap();
        assert_eq!(config.header_format, HeaderFormat::Binary);
        assert_eq!(config.max_input_size, 100 * 1024 * 1024);
        assert!(!config.verify_roundtrip);
    }

    #[test]
    fn test_invalid_json() {
        let result = CompressionConfig::from_json("{\"header_format\": 3}");
        assert!(matches!(result, Err(CompressError::SerializationError(_))));
    }
}
