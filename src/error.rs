//! Error types for huffpack

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("empty input")]
    EmptyInput,

    #[error("input of {size} bytes exceeds the configured limit of {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },

    #[error("header parse error: {0}")]
    HeaderParse(String),

    #[error("corrupt header: {0}")]
    CorruptHeader(String),

    #[error("symbol {0:#04x} is not in the code table")]
    UnknownSymbol(u8),

    #[error("bit stream ended mid-code after {consumed} bits")]
    TruncatedStream { consumed: usize },

    #[error("decompression size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerializationError(String),
}

impl From<bincode::Error> for CompressError {
    fn from(e: bincode::Error) -> Self {
        CompressError::SerializationError(e.to_string())
    }
}

impl From<serde_json::Error> for CompressError {
    fn from(e: serde_json::Error) -> Self {
        CompressError::SerializationError(e.to_string())
    }
}
