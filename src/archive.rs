//! Header + payload container
//!
//! Text header:
//! ```text
//! <totalBytes>;<cutoffIndex>\n
//! <symbol:path:freq;...>\n
//! ```
//! Binary header: `HUFB`, little-endian `u32` body length, bincode body.
//! In a single-file archive the payload bytes follow the header directly;
//! split mode stores header and payload as separate artifacts.

use crate::bits::PackedPayload;
use crate::codec::{self, CodeTableRecord};
use crate::config::HeaderFormat;
use crate::error::CompressError;
use serde::{Deserialize, Serialize};

pub const BINARY_MAGIC: &[u8; 4] = b"HUFB";

#[derive(Serialize)]
struct BinaryHeaderRef<'a> {
    total_bytes: u64,
    cutoff_index: u64,
    records: &'a [CodeTableRecord],
}

#[derive(Deserialize)]
struct BinaryHeader {
    total_bytes: u64,
    cutoff_index: u64,
    records: Vec<CodeTableRecord>,
}

struct ParsedHeader {
    total_bytes: usize,
    cutoff_index: usize,
    records: Vec<CodeTableRecord>,
    consumed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archive {
    pub records: Vec<CodeTableRecord>,
    pub payload: PackedPayload,
}

impl Archive {
    pub fn new(records: Vec<CodeTableRecord>, payload: PackedPayload) -> Self {
        Self { records, payload }
    }

    /// Serialize header and payload into one buffer
    pub fn to_bytes(&self, format: HeaderFormat) -> Result<Vec<u8>, CompressError> {
        let mut output = self.header_bytes(format)?;
        output.extend_from_slice(&self.payload.bytes);
        Ok(output)
    }

    /// Serialize only the header, for storage apart from the payload
    pub fn header_bytes(&self, format: HeaderFormat) -> Result<Vec<u8>, CompressError> {
        match format {
            HeaderFormat::Text => {
                let header = format!(
                    "{};{}\n{}\n",
                    self.payload.total_bytes,
                    self.payload.cutoff_index,
                    codec::to_text(&self.records)
                );
                Ok(header.into_bytes())
            }
            HeaderFormat::Binary => {
                let body = bincode::serialize(&BinaryHeaderRef {
                    total_bytes: self.payload.total_bytes as u64,
                    cutoff_index: self.payload.cutoff_index as u64,
                    records: &self.records,
                })?;
                let len = u32::try_from(body.len()).map_err(|_| {
                    CompressError::SerializationError("binary header exceeds 4 GiB".into())
                })?;
                let mut output = Vec::with_capacity(8 + body.len());
                output.extend_from_slice(BINARY_MAGIC);
                output.extend_from_slice(&len.to_le_bytes());
                output.extend_from_slice(&body);
                Ok(output)
            }
        }
    }

    /// Parse a single-file archive; the header format is detected
    pub fn from_bytes(data: &[u8]) -> Result<Self, CompressError> {
        let header = parse_header(data)?;
        let payload = &data[header.consumed..];
        Ok(Self::assemble(header, payload))
    }

    /// Parse a header artifact and its separately stored payload
    pub fn from_parts(header: &[u8], payload: &[u8]) -> Result<Self, CompressError> {
        let parsed = parse_header(header)?;
        if parsed.consumed != header.len() {
            return Err(CompressError::HeaderParse(format!(
                "{} trailing bytes after header",
                header.len() - parsed.consumed
            )));
        }
        Ok(Self::assemble(parsed, payload))
    }

    /// Detected header format of `data`
    pub fn sniff_format(data: &[u8]) -> HeaderFormat {
        if data.starts_with(BINARY_MAGIC) {
            HeaderFormat::Binary
        } else {
            HeaderFormat::Text
        }
    }

    fn assemble(header: ParsedHeader, payload: &[u8]) -> Self {
        Self {
            records: header.records,
            payload: PackedPayload {
                bytes: payload.to_vec(),
                total_bytes: header.total_bytes,
                cutoff_index: header.cutoff_index,
            },
        }
    }
}

fn parse_header(data: &[u8]) -> Result<ParsedHeader, CompressError> {
    match Archive::sniff_format(data) {
        HeaderFormat::Binary => parse_binary_header(data),
        HeaderFormat::Text => parse_text_header(data),
    }
}

fn parse_binary_header(data: &[u8]) -> Result<ParsedHeader, CompressError> {
    let Some(len_bytes) = data.get(4..8) else {
        return Err(CompressError::HeaderParse("truncated binary header".into()));
    };
    let mut len = [0u8; 4];
    len.copy_from_slice(len_bytes);
    let len = u32::from_le_bytes(len) as usize;
    let body = data
        .get(8..8 + len)
        .ok_or_else(|| CompressError::HeaderParse("truncated binary header body".into()))?;
    let header: BinaryHeader = bincode::deserialize(body)
        .map_err(|e| CompressError::HeaderParse(format!("binary header: {e}")))?;

    Ok(ParsedHeader {
        total_bytes: to_usize(header.total_bytes)?,
        cutoff_index: to_usize(header.cutoff_index)?,
        records: header.records,
        consumed: 8 + len,
    })
}

fn parse_text_header(data: &[u8]) -> Result<ParsedHeader, CompressError> {
    let (counts, rest) = split_line(data)
        .ok_or_else(|| CompressError::HeaderParse("missing byte-count line".into()))?;
    let (line, _) = split_line(rest)
        .ok_or_else(|| CompressError::HeaderParse("missing code table line".into()))?;
    let consumed = data.len() - rest.len() + line.len() + 1;

    let counts = std::str::from_utf8(counts)
        .map_err(|_| CompressError::HeaderParse("byte-count line is not UTF-8".into()))?;
    let (total_bytes, cutoff_index) = counts
        .trim_end_matches('\r')
        .split_once(';')
        .and_then(|(t, c)| Some((t.parse::<usize>().ok()?, c.parse::<usize>().ok()?)))
        .ok_or_else(|| {
            CompressError::HeaderParse(format!("invalid byte-count line {counts:?}"))
        })?;

    let line = std::str::from_utf8(line)
        .map_err(|_| CompressError::HeaderParse("code table line is not UTF-8".into()))?;
    let records = codec::parse_text(line)?;

    Ok(ParsedHeader {
        total_bytes,
        cutoff_index,
        records,
        consumed,
    })
}

/// Split at the first newline, dropping it
fn split_line(data: &[u8]) -> Option<(&[u8], &[u8])> {
    let pos = data.iter().position(|&b| b == b'\n')?;
    Some((&data[..pos], &data[pos + 1..]))
}

fn to_usize(value: u64) -> Result<usize, CompressError> {
    usize::try_from(value)
        .map_err(|_| CompressError::CorruptHeader(format!("count {value} does not fit in memory")))
}
