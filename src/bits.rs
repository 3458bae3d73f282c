//! Bit strings and MSB-first byte packing
//!
//! A packed payload always holds at least one byte. `cutoff_index` counts the
//! meaningful bits; everything after it in the last byte is zero padding and
//! is never handed back to the decoder.

use crate::error::CompressError;
use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

/// Sequence of bits, written as `0`/`1` characters in text form
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Bits(Vec<bool>);

impl Bits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn push(&mut self, bit: bool) {
        self.0.push(bit);
    }

    /// Append all of `other`
    pub fn extend_from(&mut self, other: &Bits) {
        self.0.extend_from_slice(&other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }

    pub fn last(&self) -> Option<bool> {
        self.0.last().copied()
    }

    /// Copy with `bit` appended
    pub fn child(&self, bit: bool) -> Bits {
        let mut path = Vec::with_capacity(self.0.len() + 1);
        path.extend_from_slice(&self.0);
        path.push(bit);
        Bits(path)
    }

    /// Copy without the last bit; `None` for the empty string
    pub fn parent(&self) -> Option<Bits> {
        let (_, rest) = self.0.split_last()?;
        Some(Bits(rest.to_vec()))
    }

    /// Copy with the last bit flipped; `None` for the empty string
    pub fn sibling(&self) -> Option<Bits> {
        let (&last, rest) = self.0.split_last()?;
        let mut path = rest.to_vec();
        path.push(!last);
        Some(Bits(path))
    }

    pub fn is_prefix_of(&self, other: &Bits) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl From<Vec<bool>> for Bits {
    fn from(bits: Vec<bool>) -> Self {
        Self(bits)
    }
}

impl FromIterator<bool> for Bits {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Bits {
    type Err = CompressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(CompressError::HeaderParse(format!(
                    "invalid bit {other:?} in {s:?}"
                ))),
            })
            .collect()
    }
}

/// Packed bytes plus the accounting needed to strip the padding again
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedPayload {
    pub bytes: Vec<u8>,
    pub total_bytes: usize,
    pub cutoff_index: usize,
}

impl PackedPayload {
    /// Expand back into the meaningful bits
    pub fn unpack(&self) -> Result<Bits, CompressError> {
        unpack(&self.bytes, self.total_bytes, self.cutoff_index)
    }
}

/// Pack `bits` MSB-first, zero-padding the final byte
pub fn pack(bits: &Bits) -> Result<PackedPayload, CompressError> {
    let rest_bits = (8 - bits.len() % 8) % 8;
    let mut bytes = Vec::with_capacity(bits.len().div_ceil(8).max(1));
    {
        let mut w = BitWriter::endian(&mut bytes, BigEndian);
        for bit in bits.iter() {
            w.write_bit(bit)?;
        }
        for _ in 0..rest_bits {
            w.write_bit(false)?;
        }
        // minimum one byte of output
        if bits.is_empty() {
            w.write(8, 0u8)?;
        }
    }

    let total_bytes = bytes.len();
    tracing::trace!(bits = bits.len(), rest_bits, total_bytes, "packed bit string");
    Ok(PackedPayload {
        bytes,
        total_bytes,
        cutoff_index: bits.len(),
    })
}

/// Expand `bytes` MSB-first and keep the first `cutoff_index` bits
pub fn unpack(bytes: &[u8], total_bytes: usize, cutoff_index: usize) -> Result<Bits, CompressError> {
    if bytes.len() != total_bytes {
        return Err(CompressError::CorruptHeader(format!(
            "header declares {total_bytes} payload bytes, found {}",
            bytes.len()
        )));
    }
    let expected_bytes = cutoff_index.div_ceil(8).max(1);
    if expected_bytes != total_bytes {
        return Err(CompressError::CorruptHeader(format!(
            "cutoff index {cutoff_index} needs {expected_bytes} payload bytes, header declares {total_bytes}"
        )));
    }

    let mut r = BitReader::endian(Cursor::new(bytes), BigEndian);
    let mut bits = Bits::with_capacity(cutoff_index);
    for _ in 0..cutoff_index {
        bits.push(r.read_bit()?);
    }
    Ok(bits)
}
