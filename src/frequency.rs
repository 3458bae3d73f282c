//! Symbol frequency counting

use crate::error::CompressError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Occurrence count per byte symbol. Every stored count is at least 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyTable {
    counts: BTreeMap<u8, u64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every byte of `data`
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut freq = [0u64; 256];
        for &b in data {
            freq[b as usize] += 1;
        }
        let counts = freq
            .iter()
            .enumerate()
            .filter(|&(_, &f)| f > 0)
            .map(|(i, &f)| (i as u8, f))
            .collect();
        Self { counts }
    }

    /// Build from explicit (symbol, count) pairs. Zero counts and repeated
    /// symbols are rejected.
    pub fn from_counts<I>(pairs: I) -> Result<Self, CompressError>
    where
        I: IntoIterator<Item = (u8, u64)>,
    {
        let mut counts = BTreeMap::new();
        for (symbol, count) in pairs {
            if count == 0 {
                return Err(CompressError::HeaderParse(format!(
                    "symbol {symbol:#04x} has a zero count"
                )));
            }
            if counts.insert(symbol, count).is_some() {
                return Err(CompressError::HeaderParse(format!(
                    "symbol {symbol:#04x} listed twice"
                )));
            }
        }
        Ok(Self { counts })
    }

    /// Record one more occurrence of `symbol`
    pub fn add(&mut self, symbol: u8) {
        *self.counts.entry(symbol).or_insert(0) += 1;
    }

    pub fn get(&self, symbol: u8) -> Option<u64> {
        self.counts.get(&symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, i.e. the length of the counted input
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Entries in ascending symbol order
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts.iter().map(|(&s, &c)| (s, c))
    }

    /// Shannon entropy in bits per symbol
    pub fn entropy_bits(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let len = total as f64;
        let mut entropy = 0.0;
        for &f in self.counts.values() {
            let p = f as f64 / len;
            entropy -= p * p.log2();
        }
        entropy
    }
}
