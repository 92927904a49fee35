use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Gap marker used in aligned output.
pub const GAP: u8 = b'-';

/// Definite bases.
pub const DEFINITE_BASES: &[u8] = b"ACGT";

/// IUPAC ambiguity codes accepted alongside the definite bases.
pub const AMBIGUITY_CODES: &[u8] = b"RYSWKMBDHVN";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("invalid nucleotide symbol {symbol:?} at position {position}")]
    InvalidSymbol { symbol: char, position: usize },
}

#[inline]
pub fn is_definite(symbol: u8) -> bool {
    DEFINITE_BASES.contains(&symbol)
}

#[inline]
pub fn is_nucleotide(symbol: u8) -> bool {
    is_definite(symbol) || AMBIGUITY_CODES.contains(&symbol)
}

/// An immutable nucleotide sequence.
///
/// Symbols are stored upper-case. Construction rejects anything outside the
/// IUPAC DNA alphabet, including gap characters. An empty sequence can be
/// built; the aligner refuses it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sequence {
    data: Vec<u8>,
}

impl Sequence {
    pub fn new(data: &[u8]) -> Result<Self, SequenceError> {
        let mut normalized = Vec::with_capacity(data.len());
        for (position, &b) in data.iter().enumerate() {
            let up = b.to_ascii_uppercase();
            if !is_nucleotide(up) {
                return Err(SequenceError::InvalidSymbol {
                    symbol: b as char,
                    position,
                });
            }
            normalized.push(up);
        }
        Ok(Self { data: normalized })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Number of non-ACGT symbols among the first `limit` positions
    /// (all positions when `limit` is `None`), together with the number of
    /// positions inspected.
    pub fn count_indefinite(&self, limit: Option<usize>) -> (usize, usize) {
        let end = limit.map_or(self.data.len(), |n| n.min(self.data.len()));
        let window = &self.data[..end];
        let indefinite = window.iter().filter(|&&b| !is_definite(b)).count();
        (indefinite, window.len())
    }
}

impl FromStr for Sequence {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.as_bytes())
    }
}

impl AsRef<[u8]> for Sequence {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only ASCII alphabet symbols are ever stored.
        f.write_str(&String::from_utf8_lossy(&self.data))
    }
}
