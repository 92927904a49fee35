//! FASTA ingestion for the aligner.
//!
//! Alignment inputs come from single-record files whose leading positions
//! are checked for definite bases before use. Multi-record files can be
//! counted, or reduced to their first record.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use bio::io::fasta;
use log::{debug, warn};
use thiserror::Error;

use crate::sequence::{Sequence, SequenceError};

/// Positions inspected by [`ValidationLevel::Min`].
pub const MIN_VALIDATION_POSITIONS: usize = 50;

const COUNT_PREFIX: &str = "Sequences contained: ";

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("At least one sequence record must be present, but none were found.")]
    NoRecords,
    #[error("At most one sequence record must be present, but more than one record was found.")]
    MultipleRecords,
    #[error("record {header:?} has no sequence data")]
    EmptyRecord { header: String },
    #[error("record {header:?}: {source}")]
    InvalidSequence {
        header: String,
        #[source]
        source: SequenceError,
    },
    #[error("{count} non-ACGT characters detected during validation of {positions} positions.")]
    IndefiniteBases { count: usize, positions: usize },
    #[error("Expected line to start with 'Sequences contained: ', got: {0}")]
    MalformedCountPrefix(String),
    #[error("Could not parse integer from line: {0}")]
    MalformedCountValue(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub header: String,
    pub sequence: Sequence,
}

impl TryFrom<fasta::Record> for FastaRecord {
    type Error = FastaError;

    fn try_from(record: fasta::Record) -> Result<Self, Self::Error> {
        let header = match record.desc() {
            Some(desc) => format!("{} {}", record.id(), desc),
            None => record.id().to_string(),
        };
        if record.seq().is_empty() {
            return Err(FastaError::EmptyRecord { header });
        }
        match Sequence::new(record.seq()) {
            Ok(sequence) => Ok(FastaRecord { header, sequence }),
            Err(source) => Err(FastaError::InvalidSequence { header, source }),
        }
    }
}

/// How much of a record is checked for non-ACGT symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationLevel {
    #[default]
    Min,
    Max,
}

impl ValidationLevel {
    pub fn positions(self) -> Option<usize> {
        match self {
            ValidationLevel::Min => Some(MIN_VALIDATION_POSITIONS),
            ValidationLevel::Max => None,
        }
    }
}

/// Streaming record iterator over FASTA text.
pub struct Records<R: Read> {
    inner: fasta::Records<BufReader<R>>,
}

impl<R: Read> Records<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: fasta::Reader::new(reader).records(),
        }
    }
}

impl<R: Read> Iterator for Records<R> {
    type Item = Result<FastaRecord, FastaError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.inner.next()?;
        Some(record.map_err(FastaError::from).and_then(FastaRecord::try_from))
    }
}

pub fn read_records<R: Read>(reader: R) -> Result<Vec<FastaRecord>, FastaError> {
    Records::new(reader).collect()
}

fn open(path: &Path) -> Result<Records<File>, FastaError> {
    let file = File::open(path)?;
    Ok(Records::new(file))
}

/// Returns the first record, ignoring any that follow.
pub fn read_first_record<P: AsRef<Path>>(path: P) -> Result<FastaRecord, FastaError> {
    let path = path.as_ref();
    let mut records = open(path)?;
    let record = records.next().ok_or(FastaError::NoRecords)??;
    if records.next().is_some() {
        warn!(
            "{} holds more than one record; using {:?}",
            path.display(),
            record.header
        );
    }
    Ok(record)
}

/// Reads a file that must hold exactly one record and checks that the
/// positions selected by `level` are definite bases.
pub fn read_single_record<P: AsRef<Path>>(
    path: P,
    level: ValidationLevel,
) -> Result<FastaRecord, FastaError> {
    let path = path.as_ref();
    let mut records = open(path)?;
    let record = records.next().ok_or(FastaError::NoRecords)??;
    match records.next() {
        None => {}
        Some(Err(FastaError::Io(e))) => return Err(e.into()),
        Some(_) => return Err(FastaError::MultipleRecords),
    }

    validate_definite(&record.sequence, level)?;
    debug!(
        "read {:?} ({} bp) from {}",
        record.header,
        record.sequence.len(),
        path.display()
    );
    Ok(record)
}

pub fn validate_definite(sequence: &Sequence, level: ValidationLevel) -> Result<(), FastaError> {
    let (count, positions) = sequence.count_indefinite(level.positions());
    if count > 0 {
        return Err(FastaError::IndefiniteBases { count, positions });
    }
    Ok(())
}

/// Counts records, splitting on header lines exactly as [`Records`] does.
/// Sequence content is not checked.
pub fn count_records<R: Read>(reader: R) -> Result<usize, FastaError> {
    let mut count = 0;
    for record in fasta::Reader::new(reader).records() {
        record?;
        count += 1;
    }
    Ok(count)
}

/// The one-line `Sequences contained: N` summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceCount(pub usize);

impl fmt::Display for SequenceCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", COUNT_PREFIX, self.0)
    }
}

impl FromStr for SequenceCount {
    type Err = FastaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let content = s.trim();
        if !content.starts_with(COUNT_PREFIX) {
            return Err(FastaError::MalformedCountPrefix(content.to_string()));
        }
        content
            .split_once(':')
            .and_then(|(_, count)| count.trim().parse().ok())
            .map(SequenceCount)
            .ok_or_else(|| FastaError::MalformedCountValue(content.to_string()))
    }
}
