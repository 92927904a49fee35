//! Global pairwise alignment of nucleotide sequences.
//!
//! Needleman-Wunsch with affine gap penalties over three DP matrices
//! (substitution, gap in the second sequence, gap in the first sequence),
//! followed by a deterministic traceback. Ties prefer substitution, then a
//! gap in the second sequence, then a gap in the first.

use std::fmt;

use log::{debug, trace};
use thiserror::Error;

pub mod alignment_mode;
pub mod config;
pub mod dp;
pub mod fasta;
pub mod multi_align;
pub mod scoring;
pub mod sequence;
pub mod traceback;

pub use alignment_mode::{AlignmentMode, EndGaps};
pub use config::AlignerConfig;
pub use dp::{CellState, DpState};
pub use fasta::{FastaError, FastaRecord, SequenceCount, ValidationLevel};
pub use multi_align::{BatchAligner, BatchError};
pub use scoring::{AlignmentStats, Score, ScoreParams, ScoringConfig};
pub use sequence::{Sequence, SequenceError, GAP};
pub use traceback::{AlignmentResult, Traceback, TracebackOperation};

use scoring::SCORE_LIMIT;

/// Most cells the three score matrices can hold within one allocation each.
const MAX_MATRIX_CELLS: usize = isize::MAX as usize / std::mem::size_of::<Score>() / 3;

// DNA scoring defaults
pub const DNA_MATCH: f64 = 1.0;
pub const DNA_MISMATCH: f64 = -2.0;
pub const DNA_GAP_OPEN: f64 = 5.0;
pub const DNA_GAP_EXT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceSlot {
    First,
    Second,
}

impl fmt::Display for SequenceSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceSlot::First => f.write_str("first"),
            SequenceSlot::Second => f.write_str("second"),
        }
    }
}

/// The precondition an alignment request violated.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvalidInput {
    #[error("{0} sequence is empty")]
    EmptySequence(SequenceSlot),
    #[error("{name} must be finite, got {value}")]
    NonFiniteParameter { name: &'static str, value: f64 },
    #[error("{name} = {value} exceeds the supported magnitude {limit}")]
    ParameterOutOfRange {
        name: &'static str,
        value: f64,
        limit: f64,
    },
    #[error("scores for sequences of length {len1} and {len2} cannot be represented")]
    ScoreRangeExceeded { len1: usize, len2: usize },
    #[error("alignment needs {cells} matrix cells, limit is {limit}")]
    MatrixTooLarge { cells: usize, limit: usize },
    #[error("aligned rows differ in length: {first} vs {second}")]
    LengthMismatch { first: usize, second: usize },
    #[error("column {column} holds a gap in both rows")]
    GapOnlyColumn { column: usize },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AlignError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
}

/// Global aligner bound to one scoring configuration.
#[derive(Debug, Clone, Default)]
pub struct Aligner {
    scoring: ScoringConfig,
    config: AlignerConfig,
}

impl Aligner {
    pub fn new(scoring: ScoringConfig) -> Self {
        Self {
            scoring,
            config: AlignerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AlignerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    pub fn config(&self) -> &AlignerConfig {
        &self.config
    }

    /// Aligns `seq1` against `seq2` end to end.
    ///
    /// Both sequences must be non-empty. The returned score is the exact sum
    /// of the column contributions of the returned alignment.
    pub fn align(&self, seq1: &Sequence, seq2: &Sequence) -> Result<AlignmentResult, AlignError> {
        if seq1.is_empty() {
            return Err(InvalidInput::EmptySequence(SequenceSlot::First).into());
        }
        if seq2.is_empty() {
            return Err(InvalidInput::EmptySequence(SequenceSlot::Second).into());
        }

        let params = self.scoring.score_params()?;
        let (n, m) = (seq1.len(), seq2.len());
        self.check_size(n, m)?;

        let max_path = (n + m + 1) as Score;
        match params.max_step().checked_mul(max_path) {
            Some(bound) if bound <= SCORE_LIMIT => {}
            _ => return Err(InvalidInput::ScoreRangeExceeded { len1: n, len2: m }.into()),
        }

        debug!(
            "aligning {}x{} ({:?} fill, {:?} end gaps)",
            n, m, params.mode, params.end_gaps
        );

        let state = DpState::fill(seq1.as_bytes(), seq2.as_bytes(), &params);
        let result = Traceback::new(&state, seq1.as_bytes(), seq2.as_bytes(), params)
            .reconstruct_alignment();

        trace!(
            "alignment of length {} with score {}",
            result.len(),
            result.score
        );
        Ok(result)
    }

    fn check_size(&self, n: usize, m: usize) -> Result<(), InvalidInput> {
        let limit = self
            .config
            .max_matrix_cells
            .map_or(MAX_MATRIX_CELLS, |limit| limit.min(MAX_MATRIX_CELLS));
        match (n + 1).checked_mul(m + 1) {
            Some(cells) if cells <= limit => Ok(()),
            cells => Err(InvalidInput::MatrixTooLarge {
                cells: cells.unwrap_or(usize::MAX),
                limit,
            }),
        }
    }
}

/// Aligns two sequences with the given scoring.
pub fn align(
    seq1: &Sequence,
    seq2: &Sequence,
    scoring: &ScoringConfig,
) -> Result<AlignmentResult, AlignError> {
    Aligner::new(*scoring).align(seq1, seq2)
}
