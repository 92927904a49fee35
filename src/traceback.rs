use std::fmt;

use crate::alignment_mode::AlignmentMode;
use crate::dp::{best_of, CellState, DpState};
use crate::scoring::{to_real, AlignmentStats, ScoreParams};
use crate::sequence::GAP;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracebackOperation {
    Match,
    Mismatch,
    /// Gap in the first sequence against a symbol of the second.
    Insertion,
    /// Symbol of the first sequence against a gap in the second.
    Deletion,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentResult {
    pub score: f64,
    pub aligned_seq1: Vec<u8>,
    pub aligned_seq2: Vec<u8>,
    pub operations: Vec<TracebackOperation>,
}

impl AlignmentResult {
    /// Number of alignment columns.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn aligned_strings(&self) -> (String, String) {
        (
            String::from_utf8_lossy(&self.aligned_seq1).into_owned(),
            String::from_utf8_lossy(&self.aligned_seq2).into_owned(),
        )
    }

    pub fn stats(&self) -> AlignmentStats {
        AlignmentStats::from_operations(&self.operations)
    }
}

impl fmt::Display for AlignmentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, b) = self.aligned_strings();
        writeln!(f, "{}", a)?;
        writeln!(f, "{}", b)?;
        write!(f, "score: {}", self.score)
    }
}

/// Walks a filled [`DpState`] back from the final cell.
pub struct Traceback<'a> {
    state: &'a DpState,
    seq1: &'a [u8],
    seq2: &'a [u8],
    params: ScoreParams,
}

impl<'a> Traceback<'a> {
    pub fn new(state: &'a DpState, seq1: &'a [u8], seq2: &'a [u8], params: ScoreParams) -> Self {
        Self {
            state,
            seq1,
            seq2,
            params,
        }
    }

    pub fn reconstruct_alignment(&self) -> AlignmentResult {
        let (mut i, mut j) = (self.seq1.len(), self.seq2.len());
        let capacity = i + j;
        let mut aligned_seq1 = Vec::with_capacity(capacity);
        let mut aligned_seq2 = Vec::with_capacity(capacity);
        let mut operations = Vec::with_capacity(capacity);

        let (mut current, best) = self.state.best(i, j);

        while i > 0 || j > 0 {
            if self.params.mode == AlignmentMode::Greedy {
                current = self.state.best(i, j).0;
            }
            // Only one move leaves the boundary row or column.
            if i == 0 {
                current = CellState::Iy;
            } else if j == 0 {
                current = CellState::Ix;
            }

            match current {
                CellState::M => {
                    let (a, b) = (self.seq1[i - 1], self.seq2[j - 1]);
                    aligned_seq1.push(a);
                    aligned_seq2.push(b);
                    operations.push(if a == b {
                        TracebackOperation::Match
                    } else {
                        TracebackOperation::Mismatch
                    });
                    current = self.state.best(i - 1, j - 1).0;
                    i -= 1;
                    j -= 1;
                }
                CellState::Ix => {
                    aligned_seq1.push(self.seq1[i - 1]);
                    aligned_seq2.push(GAP);
                    operations.push(TracebackOperation::Deletion);
                    if j > 0 {
                        current = best_of(self.state.ix_candidates(i, j)).0;
                    }
                    i -= 1;
                }
                CellState::Iy => {
                    aligned_seq1.push(GAP);
                    aligned_seq2.push(self.seq2[j - 1]);
                    operations.push(TracebackOperation::Insertion);
                    if i > 0 {
                        current = best_of(self.state.iy_candidates(i, j)).0;
                    }
                    j -= 1;
                }
            }
        }

        // Built backwards
        aligned_seq1.reverse();
        aligned_seq2.reverse();
        operations.reverse();

        AlignmentResult {
            score: to_real(best),
            aligned_seq1,
            aligned_seq2,
            operations,
        }
    }
}
