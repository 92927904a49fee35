//! Score matrices for the affine-gap fill.
//!
//! `M` holds paths whose last column is a substitution, `Ix` paths whose
//! last column consumes a symbol of the first sequence against a gap, and
//! `Iy` paths whose last column consumes a symbol of the second sequence
//! against a gap. Row `i` indexes the first sequence, column `j` the second.

use crate::alignment_mode::AlignmentMode;
use crate::scoring::{Score, ScoreParams, UNREACHABLE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    M,
    Ix,
    Iy,
}

/// Row-major (rows x cols) score matrix.
#[derive(Debug, Clone)]
pub struct DpMatrix {
    data: Vec<Score>,
    cols: usize,
}

impl DpMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![UNREACHABLE; rows * cols],
            cols,
        }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Score {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: Score) {
        self.data[row * self.cols + col] = value;
    }
}

/// Subtracts `cost` unless the state is unreachable.
#[inline]
fn penalize(score: Score, cost: Score) -> Score {
    if score <= UNREACHABLE {
        UNREACHABLE
    } else {
        score - cost
    }
}

/// First maximum in precedence order M > Ix > Iy.
#[inline]
pub fn best_of(candidates: [Score; 3]) -> (CellState, Score) {
    let [m, ix, iy] = candidates;
    if m >= ix && m >= iy {
        (CellState::M, m)
    } else if ix >= iy {
        (CellState::Ix, ix)
    } else {
        (CellState::Iy, iy)
    }
}

/// The three matrices of one alignment call.
#[derive(Debug, Clone)]
pub struct DpState {
    m: DpMatrix,
    ix: DpMatrix,
    iy: DpMatrix,
    rows: usize,
    cols: usize,
    params: ScoreParams,
}

impl DpState {
    /// Initializes the boundaries and fills every cell.
    pub fn fill(seq1: &[u8], seq2: &[u8], params: &ScoreParams) -> Self {
        let (rows, cols) = (seq1.len() + 1, seq2.len() + 1);
        let mut state = Self {
            m: DpMatrix::new(rows, cols),
            ix: DpMatrix::new(rows, cols),
            iy: DpMatrix::new(rows, cols),
            rows,
            cols,
            params: *params,
        };
        state.init_boundaries();

        for i in 1..rows {
            let a = seq1[i - 1];
            for j in 1..cols {
                let (_, diag) = state.best(i - 1, j - 1);
                state.m.set(i, j, diag + params.substitution(a, seq2[j - 1]));

                let (ix, iy) = match params.mode {
                    AlignmentMode::Greedy => (state.greedy_ix(i, j), state.greedy_iy(i, j)),
                    AlignmentMode::Optimal => (
                        best_of(state.ix_candidates(i, j)).1,
                        best_of(state.iy_candidates(i, j)).1,
                    ),
                };
                state.ix.set(i, j, ix);
                state.iy.set(i, j, iy);
            }
        }
        state
    }

    fn init_boundaries(&mut self) {
        let free = self.params.end_gaps.is_free();
        let (open, ext) = (self.params.gap_open, self.params.gap_ext);
        let gap_run = |len: usize| -> Score {
            if free {
                0
            } else {
                -(open + (len as Score - 1) * ext)
            }
        };

        self.m.set(0, 0, 0);
        for i in 1..self.rows {
            self.ix.set(i, 0, gap_run(i));
        }
        for j in 1..self.cols {
            self.iy.set(0, j, gap_run(j));
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn params(&self) -> &ScoreParams {
        &self.params
    }

    pub fn get(&self, state: CellState, i: usize, j: usize) -> Score {
        match state {
            CellState::M => self.m.get(i, j),
            CellState::Ix => self.ix.get(i, j),
            CellState::Iy => self.iy.get(i, j),
        }
    }

    /// Best state at a cell under the tie-break precedence.
    #[inline]
    pub fn best(&self, i: usize, j: usize) -> (CellState, Score) {
        best_of([self.m.get(i, j), self.ix.get(i, j), self.iy.get(i, j)])
    }

    /// Open/extend cost of an `Ix` move into column `j`. Moves along the last
    /// column are trailing gaps in the second sequence.
    #[inline]
    fn ix_costs(&self, j: usize) -> (Score, Score) {
        if self.params.end_gaps.is_free() && j == self.cols - 1 {
            (0, 0)
        } else {
            (self.params.gap_open, self.params.gap_ext)
        }
    }

    #[inline]
    fn iy_costs(&self, i: usize) -> (Score, Score) {
        if self.params.end_gaps.is_free() && i == self.rows - 1 {
            (0, 0)
        } else {
            (self.params.gap_open, self.params.gap_ext)
        }
    }

    /// Terms competing for `Ix[i][j]`, ordered M, Ix, Iy.
    pub(crate) fn ix_candidates(&self, i: usize, j: usize) -> [Score; 3] {
        let (open, ext) = self.ix_costs(j);
        [
            penalize(self.m.get(i - 1, j), open),
            penalize(self.ix.get(i - 1, j), ext),
            penalize(self.iy.get(i - 1, j), open),
        ]
    }

    /// Terms competing for `Iy[i][j]`, ordered M, Ix, Iy.
    pub(crate) fn iy_candidates(&self, i: usize, j: usize) -> [Score; 3] {
        let (open, ext) = self.iy_costs(i);
        [
            penalize(self.m.get(i, j - 1), open),
            penalize(self.ix.get(i, j - 1), open),
            penalize(self.iy.get(i, j - 1), ext),
        ]
    }

    fn greedy_ix(&self, i: usize, j: usize) -> Score {
        let (open, ext) = self.ix_costs(j);
        let (winner, score) = self.best(i - 1, j);
        penalize(score, if winner == CellState::Ix { ext } else { open })
    }

    fn greedy_iy(&self, i: usize, j: usize) -> Score {
        let (open, ext) = self.iy_costs(i);
        let (winner, score) = self.best(i, j - 1);
        penalize(score, if winner == CellState::Iy { ext } else { open })
    }
}
