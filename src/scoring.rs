use crate::alignment_mode::{AlignmentMode, EndGaps};
use crate::sequence::GAP;
use crate::traceback::TracebackOperation;
use crate::{AlignError, InvalidInput};
use crate::{DNA_GAP_EXT, DNA_GAP_OPEN, DNA_MATCH, DNA_MISMATCH};

/// Fixed-point score in millionths.
pub type Score = i64;

pub const SCORE_SCALE: Score = 1_000_000;

/// Largest accepted magnitude for any scoring parameter.
pub const MAX_PARAMETER_MAGNITUDE: f64 = 1.0e6;

/// Sentinel for states that no path can reach. Kept far from `i64::MIN` so
/// that subtracting a penalty can never wrap.
pub(crate) const UNREACHABLE: Score = i64::MIN / 4;

/// Bound on the magnitude of any reachable score.
pub(crate) const SCORE_LIMIT: Score = i64::MAX / 8;

pub fn to_real(score: Score) -> f64 {
    score as f64 / SCORE_SCALE as f64
}

fn to_fixed(name: &'static str, value: f64) -> Result<Score, InvalidInput> {
    if !value.is_finite() {
        return Err(InvalidInput::NonFiniteParameter { name, value });
    }
    if value.abs() > MAX_PARAMETER_MAGNITUDE {
        return Err(InvalidInput::ParameterOutOfRange {
            name,
            value,
            limit: MAX_PARAMETER_MAGNITUDE,
        });
    }
    Ok((value * SCORE_SCALE as f64).round() as Score)
}

/// Caller-facing scoring configuration.
///
/// Penalties are given as positive costs and subtracted during alignment.
/// Conventional signs (match >= 0, mismatch <= 0, gap penalties > 0) are not
/// enforced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    pub match_score: f64,
    pub mismatch_score: f64,
    pub gap_open_penalty: f64,
    pub gap_extend_penalty: f64,
    pub end_gaps: EndGaps,
    pub mode: AlignmentMode,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            match_score: DNA_MATCH,
            mismatch_score: DNA_MISMATCH,
            gap_open_penalty: DNA_GAP_OPEN,
            gap_extend_penalty: DNA_GAP_EXT,
            end_gaps: EndGaps::default(),
            mode: AlignmentMode::default(),
        }
    }
}

impl ScoringConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_match_score(mut self, score: f64) -> Self {
        self.match_score = score;
        self
    }

    pub fn with_mismatch_score(mut self, score: f64) -> Self {
        self.mismatch_score = score;
        self
    }

    pub fn with_gap_open_penalty(mut self, penalty: f64) -> Self {
        self.gap_open_penalty = penalty;
        self
    }

    pub fn with_gap_extend_penalty(mut self, penalty: f64) -> Self {
        self.gap_extend_penalty = penalty;
        self
    }

    pub fn with_end_gaps(mut self, end_gaps: EndGaps) -> Self {
        self.end_gaps = end_gaps;
        self
    }

    pub fn with_mode(mut self, mode: AlignmentMode) -> Self {
        self.mode = mode;
        self
    }

    /// Converts to the fixed-point parameters used by the DP.
    pub fn score_params(&self) -> Result<ScoreParams, InvalidInput> {
        Ok(ScoreParams {
            match_score: to_fixed("match_score", self.match_score)?,
            mismatch: to_fixed("mismatch_score", self.mismatch_score)?,
            gap_open: to_fixed("gap_open_penalty", self.gap_open_penalty)?,
            gap_ext: to_fixed("gap_extend_penalty", self.gap_extend_penalty)?,
            end_gaps: self.end_gaps,
            mode: self.mode,
        })
    }

    /// Scores an existing pair of gapped rows under this configuration.
    ///
    /// A gap column extends when the previous column holds a gap in the same
    /// row and opens otherwise. With free end gaps, gap columns lying before
    /// the first or after the last symbol of their row cost nothing.
    pub fn score_alignment(&self, aligned1: &[u8], aligned2: &[u8]) -> Result<f64, AlignError> {
        let params = self.score_params()?;
        if aligned1.len() != aligned2.len() {
            return Err(InvalidInput::LengthMismatch {
                first: aligned1.len(),
                second: aligned2.len(),
            }
            .into());
        }

        let span1 = residue_span(aligned1);
        let span2 = residue_span(aligned2);

        let mut total: Score = 0;
        let mut previous: Option<GapRow> = None;
        for (column, (&a, &b)) in aligned1.iter().zip(aligned2).enumerate() {
            let row = match (a == GAP, b == GAP) {
                (true, true) => return Err(InvalidInput::GapOnlyColumn { column }.into()),
                (false, false) => {
                    total += params.substitution(a, b);
                    previous = None;
                    continue;
                }
                (true, false) => GapRow::First,
                (false, true) => GapRow::Second,
            };
            let span = match row {
                GapRow::First => span1,
                GapRow::Second => span2,
            };
            let terminal = span.map_or(true, |(first, last)| column < first || column > last);
            if !(params.end_gaps.is_free() && terminal) {
                total -= if previous == Some(row) {
                    params.gap_ext
                } else {
                    params.gap_open
                };
            }
            previous = Some(row);
        }
        Ok(to_real(total))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GapRow {
    First,
    Second,
}

fn residue_span(row: &[u8]) -> Option<(usize, usize)> {
    let first = row.iter().position(|&b| b != GAP)?;
    let last = row.iter().rposition(|&b| b != GAP)?;
    Some((first, last))
}

/// Fixed-point scoring parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreParams {
    pub match_score: Score,
    pub mismatch: Score,
    pub gap_open: Score,
    pub gap_ext: Score,
    pub end_gaps: EndGaps,
    pub mode: AlignmentMode,
}

impl ScoreParams {
    #[inline]
    pub fn substitution(&self, a: u8, b: u8) -> Score {
        if a == b {
            self.match_score
        } else {
            self.mismatch
        }
    }

    /// Largest absolute contribution a single column can make.
    pub(crate) fn max_step(&self) -> Score {
        [self.match_score, self.mismatch, self.gap_open, self.gap_ext]
            .iter()
            .map(|v| v.abs())
            .max()
            .unwrap_or(0)
    }
}

/// Column counts for a finished alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignmentStats {
    pub matches: u32,
    pub mismatches: u32,
    /// Gap columns in either row.
    pub gaps: u32,
    /// Maximal runs of gap columns in the same row.
    pub gap_opens: u32,
    pub length: u32,
}

impl AlignmentStats {
    pub fn from_operations(operations: &[TracebackOperation]) -> Self {
        let mut stats = AlignmentStats {
            length: operations.len() as u32,
            ..Default::default()
        };
        let mut previous = None;
        for &op in operations {
            match op {
                TracebackOperation::Match => stats.matches += 1,
                TracebackOperation::Mismatch => stats.mismatches += 1,
                TracebackOperation::Insertion | TracebackOperation::Deletion => {
                    stats.gaps += 1;
                    if previous != Some(op) {
                        stats.gap_opens += 1;
                    }
                }
            }
            previous = Some(op);
        }
        stats
    }

    /// Percentage of columns that are matches.
    pub fn identity(&self) -> f64 {
        if self.length == 0 {
            return 0.0;
        }
        self.matches as f64 / self.length as f64 * 100.0
    }
}
