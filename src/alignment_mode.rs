/// How the gap states of the DP are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignmentMode {
    /// Each cell commits to its best state and gaps open or extend relative
    /// to that committed state. Matches the output of the widely used
    /// single-pointer Needleman-Wunsch implementations. Not guaranteed
    /// optimal, and swapping the inputs can change the score.
    #[default]
    Greedy,
    /// Three-state Gotoh recurrences. Returns the exact optimum under the
    /// column scoring model.
    Optimal,
}

/// Treatment of gaps before the first or after the last symbol of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndGaps {
    #[default]
    Free,
    Penalized,
}

impl EndGaps {
    pub fn is_free(self) -> bool {
        matches!(self, EndGaps::Free)
    }
}
