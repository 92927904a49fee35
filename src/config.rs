use std::thread;

/// Resource limits for alignment runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignerConfig {
    /// Upper bound on (n+1)*(m+1). Each cell holds three 8-byte scores.
    pub max_matrix_cells: Option<usize>,
    /// Worker threads used by the batch aligner.
    pub workers: usize,
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            max_matrix_cells: None,
            workers: thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

impl AlignerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_matrix_cells(mut self, cells: usize) -> Self {
        self.max_matrix_cells = Some(cells);
        self
    }

    /// Sets the worker count; zero is raised to one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}
