use std::thread;

use crossbeam_channel::{bounded, Receiver, Select, Sender};
use log::{debug, info, warn};
use thiserror::Error;

use crate::{AlignError, Aligner, AlignmentResult, Sequence};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error("alignment worker {0} stopped unexpectedly")]
    WorkerDisconnected(usize),
}

struct WorkItem {
    index: usize,
    seq1: Sequence,
    seq2: Sequence,
}

struct WorkResult {
    index: usize,
    result: Result<AlignmentResult, AlignError>,
}

struct Worker {
    work_tx: Sender<WorkItem>,
    result_rx: Receiver<WorkResult>,
    handle: thread::JoinHandle<()>,
}

/// Runs independent alignments on a fixed pool of threads.
///
/// Each worker holds at most one pair at a time; a new pair is handed out as
/// soon as a worker reports back.
pub struct BatchAligner {
    workers: Vec<Worker>,
}

impl BatchAligner {
    /// Starts `aligner.config().workers` threads, each with its own copy of
    /// the aligner.
    pub fn new(aligner: Aligner) -> Self {
        let count = aligner.config().workers.max(1);
        let workers = (0..count)
            .map(|id| Self::spawn_worker(id, aligner.clone()))
            .collect();
        info!("started {} alignment workers", count);
        Self { workers }
    }

    fn spawn_worker(id: usize, aligner: Aligner) -> Worker {
        let (work_tx, work_rx) = bounded(1);
        let (result_tx, result_rx) = bounded(1);
        let handle = thread::spawn(move || Self::worker(id, aligner, work_rx, result_tx));
        Worker {
            work_tx,
            result_rx,
            handle,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    fn worker(
        id: usize,
        aligner: Aligner,
        work_rx: Receiver<WorkItem>,
        result_tx: Sender<WorkResult>,
    ) {
        while let Ok(work) = work_rx.recv() {
            let result = aligner.align(&work.seq1, &work.seq2);
            if result_tx
                .send(WorkResult {
                    index: work.index,
                    result,
                })
                .is_err()
            {
                break;
            }
        }
        debug!("alignment worker {} exiting", id);
    }

    fn dispatch(&self, id: usize, index: usize, seq1: Sequence, seq2: Sequence) -> Result<(), BatchError> {
        self.workers[id]
            .work_tx
            .send(WorkItem { index, seq1, seq2 })
            .map_err(|_| BatchError::WorkerDisconnected(id))
    }

    /// Aligns every pair and returns one result per pair, in input order.
    ///
    /// On error, results still owed by busy workers are collected and
    /// discarded before returning, so the next batch starts clean.
    pub fn align_all<I>(
        &mut self,
        pairs: I,
    ) -> Result<Vec<Result<AlignmentResult, AlignError>>, BatchError>
    where
        I: IntoIterator<Item = (Sequence, Sequence)>,
    {
        let mut busy = vec![false; self.workers.len()];
        let outcome = self.run_batch(pairs.into_iter(), &mut busy);
        if let Err(ref e) = outcome {
            warn!("batch aborted: {}", e);
            self.drain(&busy);
        }
        outcome
    }

    fn run_batch<I>(
        &self,
        pairs: I,
        busy: &mut [bool],
    ) -> Result<Vec<Result<AlignmentResult, AlignError>>, BatchError>
    where
        I: Iterator<Item = (Sequence, Sequence)>,
    {
        let mut pending = pairs.enumerate();
        let mut results: Vec<Option<Result<AlignmentResult, AlignError>>> = Vec::new();
        let mut active = 0;

        for id in 0..self.workers.len() {
            let Some((index, (seq1, seq2))) = pending.next() else {
                break;
            };
            self.dispatch(id, index, seq1, seq2)?;
            busy[id] = true;
            active += 1;
        }

        while active > 0 {
            let mut select = Select::new();
            for worker in &self.workers {
                select.recv(&worker.result_rx);
            }
            let operation = select.select();
            let id = operation.index();
            let WorkResult { index, result } = operation
                .recv(&self.workers[id].result_rx)
                .map_err(|_| BatchError::WorkerDisconnected(id))?;
            busy[id] = false;
            active -= 1;

            if results.len() <= index {
                results.resize_with(index + 1, || None);
            }
            results[index] = Some(result);

            if let Some((index, (seq1, seq2))) = pending.next() {
                self.dispatch(id, index, seq1, seq2)?;
                busy[id] = true;
                active += 1;
            }
        }

        debug!("batch of {} alignments finished", results.len());
        Ok(results.into_iter().flatten().collect())
    }

    /// Waits out every job still running on a busy worker.
    fn drain(&self, busy: &[bool]) {
        for (worker, _) in self.workers.iter().zip(busy).filter(|&(_, &busy)| busy) {
            let _ = worker.result_rx.recv();
        }
    }
}

impl Drop for BatchAligner {
    fn drop(&mut self) {
        // Closing the work channels ends the worker loops.
        let handles: Vec<_> = self
            .workers
            .drain(..)
            .map(|worker| {
                let Worker {
                    work_tx, handle, ..
                } = worker;
                drop(work_tx);
                handle
            })
            .collect();
        for handle in handles {
            let _ = handle.join();
        }
    }
}
