//! Error types for matrix-mul operations.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("log collector error: {0}")]
    Log(#[from] log_collector::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("matrix dimension mismatch: A is {0}x{1}, B is {2}x{3}")]
    DimensionMismatch(usize, usize, usize, usize),

    #[error("ragged matrix: row {row} has {found} columns, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("integer overflow computing C[{row}][{col}]")]
    Overflow { row: usize, col: usize },

    #[error("worker {worker} terminated abnormally: {reason}")]
    WorkerAborted { worker: usize, reason: String },

    #[error("worker {worker} did not finish within {after:?}")]
    Timeout { worker: usize, after: Duration },

    #[error("{count} worker(s) failed ({failed:?}), {missing} result row(s) missing", count = .failed.len())]
    WorkerFailure { failed: Vec<usize>, missing: usize },

    #[error("result rows never reported: {0:?}")]
    MissingRows(Vec<usize>),

    #[error("result row {0} reported twice")]
    DuplicateRow(usize),

    #[error("result row {row} is outside a {rows}-row matrix")]
    RowOutOfBounds { row: usize, rows: usize },

    #[error("failed to persist result: {0}")]
    Persistence(#[from] std::io::Error),
}
