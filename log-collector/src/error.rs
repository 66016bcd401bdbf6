//! Error types for log-collector operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("log sink error: {0}")]
    Sink(#[from] std::io::Error),

    #[error("collector task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
