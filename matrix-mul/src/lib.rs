//! Row-partitioned parallel matrix multiplication.
//!
//! `matrix-mul` computes `C = A × B` by splitting the rows of `C` into
//! contiguous ranges, one per worker. Workers run on blocking threads, share
//! both inputs read-only, and send their rows back over a channel. The
//! coordinator reassembles the rows by absolute index, so arrival order never
//! matters, and persists the product as a comma-separated text file.
//!
//! Diagnostics from the coordinator and from every worker travel through one
//! [`log_collector::Logger`] channel to a single collector task, which is the
//! only writer of the log destination.
//!
//! # Pipeline
//!
//! - [`partition`] splits `rows` into per-worker [`RowRange`]s.
//! - [`Worker`] computes its range with [`worker::compute`].
//! - [`ResultMatrix`] collects [`PartialResult`]s and checks every row is
//!   written exactly once.
//! - [`Coordinator`] runs validation, fan-out, aggregation and persistence.
//!
//! # Example
//!
//! ```no_run
//! use log_collector::TracingSink;
//! use matrix_mul::{Matrix, Options, TextFile, pipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]])?;
//!     let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]])?;
//!
//!     let logged =
//!         pipeline::multiply_logged(TracingSink, TextFile::new("."), Options::default(), a, b, 2)
//!             .await;
//!     let outcome = logged.result?;
//!
//!     assert_eq!(outcome.result.into_rows(), vec![vec![19, 22], vec![43, 50]]);
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod coordinator;
mod error;
pub mod input;
pub mod matrix;
pub mod partition;
pub mod persist;
pub mod pipeline;
pub mod policy;
pub mod worker;

pub use aggregate::{ResultMatrix, assemble};
pub use coordinator::{Coordinator, Options, Outcome, Stage};
pub use error::Error;
pub use input::{Dimensions, Prompter};
pub use matrix::Matrix;
pub use partition::{RowRange, partition};
pub use persist::{Persist, TextFile};
pub use pipeline::Logged;
pub use policy::{CpuLoadPolicy, FixedPolicy, WorkerPolicy};
pub use worker::{PartialResult, Worker};
