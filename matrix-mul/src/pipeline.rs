//! Running work inside the lifetime of a log collector.

use std::future::Future;

use log_collector::{Logger, Sink};

use crate::Error;
use crate::coordinator::{Coordinator, Options, Outcome};
use crate::matrix::Matrix;
use crate::persist::Persist;

/// The result of work done under a collector, plus how the collector ended.
///
/// The two are kept apart so a failing log destination never discards a
/// finished result.
#[derive(Debug)]
pub struct Logged<T> {
    pub result: Result<T, Error>,
    /// Number of events written, or why the collector failed.
    pub drained: Result<usize, log_collector::Error>,
}

/// Starts a collector on `sink`, runs `f` with its logger, then always stops
/// the collector and waits for it to drain, whether `f` succeeded or not.
pub async fn with_log_collector<S, F, Fut, T>(sink: S, origin: &str, f: F) -> Logged<T>
where
    S: Sink + Send + 'static,
    F: FnOnce(Logger) -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    let (logger, collector) = log_collector::spawn(sink, origin);
    let result = f(logger).await;
    let drained = collector.shutdown().await;
    Logged { result, drained }
}

/// Multiplies and persists one pair of matrices with a dedicated collector.
pub async fn multiply_logged<S, P>(
    sink: S,
    persister: P,
    options: Options,
    a: Matrix,
    b: Matrix,
    workers: usize,
) -> Logged<Outcome>
where
    S: Sink + Send + 'static,
    P: Persist,
{
    with_log_collector(sink, "coordinator", |logger| async move {
        let mut coordinator = Coordinator::new(logger, persister).with_options(options);
        coordinator.run(a, b, workers).await
    })
    .await
}
