//! End-to-end orchestration of one multiplication.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use log_collector::Logger;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::Error;
use crate::aggregate::ResultMatrix;
use crate::input::Dimensions;
use crate::matrix::Matrix;
use crate::partition::partition;
use crate::persist::Persist;
use crate::worker::{PartialResult, Worker, worker_name};

/// Where the coordinator is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Validating,
    Spawning,
    Running,
    Aggregating,
    Persisting,
    Done,
    Aborted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Validating => "validating",
            Stage::Spawning => "spawning",
            Stage::Running => "running",
            Stage::Aggregating => "aggregating",
            Stage::Persisting => "persisting",
            Stage::Done => "done",
            Stage::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Deadline for every worker, counted from the start of the running stage.
    /// `None` waits indefinitely.
    pub worker_timeout: Option<Duration>,
}

/// A finished run. `file` is `None` when the result could not be persisted.
#[derive(Debug)]
pub struct Outcome {
    pub result: Matrix,
    pub file: Option<PathBuf>,
}

/// Drives validation, worker fan-out, aggregation and persistence.
///
/// Every stage transition and every failure is reported through the
/// [`Logger`]; the coordinator itself never writes to the log destination.
pub struct Coordinator<P> {
    logger: Logger,
    persister: P,
    options: Options,
    stage: Stage,
}

impl<P: Persist> Coordinator<P> {
    pub fn new(logger: Logger, persister: P) -> Self {
        Self {
            logger,
            persister,
            options: Options::default(),
            stage: Stage::Idle,
        }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Multiplies `a × b` with `workers` workers and persists the product.
    ///
    /// A persistence failure is logged and leaves `Outcome::file` empty; it is
    /// not an error.
    pub async fn run(&mut self, a: Matrix, b: Matrix, workers: usize) -> Result<Outcome, Error> {
        let dims = Dimensions {
            rows1: a.rows(),
            cols1: a.cols(),
            rows2: b.rows(),
            cols2: b.cols(),
        };
        self.run_with(dims, move |_| (a, b), workers).await
    }

    /// Like [`run`](Self::run), but the operands are only built by `generate`
    /// once `dims` has passed validation.
    pub async fn run_with<G>(
        &mut self,
        dims: Dimensions,
        generate: G,
        workers: usize,
    ) -> Result<Outcome, Error>
    where
        G: FnOnce(Dimensions) -> (Matrix, Matrix),
    {
        let result = match self.multiply(dims, generate, workers).await {
            Ok(result) => result,
            Err(e) => {
                self.logger.error(format!("matrix multiplication aborted: {e}"));
                self.enter(Stage::Aborted);
                return Err(e);
            }
        };

        self.enter(Stage::Persisting);
        let file = match self.persister.persist(&result).await {
            Ok(path) => {
                self.logger.info(format!("result saved to {}", path.display()));
                Some(path)
            }
            Err(e) => {
                self.logger.error(format!("failed to save result: {e}"));
                None
            }
        };

        self.enter(Stage::Done);
        Ok(Outcome { result, file })
    }

    async fn multiply<G>(
        &mut self,
        dims: Dimensions,
        generate: G,
        workers: usize,
    ) -> Result<Matrix, Error>
    where
        G: FnOnce(Dimensions) -> (Matrix, Matrix),
    {
        self.enter(Stage::Validating);
        if !dims.compatible() {
            return Err(mismatch(dims));
        }
        let (a, b) = generate(dims);
        if a.cols() != b.rows() {
            return Err(Error::DimensionMismatch(a.rows(), a.cols(), b.rows(), b.cols()));
        }

        self.enter(Stage::Spawning);
        let (rows, cols) = (a.rows(), b.cols());
        let ranges = partition(rows, workers);
        self.logger.info(format!(
            "multiplying {}x{} by {}x{} with {} workers",
            a.rows(),
            a.cols(),
            b.rows(),
            b.cols(),
            ranges.len()
        ));

        let a = Arc::new(a);
        let b = Arc::new(b);
        let (tx, mut rx) = mpsc::unbounded_channel::<PartialResult>();
        let handles: Vec<_> = ranges
            .into_iter()
            .enumerate()
            .map(|(id, range)| {
                let worker = Worker::new(
                    id,
                    range,
                    Arc::clone(&a),
                    Arc::clone(&b),
                    tx.clone(),
                    &self.logger,
                );
                tokio::task::spawn_blocking(move || worker.run())
            })
            .collect();
        drop(tx);

        self.enter(Stage::Running);
        let deadline = self.options.worker_timeout.map(|after| (Instant::now() + after, after));
        let mut failed = Vec::new();
        for (id, handle) in handles.into_iter().enumerate() {
            if let Err(e) = join(id, handle, deadline).await {
                self.logger.error(format!("{} failed: {e}", worker_name(id)));
                failed.push(id);
            }
        }
        self.logger.info(format!("all workers finished, {} failed", failed.len()));

        self.enter(Stage::Aggregating);
        let mut result = ResultMatrix::new(rows, cols);
        // Every worker that finished has already sent; a timed-out worker may
        // still hold a sender, so never wait here.
        while let Ok(partial) = rx.try_recv() {
            result.apply(partial)?;
        }
        if !failed.is_empty() {
            return Err(Error::WorkerFailure {
                failed,
                missing: result.missing_rows().len(),
            });
        }
        let result = result.finish()?;
        self.logger.info("assembled final result matrix");
        Ok(result)
    }

    fn enter(&mut self, stage: Stage) {
        self.logger.debug(format!("coordinator {} -> {}", self.stage, stage));
        self.stage = stage;
    }
}

fn mismatch(dims: Dimensions) -> Error {
    Error::DimensionMismatch(dims.rows1, dims.cols1, dims.rows2, dims.cols2)
}

async fn join(
    id: usize,
    handle: JoinHandle<Result<(), Error>>,
    deadline: Option<(Instant, Duration)>,
) -> Result<(), Error> {
    let joined = match deadline {
        Some((at, after)) => match tokio::time::timeout_at(at, handle).await {
            Ok(joined) => joined,
            Err(_) => return Err(Error::Timeout { worker: id, after }),
        },
        None => handle.await,
    };
    match joined {
        Ok(result) => result,
        Err(e) => Err(Error::WorkerAborted {
            worker: id,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use log_collector::{Level, MemorySink, spawn};

    use super::*;

    #[derive(Default)]
    struct Recorder {
        saved: Mutex<Vec<Matrix>>,
    }

    #[async_trait]
    impl Persist for Recorder {
        async fn persist(&self, result: &Matrix) -> Result<PathBuf, Error> {
            self.saved.lock().unwrap().push(result.clone());
            Ok(PathBuf::from("memory"))
        }
    }

    struct Unwritable;

    #[async_trait]
    impl Persist for Unwritable {
        async fn persist(&self, _result: &Matrix) -> Result<PathBuf, Error> {
            Err(Error::Persistence(std::io::Error::other("read-only")))
        }
    }

    fn m(rows: Vec<Vec<i64>>) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    #[tokio::test]
    async fn successful_run_walks_every_stage() {
        let sink = MemorySink::new();
        let (logger, collector) = spawn(sink.clone(), "coordinator");
        let mut coordinator = Coordinator::new(logger, Recorder::default());
        assert_eq!(coordinator.stage(), Stage::Idle);

        let outcome = coordinator
            .run(
                m(vec![vec![1, 2], vec![3, 4]]),
                m(vec![vec![5, 6], vec![7, 8]]),
                2,
            )
            .await
            .unwrap();
        assert_eq!(coordinator.stage(), Stage::Done);
        drop(coordinator);
        collector.shutdown().await.unwrap();

        assert_eq!(outcome.result.into_rows(), vec![vec![19, 22], vec![43, 50]]);
        assert_eq!(outcome.file, Some(PathBuf::from("memory")));

        let transitions: Vec<String> = sink
            .events()
            .into_iter()
            .filter(|e| e.level == Level::DEBUG)
            .map(|e| e.message)
            .collect();
        assert_eq!(
            transitions,
            vec![
                "coordinator idle -> validating",
                "coordinator validating -> spawning",
                "coordinator spawning -> running",
                "coordinator running -> aggregating",
                "coordinator aggregating -> persisting",
                "coordinator persisting -> done",
            ]
        );
    }

    #[tokio::test]
    async fn dimension_mismatch_aborts_before_spawning() {
        let sink = MemorySink::new();
        let (logger, collector) = spawn(sink.clone(), "coordinator");
        let recorder = Recorder::default();
        let mut coordinator = Coordinator::new(logger, recorder);

        let err = coordinator
            .run(m(vec![vec![1, 2, 3]]), m(vec![vec![1], vec![2]]), 4)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::DimensionMismatch(1, 3, 2, 1)));
        assert_eq!(coordinator.stage(), Stage::Aborted);
        assert!(coordinator.persister.saved.lock().unwrap().is_empty());
        drop(coordinator);
        collector.shutdown().await.unwrap();

        let events = sink.events();
        assert!(events.iter().all(|e| !e.origin.starts_with("worker-")));
        assert!(events.iter().any(|e| e.level == Level::ERROR));
    }

    #[tokio::test]
    async fn mismatched_dimensions_never_generate_operands() {
        let (logger, collector) = spawn(MemorySink::new(), "coordinator");
        let mut coordinator = Coordinator::new(logger, Recorder::default());
        let dims = Dimensions {
            rows1: 60_000,
            cols1: 60_000,
            rows2: 1,
            cols2: 1,
        };

        let err = coordinator
            .run_with(dims, |_| panic!("operands generated before validation"), 2)
            .await
            .unwrap_err();
        drop(coordinator);
        collector.shutdown().await.unwrap();

        assert!(matches!(err, Error::DimensionMismatch(60_000, 60_000, 1, 1)));
    }

    #[tokio::test]
    async fn compatible_dimensions_reach_the_generator() {
        let (logger, collector) = spawn(MemorySink::new(), "coordinator");
        let mut coordinator = Coordinator::new(logger, Recorder::default());
        let dims = Dimensions {
            rows1: 2,
            cols1: 1,
            rows2: 1,
            cols2: 2,
        };

        let generate = |d: Dimensions| (m(vec![vec![1]; d.rows1]), m(vec![vec![3, 4]; d.rows2]));

        let outcome = coordinator.run_with(dims, generate, 8).await.unwrap();
        drop(coordinator);
        collector.shutdown().await.unwrap();

        assert_eq!(outcome.result.into_rows(), vec![vec![3, 4], vec![3, 4]]);
    }

    #[tokio::test]
    async fn overflowing_worker_fails_the_whole_run() {
        let sink = MemorySink::new();
        let (logger, collector) = spawn(sink.clone(), "coordinator");
        let mut coordinator = Coordinator::new(logger, Recorder::default());

        let a = m(vec![vec![1, 1], vec![i64::MAX, 1], vec![2, 2]]);
        let b = m(vec![vec![2], vec![1]]);
        let err = coordinator.run(a, b, 3).await.unwrap_err();

        assert!(
            matches!(&err, Error::WorkerFailure { failed, missing } if failed == &vec![1] && *missing == 1)
        );
        assert_eq!(coordinator.stage(), Stage::Aborted);
        assert!(coordinator.persister.saved.lock().unwrap().is_empty());
        drop(coordinator);
        collector.shutdown().await.unwrap();

        assert!(
            sink.events()
                .iter()
                .any(|e| e.origin == "worker-1" && e.level == Level::ERROR)
        );
    }

    #[tokio::test]
    async fn persistence_failure_keeps_the_result() {
        let sink = MemorySink::new();
        let (logger, collector) = spawn(sink.clone(), "coordinator");
        let mut coordinator = Coordinator::new(logger, Unwritable);

        let outcome = coordinator
            .run(m(vec![vec![2]]), m(vec![vec![21]]), 1)
            .await
            .unwrap();
        drop(coordinator);
        collector.shutdown().await.unwrap();

        assert_eq!(outcome.result.into_rows(), vec![vec![42]]);
        assert!(outcome.file.is_none());
        assert!(
            sink.events()
                .iter()
                .any(|e| e.level == Level::ERROR && e.message.contains("read-only"))
        );
    }

    #[tokio::test]
    async fn generous_timeout_does_not_interfere() {
        let (logger, collector) = spawn(MemorySink::new(), "coordinator");
        let mut coordinator = Coordinator::new(logger, Recorder::default()).with_options(Options {
            worker_timeout: Some(Duration::from_secs(30)),
        });

        let outcome = coordinator
            .run(m(vec![vec![1], vec![2], vec![3]]), m(vec![vec![4, 5]]), 2)
            .await
            .unwrap();
        drop(coordinator);
        collector.shutdown().await.unwrap();

        assert_eq!(
            outcome.result.into_rows(),
            vec![vec![4, 5], vec![8, 10], vec![12, 15]]
        );
    }

    #[tokio::test]
    async fn join_reports_expired_deadline() {
        let handle = tokio::task::spawn_blocking(|| {
            std::thread::sleep(Duration::from_millis(300));
            Ok(())
        });
        let after = Duration::from_millis(10);

        let err = join(7, handle, Some((Instant::now() + after, after)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout { worker: 7, .. }));
    }

    #[tokio::test]
    async fn join_reports_panicking_worker() {
        let handle = tokio::task::spawn_blocking(|| -> Result<(), Error> { panic!("boom") });

        let err = join(3, handle, None).await.unwrap_err();
        assert!(matches!(err, Error::WorkerAborted { worker: 3, .. }));
    }
}
