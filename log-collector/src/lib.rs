//! A single-writer log collector fed by many concurrent producers.
//!
//! `log-collector` funnels [`LogEvent`]s from any number of tasks or threads
//! through one unbounded channel into a single consumer task that owns the
//! log destination. Producers never touch the destination and never block;
//! the consumer writes events strictly in channel order.
//!
//! # Lifecycle
//!
//! 1. [`spawn`] starts the collector task and returns a [`Logger`] plus a
//!    [`CollectorHandle`].
//! 2. The [`Logger`] is cloned (optionally re-tagged with
//!    [`Logger::with_origin`]) and passed explicitly to every producer.
//! 3. Once every producer is done, [`CollectorHandle::shutdown`] sends the stop
//!    sentinel and waits until the collector has drained and exited.
//!
//! # Example
//!
//! ```no_run
//! use log_collector::{MemorySink, spawn};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sink = MemorySink::new();
//!     let (logger, collector) = spawn(sink.clone(), "main");
//!
//!     let worker = logger.with_origin("worker-1");
//!     tokio::task::spawn_blocking(move || worker.info("started")).await?;
//!     logger.info("all workers joined");
//!
//!     let written = collector.shutdown().await?;
//!     assert_eq!(written, 2);
//!     assert_eq!(sink.events().len(), 2);
//!     Ok(())
//! }
//! ```

mod collector;
mod error;
mod event;
mod logger;
mod sink;

pub use collector::{Collector, CollectorHandle, spawn};
pub use error::Error;
pub use event::LogEvent;
pub use logger::Logger;
pub use sink::{MemorySink, Sink, Tee, TracingSink, WriterSink};
pub use tracing::Level;
