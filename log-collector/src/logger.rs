//! Producer-side handle for emitting log events.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::Level;

use crate::collector::Message;
use crate::event::LogEvent;

/// A cheap, cloneable handle that enqueues [`LogEvent`]s for the collector.
///
/// Every `Logger` carries an origin tag which is stamped onto the events it
/// emits. Sending never blocks and never takes a lock beyond what the channel
/// itself does. Once the collector has stopped, events are dropped silently.
///
/// # Example
///
/// ```no_run
/// use log_collector::{TracingSink, spawn};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let (logger, collector) = spawn(TracingSink, "coordinator");
///
///     let worker = logger.with_origin("worker-0");
///     worker.info("started rows 0..4");
///
///     collector.shutdown().await?;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Logger {
    origin: Arc<str>,
    tx: UnboundedSender<Message>,
}

impl Logger {
    pub(crate) fn new(origin: impl Into<String>, tx: UnboundedSender<Message>) -> Self {
        Self {
            origin: Arc::from(origin.into()),
            tx,
        }
    }

    pub(crate) fn sender(&self) -> UnboundedSender<Message> {
        self.tx.clone()
    }

    /// Returns a handle on the same channel with a different origin tag.
    pub fn with_origin(&self, origin: impl Into<String>) -> Self {
        Self::new(origin, self.tx.clone())
    }

    /// Enqueues an event at `level`.
    pub fn log(&self, level: Level, message: impl Into<String>) {
        let event = LogEvent::new(self.origin.as_ref(), level, message);
        let _ = self.tx.send(Message::Event(event));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::ERROR, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(Level::WARN, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::INFO, message);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::DEBUG, message);
    }

    /// Returns `true` once the collector is no longer receiving.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("origin", &self.origin)
            .field("closed", &self.is_closed())
            .finish()
    }
}
