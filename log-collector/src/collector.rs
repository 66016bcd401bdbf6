//! The single consumer task that owns the log sink.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::Error;
use crate::event::LogEvent;
use crate::logger::Logger;
use crate::sink::Sink;

pub(crate) enum Message {
    Event(LogEvent),
    Stop,
}

/// Drains the shared channel into a [`Sink`], one event at a time.
pub struct Collector<S> {
    rx: UnboundedReceiver<Message>,
    sink: S,
}

impl<S: Sink> Collector<S> {
    /// Creates a collector and the first [`Logger`] feeding it.
    pub fn new(sink: S, origin: impl Into<String>) -> (Self, Logger) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx, sink }, Logger::new(origin, tx))
    }

    /// Writes events in arrival order until the stop sentinel arrives or every
    /// producer is gone. Returns the number of events written.
    ///
    /// A sink error ends the loop; events still queued are discarded.
    pub async fn run(mut self) -> Result<usize, Error> {
        let mut written = 0;
        while let Some(message) = self.rx.recv().await {
            match message {
                Message::Event(event) => {
                    self.sink.write(&event)?;
                    written += 1;
                }
                Message::Stop => break,
            }
        }
        self.sink.flush()?;
        Ok(written)
    }
}

/// Owner-side handle used to stop the collector and wait for it to drain.
pub struct CollectorHandle {
    tx: UnboundedSender<Message>,
    handle: JoinHandle<Result<usize, Error>>,
}

impl CollectorHandle {
    /// Sends the stop sentinel and waits for the collector to exit.
    ///
    /// Every event enqueued before this call is written first, since the
    /// sentinel travels through the same FIFO channel.
    pub async fn shutdown(self) -> Result<usize, Error> {
        let _ = self.tx.send(Message::Stop);
        let written = self.handle.await??;
        Ok(written)
    }
}

/// Spawns a [`Collector`] on the current tokio runtime.
pub fn spawn<S>(sink: S, origin: impl Into<String>) -> (Logger, CollectorHandle)
where
    S: Sink + Send + 'static,
{
    let (collector, logger) = Collector::new(sink, origin);
    let handle = CollectorHandle {
        tx: logger.sender(),
        handle: tokio::spawn(collector.run()),
    };
    (logger, handle)
}
