//! Log destinations owned by the collector.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::Level;

use crate::event::LogEvent;

/// A destination for log events.
///
/// Only the collector task ever calls into a sink, so implementations need no
/// internal synchronization of their own.
pub trait Sink {
    fn write(&mut self, event: &LogEvent) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write(&mut self, event: &LogEvent) -> io::Result<()> {
        (**self).write(event)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Re-emits every event through `tracing`, leaving formatting and output to
/// the process subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn write(&mut self, event: &LogEvent) -> io::Result<()> {
        let origin = event.origin.as_str();
        let emitted_at = event.timestamp;
        match event.level {
            Level::ERROR => tracing::error!(origin, %emitted_at, "{}", event.message),
            Level::WARN => tracing::warn!(origin, %emitted_at, "{}", event.message),
            Level::INFO => tracing::info!(origin, %emitted_at, "{}", event.message),
            Level::DEBUG => tracing::debug!(origin, %emitted_at, "{}", event.message),
            _ => tracing::trace!(origin, %emitted_at, "{}", event.message),
        }
        Ok(())
    }
}

/// Writes one line per event to any [`Write`] implementation.
pub struct WriterSink<W> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<BufWriter<File>> {
    /// Opens `path` for appending, creating it if needed.
    pub fn append_to(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> Sink for WriterSink<W> {
    fn write(&mut self, event: &LogEvent) -> io::Result<()> {
        writeln!(self.writer, "{event}")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Keeps every event in memory; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<LogEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the events written so far.
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

impl Sink for MemorySink {
    fn write(&mut self, event: &LogEvent) -> io::Result<()> {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event.clone());
        }
        Ok(())
    }
}

/// Writes every event to two sinks, first then second.
pub struct Tee<A, B> {
    first: A,
    second: B,
}

impl<A, B> Tee<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: Sink, B: Sink> Sink for Tee<A, B> {
    fn write(&mut self, event: &LogEvent) -> io::Result<()> {
        self.first.write(event)?;
        self.second.write(event)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.first.flush()?;
        self.second.flush()
    }
}
