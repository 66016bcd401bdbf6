//! The record carried from producers to the collector.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::Level;

/// A single diagnostic record travelling from a producer to the collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub origin: String,
    pub level: Level,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl LogEvent {
    pub fn new(origin: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:>5} {}: {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.level,
            self.origin,
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn display_carries_level_origin_and_message() {
        let mut event = LogEvent::new("worker-2", Level::WARN, "rows 4..6 slow");
        event.timestamp = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap();

        assert_eq!(
            event.to_string(),
            "2024-03-01T12:30:05.000Z  WARN worker-2: rows 4..6 slow"
        );
    }
}
