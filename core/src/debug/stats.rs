//! Read-only runtime statistics
//!
//! Engine subsystems report their counters as name/value pairs so a host
//! overlay or log line can show them without knowing their types.

use std::time::Duration;

/// A single named statistic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugStat {
    pub name: String,
    /// Current value, already formatted
    pub value: String,
}

impl DebugStat {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn number(name: impl Into<String>, value: impl std::fmt::Display) -> Self {
        Self::new(name, value.to_string())
    }

    /// Byte count formatted as B/KiB/MiB
    pub fn bytes(name: impl Into<String>, bytes: u64) -> Self {
        let value = if bytes >= 1024 * 1024 {
            format!("{:.1} MiB", bytes as f64 / (1024.0 * 1024.0))
        } else if bytes >= 1024 {
            format!("{:.1} KiB", bytes as f64 / 1024.0)
        } else {
            format!("{} B", bytes)
        };
        Self::new(name, value)
    }

    /// Duration in milliseconds with an event count
    pub fn timing(name: impl Into<String>, time: Duration, events: u32) -> Self {
        Self::new(
            name,
            format!("{:.4}ms ({} events)", time.as_secs_f64() * 1000.0, events),
        )
    }
}
