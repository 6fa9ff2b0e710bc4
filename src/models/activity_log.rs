//! Bounded, newest-first activity log shown to the operator.

use std::collections::VecDeque;
use std::fmt;

use chrono::{Local, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Maximum number of entries retained.
pub const LOG_CAPACITY: usize = 100;

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Info,
    Success,
    Warning,
    Error,
}

impl LogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Info => "info",
            LogKind::Success => "success",
            LogKind::Warning => "warning",
            LogKind::Error => "error",
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single timestamped message. Never mutated after insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Wall-clock time of day
    pub time: NaiveTime,
    pub message: String,
    pub kind: LogKind,
}

/// Ring buffer of log entries, newest first.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Insert a message at the head, evicting the oldest entry when full.
    pub fn append(&mut self, message: impl Into<String>, kind: LogKind) {
        let message = message.into();

        match kind {
            LogKind::Info | LogKind::Success => info!(kind = %kind, "{}", message),
            LogKind::Warning => warn!("{}", message),
            LogKind::Error => error!("{}", message),
        }

        self.entries.push_front(LogEntry {
            time: Local::now().time(),
            message,
            kind,
        });

        if self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.append(message, LogKind::Info);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.append(message, LogKind::Success);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.append(message, LogKind::Warning);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.append(message, LogKind::Error);
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// True if any entry of `kind` contains `needle`.
    #[cfg(test)]
    pub fn contains(&self, kind: LogKind, needle: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.kind == kind && e.message.contains(needle))
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first() {
        let mut log = ActivityLog::new();
        log.info("first");
        log.warning("second");

        let messages: Vec<_> = log.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["second", "first"]);
        assert!(log.contains(LogKind::Warning, "sec"));
        assert!(!log.contains(LogKind::Error, "sec"));
    }

    #[test]
    fn test_evicts_oldest_past_capacity() {
        let mut log = ActivityLog::new();
        for i in 0..=LOG_CAPACITY {
            log.info(format!("entry {}", i));
        }

        assert_eq!(log.len(), LOG_CAPACITY);
        assert!(!log.entries().any(|e| e.message == "entry 0"));

        // Remaining entries keep newest-first order: 100, 99, ..., 1
        let indices: Vec<usize> = log
            .entries()
            .map(|e| e.message.trim_start_matches("entry ").parse().unwrap())
            .collect();
        let expected: Vec<usize> = (1..=LOG_CAPACITY).rev().collect();
        assert_eq!(indices, expected);
    }

    #[test]
    fn test_clear() {
        let mut log = ActivityLog::with_capacity(3);
        log.error("boom");
        assert!(!log.is_empty());
        log.clear();
        assert!(log.is_empty());
    }
}
