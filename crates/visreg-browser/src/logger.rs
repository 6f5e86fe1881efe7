//! Logging collaborator used by the comparer
//!
//! The comparer reports through [`VisualLogger`] rather than calling `tracing`
//! directly so hosts can route messages and tests can assert on them.

use std::sync::Mutex;
use tracing::{info, warn};

/// Sink for the messages the comparer surfaces to the test author
pub trait VisualLogger: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Forwards to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl VisualLogger for TracingLogger {
    fn info(&self, message: &str) {
        info!("{}", message);
    }

    fn warn(&self, message: &str) {
        warn!("{}", message);
    }
}

/// Severity of a recorded message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
}

/// Recording logger for testing
#[derive(Debug, Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded messages in order
    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.messages_at(LogLevel::Info)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.messages_at(LogLevel::Warn)
    }

    fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message)
            .collect()
    }

    fn record(&self, level: LogLevel, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((level, message.to_string()));
    }
}

impl VisualLogger for RecordingLogger {
    fn info(&self, message: &str) {
        self.record(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.record(LogLevel::Warn, message);
    }
}
