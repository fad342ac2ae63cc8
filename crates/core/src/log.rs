//! Logging capability handed to services at construction.
//!
//! Services never reach for a global logger; they log through an
//! `Arc<dyn Logger>` so tests can capture output without a subscriber.

use std::sync::{Mutex, PoisonError};

pub trait Logger: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards to `tracing`, tagging each event with the owning component.
#[derive(Debug, Clone, Copy)]
pub struct TracingLogger {
    component: &'static str,
}

impl TracingLogger {
    #[must_use]
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }
}

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!(component = self.component, "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(component = self.component, "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(component = self.component, "{message}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

/// Keeps every entry in memory. Intended for tests.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|e| e.level == level)
            .map(|e| e.message)
            .collect()
    }

    fn push(&self, level: LogLevel, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogEntry {
                level,
                message: message.to_owned(),
            });
    }
}

impl Logger for MemoryLogger {
    fn info(&self, message: &str) {
        self.push(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(LogLevel::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_logger_keeps_levels_apart() {
        let logger = MemoryLogger::new();
        logger.info("created");
        logger.error("boom");
        logger.info("listed");

        assert_eq!(logger.messages(LogLevel::Info), vec!["created", "listed"]);
        assert_eq!(logger.messages(LogLevel::Error), vec!["boom"]);
        assert!(logger.messages(LogLevel::Warn).is_empty());
        assert_eq!(logger.entries().len(), 3);
    }
}
