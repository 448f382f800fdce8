//! Progress log for batch runs.
//!
//! Entries are printed to stdout and fanned out to any subscribed receivers,
//! so callers embedding the library (and tests) can observe progress.

use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Mutex;

/// Log level for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Optional indentation level (for nested logs)
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Line as printed on stdout.
    pub fn render(&self) -> String {
        let prefix = match self.level {
            LogLevel::Info => "",
            LogLevel::Success => "✅ ",
            LogLevel::Warning => "⚠️  ",
            LogLevel::Error => "❌ ",
        };
        let indent = "   ".repeat(self.indent as usize);
        format!("{}{}{}", indent, prefix, self.message)
    }
}

/// Global progress log
pub static PROGRESS_LOG: Lazy<ProgressLog> = Lazy::new(ProgressLog::new);

/// Prints log entries and forwards them to subscribers
pub struct ProgressLog {
    subscribers: Mutex<Vec<mpsc::Sender<LogEntry>>>,
    quiet: AtomicBool,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            quiet: AtomicBool::new(false),
        }
    }

    /// Print an entry and send it to all subscribers.
    ///
    /// Errors are printed even when quiet.
    pub fn log(&self, entry: LogEntry) {
        if entry.level == LogLevel::Error || !self.quiet.load(Ordering::Relaxed) {
            println!("{}", entry.render());
        }

        if let Ok(mut subscribers) = self.subscribers.lock() {
            // drop receivers that hung up
            subscribers.retain(|tx| tx.send(entry.clone()).is_ok());
        }
    }

    /// Get a receiver for every entry logged from now on
    pub fn subscribe(&self) -> mpsc::Receiver<LogEntry> {
        let (tx, rx) = mpsc::channel();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(tx);
        }
        rx
    }

    /// Silence stdout printing of non-error entries; subscribers still receive everything
    pub fn set_quiet(&self, quiet: bool) {
        self.quiet.store(quiet, Ordering::Relaxed);
    }
}

impl Default for ProgressLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenient logging functions
pub fn log_info(msg: impl Into<String>) {
    PROGRESS_LOG.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    PROGRESS_LOG.log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    PROGRESS_LOG.log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    PROGRESS_LOG.log(LogEntry::error(msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    PROGRESS_LOG.log(LogEntry::info(msg).with_indent(indent));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prefixes() {
        assert_eq!(
            LogEntry::success("Successfully created 2019Q1.json").render(),
            "✅ Successfully created 2019Q1.json"
        );
        assert_eq!(LogEntry::info("Found 2 CSV files").render(), "Found 2 CSV files");
        assert_eq!(LogEntry::info("row").with_indent(2).render(), "      row");
        assert!(LogEntry::error("boom").render().starts_with("❌"));
    }

    #[test]
    fn test_subscribers_receive_entries() {
        let log = ProgressLog::new();
        log.set_quiet(true);
        let rx = log.subscribe();

        log.log(LogEntry::warning("skipped notes.csv"));
        log.log(LogEntry::info("done"));

        let received: Vec<LogEntry> = rx.try_iter().collect();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].level, LogLevel::Warning);
        assert_eq!(received[1].message, "done");
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let log = ProgressLog::new();
        log.set_quiet(true);
        drop(log.subscribe());
        let rx = log.subscribe();

        log.log(LogEntry::info("still delivered"));

        assert_eq!(rx.try_iter().count(), 1);
        assert_eq!(log.subscribers.lock().map(|s| s.len()).unwrap_or(0), 1);
    }
}
