//! Append-only cleaning log.
//!
//! The cleaner records what it changed (date conversions, fill values,
//! duplicate removal) in a plain-text log file, one timestamped entry per
//! line:
//!
//! ```text
//! 2026-10-18 09:14:02,317 - INFO - Filled null val for: status with: active
//! ```
//!
//! A [`LogSink`] is an explicit handle: open it once, hand it to the cleaner,
//! and it stays open for as long as the cleaner lives. Every entry is also
//! forwarded to `tracing`, so a subscriber installed by the binary sees the
//! same messages on the console.

use crate::error::{CleaningError, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Info,
    Error,
}

impl LogLevel {
    /// Label written to the log file.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Error => "ERROR",
        }
    }
}

/// A single log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    fn now(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S,%3f").to_string(),
            level,
            message: message.into(),
        }
    }

    /// Render the entry as a single log-file line (without newline).
    pub fn to_line(&self) -> String {
        format!("{} - {} - {}", self.timestamp, self.level.label(), self.message)
    }
}

enum SinkTarget {
    File { path: PathBuf, file: File },
    Memory(Vec<LogEntry>),
}

/// Destination for cleaning log entries.
pub struct LogSink {
    target: SinkTarget,
}

impl LogSink {
    /// Open (or create) `<dir>/<name>.log` for appending.
    ///
    /// The directory is created if it does not exist yet.
    pub fn open(dir: impl AsRef<Path>, name: &str) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| {
                CleaningError::Io(e)
                    .with_context(format!("Failed to create log directory {}", dir.display()))
            })?;
        }

        let path = dir.join(format!("{name}.log"));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                CleaningError::Io(e)
                    .with_context(format!("Failed to open log file {}", path.display()))
            })?;

        Ok(Self {
            target: SinkTarget::File { path, file },
        })
    }

    /// A sink that keeps entries in memory instead of writing a file.
    pub fn memory() -> Self {
        Self {
            target: SinkTarget::Memory(Vec::new()),
        }
    }

    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        match &self.target {
            SinkTarget::File { path, .. } => Some(path),
            SinkTarget::Memory(_) => None,
        }
    }

    /// Entries recorded by an in-memory sink. Empty for file sinks.
    pub fn entries(&self) -> &[LogEntry] {
        match &self.target {
            SinkTarget::File { .. } => &[],
            SinkTarget::Memory(entries) => entries,
        }
    }

    /// Append an INFO entry.
    pub fn info(&mut self, message: impl Into<String>) -> Result<()> {
        let entry = LogEntry::now(LogLevel::Info, message);
        info!("{}", entry.message);
        self.append(entry)
    }

    /// Append an ERROR entry.
    pub fn error(&mut self, message: impl Into<String>) -> Result<()> {
        let entry = LogEntry::now(LogLevel::Error, message);
        error!("{}", entry.message);
        self.append(entry)
    }

    fn append(&mut self, entry: LogEntry) -> Result<()> {
        match &mut self.target {
            SinkTarget::File { file, .. } => {
                writeln!(file, "{}", entry.to_line())?;
                file.flush()?;
            }
            SinkTarget::Memory(entries) => entries.push(entry),
        }
        Ok(())
    }
}

impl std::fmt::Debug for LogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.target {
            SinkTarget::File { path, .. } => f.debug_struct("LogSink").field("path", path).finish(),
            SinkTarget::Memory(entries) => f
                .debug_struct("LogSink")
                .field("entries", &entries.len())
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_levels() {
        let mut sink = LogSink::memory();
        sink.info("Converted date(object) to date(date)").unwrap();
        sink.error("Unable to convert to date column").unwrap();

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].level, LogLevel::Info);
        assert_eq!(entries[1].level, LogLevel::Error);
        assert!(sink.path().is_none());
    }

    #[test]
    fn test_entry_line_format() {
        let entry = LogEntry {
            timestamp: "2026-10-18 09:14:02,317".to_string(),
            level: LogLevel::Info,
            message: "Removed duplicate values".to_string(),
        };
        assert_eq!(
            entry.to_line(),
            "2026-10-18 09:14:02,317 - INFO - Removed duplicate values"
        );
    }

    #[test]
    fn test_file_sink_creates_directory_and_appends() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("logs");

        {
            let mut sink = LogSink::open(&dir, "data_cleaning").unwrap();
            sink.info("first").unwrap();
        }
        {
            let mut sink = LogSink::open(&dir, "data_cleaning").unwrap();
            sink.error("second").unwrap();
            assert!(sink.entries().is_empty());
        }

        let content = std::fs::read_to_string(dir.join("data_cleaning.log")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" - INFO - first"));
        assert!(lines[1].ends_with(" - ERROR - second"));
    }
}
