//! Table event logger
//!
//! Messages are filtered by verbosity, optionally captured into an in-memory buffer
//! (for tests and for presentation layers that show an event feed) and printed as text
//! or as JSON lines. Formatting of temporary strings goes through a bump arena.

use bumpalo::Bump;
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::fmt::{self, Write as FmtWrite};
use std::ops::Deref;

/// Verbosity level for table output
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum VerbosityLevel {
    /// Silent - no output
    Silent = 0,
    /// Minimal - only rejected intents and script summaries
    Minimal = 1,
    /// Normal - moves, attachments and phase changes (default)
    #[default]
    Normal = 2,
    /// Verbose - setup and selection details
    Verbose = 3,
}

impl std::str::FromStr for VerbosityLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityLevel::Silent),
            "minimal" | "1" => Ok(VerbosityLevel::Minimal),
            "normal" | "2" => Ok(VerbosityLevel::Normal),
            "verbose" | "3" => Ok(VerbosityLevel::Verbose),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

/// Output format for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// Machine-readable JSON output (one object per line)
    Json,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Output only to stdout (default)
    #[default]
    Stdout,
    /// Capture only to in-memory buffer (no stdout)
    Memory,
}

/// A captured log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Verbosity level of this log entry
    pub level: VerbosityLevel,
    /// Log message
    pub message: String,
    /// Optional category (e.g., "move", "attach", "phase")
    pub category: Option<String>,
}

/// Guard type that provides read-only access to captured log entries
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl<'a> LogGuard<'a> {
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.guard.iter()
    }

    pub fn len(&self) -> usize {
        self.guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Centralized logger for table events
pub struct TableLogger {
    verbosity: VerbosityLevel,
    output_format: OutputFormat,
    output_mode: OutputMode,

    /// Scratch arena for formatting; reset after every message
    format_bump: RefCell<Bump>,

    /// Captured log entries
    log_buffer: RefCell<Vec<LogEntry>>,
}

impl TableLogger {
    /// Create a new logger with default verbosity (Normal)
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        TableLogger {
            verbosity,
            output_format: OutputFormat::default(),
            output_mode: OutputMode::default(),
            format_bump: RefCell::new(Bump::new()),
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    /// Capture into the in-memory buffer and suppress stdout
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn is_capturing(&self) -> bool {
        self.output_mode == OutputMode::Memory
    }

    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.output_format = format;
    }

    /// Get access to captured log entries
    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.log_buffer.borrow(),
        }
    }

    fn write_stdout(&self, entry: &LogEntry) {
        match self.output_format {
            OutputFormat::Text => {
                if entry.level == VerbosityLevel::Minimal {
                    println!("{}", entry.message);
                } else {
                    println!("  {}", entry.message);
                }
            }
            OutputFormat::Json => match serde_json::to_string(entry) {
                Ok(line) => println!("{line}"),
                Err(_) => println!("{}", entry.message),
            },
        }
    }

    fn emit(&self, level: VerbosityLevel, category: Option<&str>, message: &str) {
        if level == VerbosityLevel::Silent {
            return;
        }

        let should_capture = self.is_capturing();
        let should_output = self.output_mode == OutputMode::Stdout && level <= self.verbosity;

        if !should_capture && !should_output {
            return;
        }

        let entry = LogEntry {
            level,
            message: message.to_string(),
            category: category.map(str::to_string),
        };

        if should_output {
            self.write_stdout(&entry);
        }
        if should_capture {
            self.log_buffer.borrow_mut().push(entry);
        }
    }

    /// Would a message at `level` be printed or captured?
    #[inline]
    pub fn enabled(&self, level: VerbosityLevel) -> bool {
        level != VerbosityLevel::Silent && (level <= self.verbosity || self.is_capturing())
    }

    /// Log a categorized event, formatting into the scratch arena
    ///
    /// Skips formatting entirely when the message would be discarded.
    pub fn event(&self, level: VerbosityLevel, category: &str, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }

        let mut bump = self.format_bump.borrow_mut();
        {
            let mut message = bumpalo::collections::String::new_in(&bump);
            if message.write_fmt(args).is_ok() {
                self.emit(level, Some(category), message.as_str());
            }
        }
        bump.reset();
    }
}

impl Default for TableLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TableLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("log_count", &self.log_buffer.borrow().len())
            .finish()
    }
}

impl Clone for TableLogger {
    fn clone(&self) -> Self {
        TableLogger {
            verbosity: self.verbosity,
            output_format: self.output_format,
            output_mode: self.output_mode,
            format_bump: RefCell::new(Bump::new()),
            log_buffer: RefCell::new(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_creation() {
        let logger = TableLogger::new();
        assert!(logger.enabled(VerbosityLevel::Normal));
        assert!(!logger.enabled(VerbosityLevel::Verbose));
        assert!(!logger.is_capturing());
    }

    #[test]
    fn test_log_capture() {
        let mut logger = TableLogger::new();
        logger.enable_capture();

        logger.event(VerbosityLevel::Normal, "phase", format_args!("test message"));
        logger.event(VerbosityLevel::Minimal, "rejected", format_args!("minimal message"));

        let logs = logger.logs();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].message, "test message");
        assert_eq!(logs[1].level, VerbosityLevel::Minimal);
    }

    #[test]
    fn test_event_formats_with_category() {
        let mut logger = TableLogger::with_verbosity(VerbosityLevel::Silent);
        logger.enable_capture();

        logger.event(VerbosityLevel::Normal, "move", format_args!("{} -> {}", "Forest", "lands"));

        let logs = logger.logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].message, "Forest -> lands");
        assert_eq!(logs[0].category.as_deref(), Some("move"));
    }

    #[test]
    fn test_silent_messages_are_dropped() {
        let mut logger = TableLogger::new();
        logger.enable_capture();
        logger.event(VerbosityLevel::Silent, "move", format_args!("never"));
        assert!(logger.logs().is_empty());
    }

    #[test]
    fn test_capture_keeps_levels_above_verbosity() {
        let mut logger = TableLogger::with_verbosity(VerbosityLevel::Minimal);
        assert!(!logger.enabled(VerbosityLevel::Verbose));

        logger.enable_capture();
        assert!(logger.enabled(VerbosityLevel::Verbose));
        logger.event(VerbosityLevel::Verbose, "setup", format_args!("created"));
        assert_eq!(logger.logs().len(), 1);
    }

    #[test]
    fn test_verbosity_parsing() {
        assert_eq!("3".parse::<VerbosityLevel>().unwrap(), VerbosityLevel::Verbose);
        assert_eq!("Minimal".parse::<VerbosityLevel>().unwrap(), VerbosityLevel::Minimal);
        assert!("loud".parse::<VerbosityLevel>().is_err());
    }
}
