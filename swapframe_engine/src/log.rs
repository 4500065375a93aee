//! Engine log facade types
//!
//! Entries carry a severity, the emitting subsystem (`swapframe::Surface`,
//! `swapframe::Pipeline`, `swapframe::vulkan`, ...) and, for errors, the
//! source location. `Engine` owns the active `Logger`; the `engine_*` macros
//! below are the way subsystems write to it.

use colored::*;
use std::str::FromStr;
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Destination of engine log entries
///
/// Called from whichever thread logs (the frame loop, or a driver thread
/// for validation messages), so implementations must be thread-safe.
///
/// # Example
///
/// ```no_run
/// use swapframe_engine::swapframe::log::{Logger, LogEntry};
///
/// struct StderrLogger;
///
/// impl Logger for StderrLogger {
///     fn log(&self, entry: &LogEntry) {
///         eprintln!("{} {}", entry.source, entry.message);
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    fn log(&self, entry: &LogEntry);
}

/// One log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: LogSeverity,
    pub timestamp: SystemTime,
    /// Emitting subsystem, e.g. "swapframe::Pipeline"
    pub source: String,
    pub message: String,
    /// Source file, only set by `engine_error!`
    pub file: Option<&'static str>,
    /// Source line, only set by `engine_error!`
    pub line: Option<u32>,
}

/// Log severity, ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Per-frame detail (fence waits, recorded commands)
    Trace,
    Debug,
    /// Lifecycle events (window created, pipeline initialized)
    Info,
    /// Recoverable misuse or degraded behavior
    Warn,
    /// Failures, logged with file:line
    Error,
}

impl LogSeverity {
    /// Fixed-width label used by the default logger
    pub fn label(self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }
}

impl FromStr for LogSeverity {
    type Err = String;

    /// Case-insensitive severity name ("trace", "debug", "info", "warn"/"warning", "error")
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogSeverity::Trace),
            "debug" => Ok(LogSeverity::Debug),
            "info" => Ok(LogSeverity::Info),
            "warn" | "warning" => Ok(LogSeverity::Warn),
            "error" => Ok(LogSeverity::Error),
            _ => Err(format!("unknown log severity '{}'", s)),
        }
    }
}

/// Plain-text rendering of an entry, without colors
///
/// `[YYYY-MM-DD HH:MM:SS.mmm] [SEVERITY] [source] message`, followed by
/// ` (file:line)` when the entry has a location.
pub fn format_entry(entry: &LogEntry) -> String {
    let mut line = format!(
        "[{}] [{}] [{}] {}",
        timestamp(entry),
        entry.severity.label(),
        entry.source,
        entry.message
    );
    if let Some(location) = location(entry) {
        line.push_str(&format!(" ({})", location));
    }
    line
}

fn timestamp(entry: &LogEntry) -> String {
    let datetime: DateTime<Local> = entry.timestamp.into();
    datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

fn location(entry: &LogEntry) -> Option<String> {
    match (entry.file, entry.line) {
        (Some(file), Some(line)) => Some(format!("{}:{}", file, line)),
        _ => None,
    }
}

/// Colored console logger, installed until `Engine::set_logger` replaces it
///
/// Trace and Debug go to stdout dimmed/cyan, Info to stdout green, Warn and
/// Error to stderr yellow/red.
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let label = entry.severity.label();
        let severity = match entry.severity {
            LogSeverity::Trace => label.bright_black(),
            LogSeverity::Debug => label.cyan(),
            LogSeverity::Info => label.green(),
            LogSeverity::Warn => label.yellow(),
            LogSeverity::Error => label.red().bold(),
        };
        let mut line = format!(
            "[{}] [{}] [{}] {}",
            timestamp(entry),
            severity,
            entry.source.bright_blue(),
            entry.message
        );
        if let Some(location) = location(entry) {
            line.push_str(&format!(" ({})", location.bright_black()));
        }

        if entry.severity >= LogSeverity::Warn {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message (very verbose, typically disabled)
///
/// # Example
///
/// ```no_run
/// # use swapframe_engine::*;
/// engine_trace!("swapframe::Pipeline", "Recording frame {}", 3);
/// ```
#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::swapframe::Engine::log(
            $crate::swapframe::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message (development information)
///
/// # Example
///
/// ```no_run
/// # use swapframe_engine::*;
/// engine_debug!("swapframe::Surface", "Registering window class {}", "Main");
/// ```
#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::swapframe::Engine::log(
            $crate::swapframe::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message (important events)
///
/// # Example
///
/// ```no_run
/// # use swapframe_engine::*;
/// engine_info!("swapframe::Pipeline", "Presentation pipeline initialized");
/// ```
#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::swapframe::Engine::log(
            $crate::swapframe::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message (potential issues)
///
/// # Example
///
/// ```no_run
/// # use swapframe_engine::*;
/// engine_warn!("swapframe::Surface", "Window class {} already unregistered", "Main");
/// ```
#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::swapframe::Engine::log(
            $crate::swapframe::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
///
/// # Example
///
/// ```no_run
/// # use swapframe_engine::*;
/// engine_error!("swapframe::vulkan", "Failed to present: {}", -4);
/// ```
#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::swapframe::Engine::log_detailed(
            $crate::swapframe::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
