/// Structured logging for the chart renderer
///
/// Provides context-rich logging with city identifiers, timestamps,
/// and severity levels. Supports both console output and file-based
/// logging for unattended runs.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::str::FromStr;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline Stage Tags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Cloud cover fetch and rectangles
    Cover,
    /// Sunrise / sunset fetch and bands
    Sun,
    /// Legacy fixed-width weather report (debug only)
    Weather,
    /// Output documents
    Render,
    System,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Cover => write!(f, "COVER"),
            Source::Sun => write!(f, "SUN"),
            Source::Weather => write!(f, "WEATHER"),
            Source::Render => write!(f, "RENDER"),
            Source::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - e.g. an offline replay directory missing a file
    Expected,
    /// Unexpected failure - the data host or the file format changed
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        *LOGGER.lock().unwrap_or_else(|e| e.into_inner()) = Some(logger);
    }

    fn log(&self, level: LogLevel, source: &Source, city: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");

        let city_part = city.map(|c| format!(" [{}]", c)).unwrap_or_default();
        let log_entry = format!(
            "{} {} {}{}: {}",
            timestamp, level, source, city_part, message
        );

        // Console output
        if self.console_timestamps {
            match level {
                LogLevel::Error | LogLevel::Warning => eprintln!("{}", log_entry),
                LogLevel::Info | LogLevel::Debug => println!("{}", log_entry),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", source, city_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", source, city_part, message),
                LogLevel::Info => println!("   {}{}: {}", source, city_part, message),
                LogLevel::Debug => println!("   [DEBUG] {}{}: {}", source, city_part, message),
            }
        }

        // File output
        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

fn dispatch(level: LogLevel, source: Source, city: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap_or_else(|e| e.into_inner()).as_ref() {
        logger.log(level, &source, city, message);
    }
}

/// Log a general informational message
pub fn info(source: Source, city: Option<&str>, message: &str) {
    dispatch(LogLevel::Info, source, city, message);
}

/// Log a warning message
pub fn warn(source: Source, city: Option<&str>, message: &str) {
    dispatch(LogLevel::Warning, source, city, message);
}

/// Log an error message
pub fn error(source: Source, city: Option<&str>, message: &str) {
    dispatch(LogLevel::Error, source, city, message);
}

/// Log a debug message
pub fn debug(source: Source, city: Option<&str>, message: &str) {
    dispatch(LogLevel::Debug, source, city, message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify a fetch / parse failure from its error message
pub fn classify_fetch_failure(error_message: &str) -> FailureType {
    // A replay directory without the file is a setup gap, not an outage
    if error_message.contains("No such file") || error_message.contains("not found") {
        FailureType::Expected
    }
    // The gist host answered but refused or errored
    else if error_message.contains("HTTP error") {
        FailureType::Unexpected
    }
    // Columns or formats changed underneath us
    else if error_message.contains("Parse error") {
        FailureType::Unexpected
    }
    // Network trouble on our side or theirs
    else {
        FailureType::Unknown
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Log a pipeline failure with automatic classification
pub fn log_fetch_failure(source: Source, city: &str, operation: &str, err: &dyn std::error::Error) {
    let error_msg = err.to_string();
    let failure_type = classify_fetch_failure(&error_msg);

    let message = format!("{} failed [{}]: {}", operation, failure_type, error_msg);

    match failure_type {
        FailureType::Expected => warn(source, Some(city), &message),
        FailureType::Unexpected => error(source, Some(city), &message),
        FailureType::Unknown => error(source, Some(city), &message),
    }
}

// ---------------------------------------------------------------------------
// Run Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of the chart run
/// Level and text of the end-of-run summary entry.
///
/// Partial charts painted their cover marks, so they count as painted but
/// are listed apart from the fully successful ones.
pub fn render_summary_entry(
    total: usize,
    successful: usize,
    partial: usize,
    failed: usize,
) -> (LogLevel, String) {
    let painted = successful + partial;
    let message = format!(
        "Render complete: {}/{} charts painted ({} partial), {} failed",
        painted, total, partial, failed
    );

    let level = if failed == 0 && partial == 0 {
        LogLevel::Info
    } else if painted == 0 {
        LogLevel::Error
    } else {
        LogLevel::Warning
    };
    (level, message)
}

pub fn log_render_summary(total: usize, successful: usize, partial: usize, failed: usize) {
    let (level, message) = render_summary_entry(total, successful, partial, failed);
    dispatch(level, Source::Render, None, &message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!(" WARN ".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_render_summary_counts_partial_charts_as_painted() {
        let (level, message) = render_summary_entry(3, 2, 1, 0);
        assert_eq!(level, LogLevel::Warning);
        assert_eq!(message, "Render complete: 3/3 charts painted (1 partial), 0 failed");

        let (level, message) = render_summary_entry(3, 2, 0, 1);
        assert_eq!(level, LogLevel::Warning);
        assert_eq!(message, "Render complete: 2/3 charts painted (0 partial), 1 failed");

        assert_eq!(render_summary_entry(3, 3, 0, 0).0, LogLevel::Info);
        assert_eq!(render_summary_entry(3, 0, 0, 3).0, LogLevel::Error);
    }

    #[test]
    fn test_failure_classification() {
        let missing = "I/O error: No such file or directory (os error 2)";
        assert_eq!(classify_fetch_failure(missing), FailureType::Expected);

        let http_error = "HTTP error: 500";
        assert_eq!(classify_fetch_failure(http_error), FailureType::Unexpected);

        let parse_error = "Parse error: CSV deserialize error: record 1";
        assert_eq!(classify_fetch_failure(parse_error), FailureType::Unexpected);

        let timeout = "Request failed: operation timed out";
        assert_eq!(classify_fetch_failure(timeout), FailureType::Unknown);
    }
}
