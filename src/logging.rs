/// Structured logging for the gauge page service.
///
/// Provides context-rich logging with pipeline stage and site identifiers,
/// timestamps, and severity levels. Supports both console output and
/// file-based logging for unattended operation.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use crate::model::StageError;

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

// ---------------------------------------------------------------------------
// Log Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSource {
    Usgs,
    Pipeline,
    Chart,
    Http,
    System,
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogSource::Usgs => write!(f, "USGS"),
            LogSource::Pipeline => write!(f, "PIPE"),
            LogSource::Chart => write!(f, "CHART"),
            LogSource::Http => write!(f, "HTTP"),
            LogSource::System => write!(f, "SYS"),
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
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>) {
        let logger = Logger { min_level, log_file };
        *LOGGER.lock().unwrap() = Some(logger);
    }

    fn log(&self, level: LogLevel, source: &LogSource, site_id: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let site_part = site_id.map(|s| format!(" [{}]", s)).unwrap_or_default();
        let log_entry = format!("{} {} {}{}: {}", timestamp, level, source, site_part, message);

        match level {
            LogLevel::Error | LogLevel::Warning => eprintln!("{}", log_entry),
            LogLevel::Info | LogLevel::Debug => println!("{}", log_entry),
        }

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
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>) {
    Logger::init(min_level, log_file.map(String::from));
}

/// Log a general informational message
pub fn info(source: LogSource, site_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Info, &source, site_id, message);
    }
}

/// Log a warning message
pub fn warn(source: LogSource, site_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Warning, &source, site_id, message);
    }
}

/// Log an error message
pub fn error(source: LogSource, site_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Error, &source, site_id, message);
    }
}

/// Log a debug message
pub fn debug(source: LogSource, site_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Debug, &source, site_id, message);
    }
}

// ---------------------------------------------------------------------------
// Stage Failure Logging
// ---------------------------------------------------------------------------

/// Severity for a pipeline stage failure.
///
/// Benign data gaps (the service simply has nothing for us, or a summary
/// endpoint is missing) log as warnings; anything that suggests a service
/// problem or a transformation bug logs as an error. The page degrades
/// silently either way, so this is the only place the distinction shows.
fn failure_level(err: &StageError) -> LogLevel {
    match err {
        StageError::EmptyTable
        | StageError::NoEstimatedLevels
        | StageError::MissingHourEndpoint
        | StageError::NoPriorDayRows
        | StageError::NoPlottableData => LogLevel::Warning,
        StageError::HttpStatus(_)
        | StageError::Request(_)
        | StageError::Parse(_)
        | StageError::DuplicateObservation { .. }
        | StageError::MissingSourceColumn(_) => LogLevel::Error,
    }
}

/// Log a pipeline stage failure with its reason code.
pub fn log_stage_failure(source: LogSource, stage: &str, err: &StageError) {
    let message = format!("{} failed: {}", stage, err);
    match failure_level(err) {
        LogLevel::Error => error(source, None, &message),
        _ => warn(source, None, &message),
    }
}
