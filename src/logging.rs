/// Structured logging for the SUPT continuum monitor
///
/// Provides context-rich logging with source/region identifiers,
/// timestamps, and severity levels. Supports both console output
/// and file-based logging.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use crate::model::{FailureKind, MetricSnapshot, SourceError};

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
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Noaa,
    Ingv,
    Local,
    Synthetic,
    Engine,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Noaa => write!(f, "NOAA"),
            DataSource::Ingv => write!(f, "INGV"),
            DataSource::Local => write!(f, "LOCAL"),
            DataSource::Synthetic => write!(f, "SYNTH"),
            DataSource::Engine => write!(f, "ENGINE"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - the feed answered but had nothing for this window
    Expected,
    /// Unexpected failure - service degradation, API change or bad file
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

    fn log(&self, level: LogLevel, source: DataSource, context: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let context_part = context.map(|c| format!(" [{}]", c)).unwrap_or_default();
        let log_entry = format!(
            "{} {} {}{}: {}",
            timestamp, level, source, context_part, message
        );

        if self.console_timestamps {
            match level {
                LogLevel::Error | LogLevel::Warning => eprintln!("{}", log_entry),
                LogLevel::Info | LogLevel::Debug => println!("{}", log_entry),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", source, context_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", source, context_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}{}: {}", source, context_part, message),
            }
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
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

fn emit(level: LogLevel, source: DataSource, context: Option<&str>, message: &str) {
    // Logging before `init_logger` is a no-op.
    if let Some(logger) = LOGGER.lock().unwrap_or_else(|e| e.into_inner()).as_ref() {
        logger.log(level, source, context, message);
    }
}

pub fn info(source: DataSource, context: Option<&str>, message: &str) {
    emit(LogLevel::Info, source, context, message);
}

pub fn warn(source: DataSource, context: Option<&str>, message: &str) {
    emit(LogLevel::Warning, source, context, message);
}

pub fn error(source: DataSource, context: Option<&str>, message: &str) {
    emit(LogLevel::Error, source, context, message);
}

pub fn debug(source: DataSource, context: Option<&str>, message: &str) {
    emit(LogLevel::Debug, source, context, message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify a fetch/read failure from its taxonomy kind.
///
/// An empty answer is normal for a quiet volcano or a short query window;
/// malformed payloads mean the upstream format changed.
pub fn classify_failure(err: &SourceError) -> FailureType {
    match err.kind() {
        FailureKind::EmptyDataset => FailureType::Expected,
        FailureKind::MalformedInput => FailureType::Unexpected,
        FailureKind::NetworkFailure => match err {
            SourceError::Http(code) if *code >= 500 => FailureType::Unexpected,
            SourceError::Http(_) => FailureType::Unknown,
            _ => FailureType::Unknown,
        },
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Log a data source failure with automatic classification
pub fn log_fetch_failure(source: DataSource, operation: &str, err: &SourceError) {
    let failure_type = classify_failure(err);
    let message = format!("{} failed [{}]: {}", operation, failure_type, err);

    match failure_type {
        FailureType::Expected => debug(source, None, &message),
        FailureType::Unexpected => error(source, None, &message),
        FailureType::Unknown => warn(source, None, &message),
    }
}

// ---------------------------------------------------------------------------
// Cycle Summary Logging
// ---------------------------------------------------------------------------

/// Log a one-line summary of a refresh cycle
pub fn log_cycle_summary(events: usize, samples: usize, live_sources: usize, total_sources: usize) {
    let message = format!(
        "Refresh complete: {} events, {} solar samples, {}/{} live sources",
        events, samples, live_sources, total_sources
    );

    if live_sources == total_sources {
        info(DataSource::System, None, &message);
    } else {
        warn(DataSource::System, None, &message);
    }
}

// ---------------------------------------------------------------------------
// Engine Logging
// ---------------------------------------------------------------------------

fn snapshot_message(snapshot: &MetricSnapshot) -> String {
    format!(
        "EII {:.3} | RPAM {} | CCI {:.3} | {} forecast points",
        snapshot.eii,
        snapshot.rpam,
        snapshot.cci,
        snapshot.forecast.len()
    )
}

/// Log the metrics computed for a region in this cycle
pub fn log_snapshot(region: &str, snapshot: &MetricSnapshot) {
    info(DataSource::Engine, Some(region), &snapshot_message(snapshot));
}
