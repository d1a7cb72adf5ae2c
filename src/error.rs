use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Coarse failure category handed to whatever front end drives the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    LoadError,
    MissingColumnError,
    InvalidCutoffFormatError,
    NoOperationSelectedError,
    AmbiguousTimeParseError,
    WriteError,
    LoggingError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::LoadError => "LoadError",
            ErrorKind::MissingColumnError => "MissingColumnError",
            ErrorKind::InvalidCutoffFormatError => "InvalidCutoffFormatError",
            ErrorKind::NoOperationSelectedError => "NoOperationSelectedError",
            ErrorKind::AmbiguousTimeParseError => "AmbiguousTimeParseError",
            ErrorKind::WriteError => "WriteError",
            ErrorKind::LoggingError => "LoggingError",
        };
        f.write_str(name)
    }
}

/// Error type covering the different failure cases that can occur while a
/// workbook is loaded, filtered, merged or written.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures while staging or committing output files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when serialising the run summary fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the plain table writer.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Raised when an input file is missing, unreadable or not a spreadsheet.
    #[error("failed to read Excel file {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    /// Raised when a required header (time column or `id`) cannot be located.
    #[error("{} must have an '{column}' column", path.display())]
    MissingColumn { path: PathBuf, column: String },

    /// Raised when the cutoff text does not follow `YYYY-MM-DD HH:MM`.
    #[error("invalid date-time format '{input}'. Use YYYY-MM-DD HH:MM")]
    InvalidCutoff { input: String },

    /// Raised in merge mode when neither operation switch is enabled.
    #[error("select at least one operation: remove-before-cutoff or append-replace")]
    NoOperationSelected,

    /// Raised when not a single row of a time column can be read as a date-time.
    #[error("no value in column '{column}' of {} could be read as a date-time", path.display())]
    AmbiguousTime { path: PathBuf, column: String },

    /// Raised when the output workbook cannot be saved to its target.
    #[error("failed to save file {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl ToolError {
    /// Category of the failure, stable across message wording changes.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ToolError::Load { .. } => ErrorKind::LoadError,
            ToolError::MissingColumn { .. } => ErrorKind::MissingColumnError,
            ToolError::InvalidCutoff { .. } => ErrorKind::InvalidCutoffFormatError,
            ToolError::NoOperationSelected => ErrorKind::NoOperationSelectedError,
            ToolError::AmbiguousTime { .. } => ErrorKind::AmbiguousTimeParseError,
            ToolError::Io(_)
            | ToolError::Json(_)
            | ToolError::ExcelWrite(_)
            | ToolError::Write { .. } => ErrorKind::WriteError,
            ToolError::Logging(_) => ErrorKind::LoggingError,
        }
    }

    pub(crate) fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ToolError::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ToolError::Write {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
