//! Error types for platdiff.
//!
//! Structural problems (unreadable input, a missing key column) abort the run
//! and carry enough context to name the offending file or column. Per-row and
//! per-column anomalies are absorbed by normalization or skip policy and never
//! surface here. Notification failures are produced by [`crate::notify`] but
//! callers are expected to log them rather than propagate them.

use std::fmt;
use std::path::PathBuf;

/// Main error type for platdiff operations.
#[derive(Debug)]
pub enum PlatdiffError {
    /// I/O errors (file operations).
    Io(std::io::Error),

    /// No supported encoding produced a parseable table for this file.
    InputUnreadable { path: PathBuf, detail: String },

    /// A designated key column is absent from one of the snapshots.
    MissingKeyColumn { source: String, column: String },

    /// CSV serialization errors while writing the report.
    Csv(String),

    /// Side-channel notification failed (non-2xx status or transport error).
    Notification(String),

    /// Generic error with context.
    Other(String),
}

impl fmt::Display for PlatdiffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InputUnreadable { path, detail } => {
                write!(f, "could not read {}: {detail}", path.display())
            }
            Self::MissingKeyColumn { source, column } => {
                write!(f, "key column '{column}' is missing from {source}")
            }
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
            Self::Notification(msg) => write!(f, "notification failed: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PlatdiffError {}

impl From<std::io::Error> for PlatdiffError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for PlatdiffError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

impl From<reqwest::Error> for PlatdiffError {
    fn from(err: reqwest::Error) -> Self {
        Self::Notification(err.to_string())
    }
}

impl From<serde_json::Error> for PlatdiffError {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(format!("JSON error: {err}"))
    }
}

/// Result type alias for platdiff operations.
pub type Result<T> = std::result::Result<T, PlatdiffError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<PlatdiffError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: PlatdiffError = e.into();
            PlatdiffError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: PlatdiffError = e.into();
            PlatdiffError::Other(format!("{}: {}", f(), err))
        })
    }
}
