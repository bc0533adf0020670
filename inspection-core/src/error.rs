//! Error types for inspection core.

use std::{error::Error, fmt, io};

/// Error type for inspection core operations.
///
/// Scoring itself never fails; these variants cover loading, saving and
/// drafting reports.
#[derive(Debug)]
pub enum InspectionError {
    /// An underlying I/O error.
    Io(io::Error),
    /// A report or template could not be parsed or serialized.
    Json(serde_json::Error),
    /// A checklist template failed validation.
    InvalidTemplate(String),
    /// The inspector session is not allowed to perform the operation.
    Unauthorized(String),
    /// A catch-all error with a message.
    Other(String),
}

impl fmt::Display for InspectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::InvalidTemplate(message) => write!(f, "invalid checklist template: {message}"),
            Self::Unauthorized(message) => write!(f, "unauthorized: {message}"),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

impl Error for InspectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::InvalidTemplate(_) | Self::Unauthorized(_) | Self::Other(_) => None,
        }
    }
}

impl From<io::Error> for InspectionError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for InspectionError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Convenience result type for inspection core.
pub type Result<T> = std::result::Result<T, InspectionError>;
