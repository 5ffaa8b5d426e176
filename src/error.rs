//! Error types for the gridnav crate
//!
//! Expected simulation conditions (stuck agent, rejected goal, busy session)
//! are reported as outcome values, not as errors. This enum covers genuine
//! failures: bad configuration, file I/O, encoding problems and broken
//! internal invariants.

use thiserror::Error;

use crate::grid::Cell;

/// Main error type for the gridnav crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("cell {cell} is out of bounds for a {size}x{size} grid")]
    OutOfBounds { cell: Cell, size: usize },

    #[error(
        "table shape mismatch: expected {expected_states}x{expected_actions}, got {got_states} rows ({detail})"
    )]
    TableShape {
        expected_states: usize,
        expected_actions: usize,
        got_states: usize,
        detail: String,
    },

    #[error("illegal move selected from {from} to {to}")]
    IllegalMove { from: Cell, to: Cell },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },

    #[error("shared observer lock was poisoned")]
    ObserverPoisoned,
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }
}
