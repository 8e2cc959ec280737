//! Error types for loading and processing dialer data.
//!
//! Only structural problems surface as errors: a table without a required
//! column, a file that cannot be read, an unsupported format or an invalid
//! configuration. Per-record problems (bad timestamps, unknown agents) are
//! recovered inside the pipeline and reported through diagnostics instead.

use polars::prelude::PolarsError;

/// Result type for dialer operations
pub type DialerResult<T> = Result<T, DialerError>;

/// Error type for dialer operations
#[derive(Debug, thiserror::Error)]
pub enum DialerError {
    #[error("Missing required column(s) in {input}: {columns}")]
    MissingRequiredColumn { input: String, columns: String },

    #[error("Unreadable input {input}: {reason}")]
    UnreadableInput { input: String, reason: String },

    #[error("Unsupported file format for {input}: {extension}")]
    UnsupportedFormat { input: String, extension: String },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Table error: {0}")]
    Table(#[from] PolarsError),
}

impl DialerError {
    pub(crate) fn unreadable(input: &str, reason: impl ToString) -> Self {
        DialerError::UnreadableInput {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }
}
