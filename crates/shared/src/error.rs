//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// These cover the edges around the engine (configuration, snapshot files);
/// ledger rule violations live in the core crate's `LedgerError`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A snapshot file could not be read.
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot file could not be parsed.
    #[error("Snapshot parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Validation error on user-supplied arguments.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl AppError {
    /// Returns the process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Config(_) => 3,
            Self::Io(_) | Self::Parse(_) | Self::NotFound(_) => 4,
        }
    }

    /// Returns the error code for machine-readable output.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Io(_) => "SNAPSHOT_IO_ERROR",
            Self::Parse(_) => "SNAPSHOT_PARSE_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
