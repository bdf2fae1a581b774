//! Error types for scrape configuration compilation

use thiserror::Error;

/// Errors that can occur while compiling scrape configuration
#[derive(Error, Debug)]
pub enum OperatorError {
    /// A duration literal on the resource or in the operator defaults could not be parsed
    #[error("invalid duration for {field}: {value:?} ({reason})")]
    InvalidDuration {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Two resources compiled into the same job name
    #[error("duplicate job name: {0}")]
    DuplicateJob(String),

    /// YAML serialization error
    #[error("YAML serialization error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The enclosing reconciliation abandoned the pass
    #[error("compilation cancelled after {compiled} resources")]
    Cancelled { compiled: usize },
}

/// Result type for operator operations
pub type Result<T> = std::result::Result<T, OperatorError>;

impl OperatorError {
    /// Check if this error is retryable
    ///
    /// Malformed input only goes away when the resource changes, so only a
    /// cancelled pass is worth re-queueing as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OperatorError::Cancelled { .. })
    }

    /// Get a suggested requeue delay for retryable errors
    pub fn requeue_delay(&self) -> Option<std::time::Duration> {
        if self.is_retryable() {
            Some(std::time::Duration::from_secs(30))
        } else {
            None
        }
    }
}
