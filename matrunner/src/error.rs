// Error types for matrix expansion and dispatch

use thiserror::Error;

/// Errors raised while validating matrices or dispatching combinations
#[derive(Debug, Error)]
pub enum MatrixError {
    /// Matrix, include or exclude input is structurally invalid, or an
    /// unknown engine name was requested
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Positional and keyword argument lists handed to an engine differ in length
    #[error("args_list and kwargs_list must have the same length (got {args} and {kwargs})")]
    LengthMismatch { args: usize, kwargs: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MatrixError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        MatrixError::InvalidArgument(message.into())
    }
}

/// Result type for matrix operations
pub type MatrixResult<T> = Result<T, MatrixError>;
