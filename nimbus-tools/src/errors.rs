//! Tool execution errors.
//!
//! The error taxonomy distinguishes hard failures (propagated up and
//! surfaced to the user) from the retryable condition the orchestration
//! layer converts into a retry prompt for the model.

use thiserror::Error;

/// Errors that can occur during tool execution.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool execution failed.
    #[error("Tool execution failed: {message}")]
    ExecutionFailed {
        /// Error message.
        message: String,
        /// Whether this error is retryable.
        retryable: bool,
    },

    /// Upstream service returned a non-success HTTP status.
    #[error("HTTP error: {status} - {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Invalid arguments provided by the model.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Tool not found in the capability table.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// The model should retry with different arguments.
    ///
    /// This is not a failure of the tool itself: the arguments were valid
    /// but did not resolve to a result (e.g. an unresolvable location).
    #[error("Model retry requested: {0}")]
    ModelRetry(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ToolError {
    /// Check if this error is retryable by re-prompting the model.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ModelRetry(_) => true,
            Self::ExecutionFailed { retryable, .. } => *retryable,
            Self::Http { .. }
            | Self::InvalidArguments(_)
            | Self::NotFound(_)
            | Self::Json(_)
            | Self::Other(_) => false,
        }
    }

    /// Create a non-retryable execution failure.
    #[must_use]
    pub fn execution_failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            message: msg.into(),
            retryable: false,
        }
    }

    /// Create an HTTP error.
    #[must_use]
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Create an invalid arguments error.
    #[must_use]
    pub fn invalid_args(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a model retry error.
    #[must_use]
    pub fn model_retry(msg: impl Into<String>) -> Self {
        Self::ModelRetry(msg.into())
    }

    /// Check if this is a model retry error.
    #[must_use]
    pub fn is_model_retry(&self) -> bool {
        matches!(self, Self::ModelRetry(_))
    }
}
