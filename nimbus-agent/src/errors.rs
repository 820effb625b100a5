//! Agent-specific error types.

use nimbus_models::ModelError;
use nimbus_tools::ToolError;
use thiserror::Error;

/// Errors that can occur during an agent run.
#[derive(Debug, Error)]
pub enum AgentRunError {
    /// Model returned an error.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// A tool failed in a way the model cannot fix by retrying.
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// The retry budget for recoverable tool failures was spent.
    #[error("Max retries exceeded: {message}")]
    MaxRetriesExceeded {
        /// Description of what was being retried.
        message: String,
    },

    /// Model stopped without producing output.
    #[error("Model stopped unexpectedly without output")]
    UnexpectedStop,

    /// The run finished without a final answer.
    #[error("No output produced")]
    NoOutput,

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AgentRunError {
    /// Create a max retries error.
    pub fn max_retries(message: impl Into<String>) -> Self {
        Self::MaxRetriesExceeded {
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}
