//! Core model trait and request parameters.

use async_trait::async_trait;
use nimbus_core::{ModelRequest, ModelResponse, ModelSettings};
use nimbus_tools::ToolDefinition;
use std::sync::Arc;

use crate::error::ModelError;

/// Parameters for a model request beyond the message history.
#[derive(Debug, Clone, Default)]
pub struct ModelRequestParameters {
    /// Tool definitions to expose (shared, pre-computed by the agent).
    pub tools: Arc<Vec<ToolDefinition>>,
    /// Whether a plain text response is acceptable.
    pub allow_text_output: bool,
}

impl ModelRequestParameters {
    /// Create new empty parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set tool definitions.
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = Arc::new(tools);
        self
    }

    /// Set tool definitions from a shared list.
    #[must_use]
    pub fn with_tools_arc(mut self, tools: Arc<Vec<ToolDefinition>>) -> Self {
        self.tools = tools;
        self
    }

    /// Set whether text output is allowed.
    #[must_use]
    pub fn with_allow_text(mut self, allow: bool) -> Self {
        self.allow_text_output = allow;
        self
    }
}

/// Core model trait.
///
/// A model receives the conversation so far plus generation settings and
/// tool definitions, and produces one response which may contain text,
/// tool calls, or both.
#[async_trait]
pub trait Model: Send + Sync {
    /// The model name (e.g. "gpt-4o").
    fn name(&self) -> &str;

    /// The provider system (e.g. "openai", "mock").
    fn system(&self) -> &str;

    /// The full model identifier.
    fn identifier(&self) -> String {
        format!("{}:{}", self.system(), self.name())
    }

    /// Make a request to the model.
    async fn request(
        &self,
        messages: &[ModelRequest],
        settings: &ModelSettings,
        params: &ModelRequestParameters,
    ) -> Result<ModelResponse, ModelError>;
}

/// Boxed model for dynamic dispatch.
pub type BoxedModel = Arc<dyn Model>;
