//! Core tool trait.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::{context::RunContext, definition::ToolDefinition, errors::ToolError};

/// Value returned by a successful tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolReturn {
    /// Return value as JSON, fed back to the model verbatim.
    pub content: JsonValue,
}

impl ToolReturn {
    /// Wrap a JSON value.
    #[must_use]
    pub fn json(content: JsonValue) -> Self {
        Self { content }
    }

    /// Wrap plain text.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: JsonValue::String(content.into()),
        }
    }
}

/// Result of a tool execution.
pub type ToolResult = Result<ToolReturn, ToolError>;

/// Core trait for all tools.
///
/// Implementations receive the run context (with the shared dependency
/// bundle) and the model-provided arguments as JSON.
#[async_trait]
pub trait Tool<Deps = ()>: Send + Sync {
    /// The tool's definition: name, description and parameter schema.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with the given arguments.
    async fn call(&self, ctx: &RunContext<Deps>, args: JsonValue) -> ToolResult;

    /// The tool name, from the definition.
    fn name(&self) -> String {
        self.definition().name
    }
}

/// Type-erased shared tool.
pub type BoxedTool<Deps> = Arc<dyn Tool<Deps>>;
