//! Main Agent type.
//!
//! An agent wraps a model, a system prompt and a set of tools, and drives
//! the request/tool-execution loop until the model produces a final text
//! answer.

use crate::builder::AgentBuilder;
use crate::errors::AgentRunError;
use crate::run::{AgentRun, AgentRunResult, RunOptions};
use nimbus_core::ModelSettings;
use nimbus_models::Model;
use nimbus_tools::{BoxedTool, ToolDefinition};
use std::sync::Arc;

/// Default retry budget for recoverable tool failures, per run.
pub const DEFAULT_TOOL_RETRIES: u32 = 2;

/// The main agent type.
///
/// # Type Parameters
///
/// - `Deps`: Dependencies injected into tools via the run context.
pub struct Agent<Deps = ()> {
    /// Model to use.
    pub(crate) model: Arc<dyn Model>,
    /// Agent name for identification.
    pub(crate) name: Option<String>,
    /// Static system prompt, sent at the start of a new conversation.
    pub(crate) system_prompt: Arc<str>,
    /// Default model settings.
    pub(crate) model_settings: ModelSettings,
    /// Registered tools.
    pub(crate) tools: Vec<BoxedTool<Deps>>,
    /// Tool definitions, pre-computed at build time.
    pub(crate) cached_tool_defs: Arc<Vec<ToolDefinition>>,
    /// Retry budget for recoverable tool failures, per run.
    pub(crate) max_tool_retries: u32,
}

impl<Deps> Agent<Deps>
where
    Deps: Send + Sync + 'static,
{
    /// Start building an agent around a model.
    pub fn builder(model: Arc<dyn Model>) -> AgentBuilder<Deps> {
        AgentBuilder::new(model)
    }

    /// Get the model.
    pub fn model(&self) -> &dyn Model {
        self.model.as_ref()
    }

    /// Get the agent name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Get the system prompt.
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Get the default model settings.
    pub fn model_settings(&self) -> &ModelSettings {
        &self.model_settings
    }

    /// Get the pre-computed tool definitions.
    pub fn tool_definitions(&self) -> Arc<Vec<ToolDefinition>> {
        Arc::clone(&self.cached_tool_defs)
    }

    /// Check if the agent has tools.
    pub fn has_tools(&self) -> bool {
        !self.tools.is_empty()
    }

    /// Look up a registered tool by name.
    pub(crate) fn find_tool(&self, name: &str) -> Option<&BoxedTool<Deps>> {
        self.tools
            .iter()
            .zip(self.cached_tool_defs.iter())
            .find(|(_, def)| def.name == name)
            .map(|(tool, _)| tool)
    }

    /// Run the agent with a prompt and fresh dependencies.
    pub async fn run(
        &self,
        prompt: impl Into<String>,
        deps: Deps,
    ) -> Result<AgentRunResult, AgentRunError> {
        self.run_with_options(prompt, deps, RunOptions::default())
            .await
    }

    /// Run the agent with explicit options (e.g. prior message history).
    pub async fn run_with_options(
        &self,
        prompt: impl Into<String>,
        deps: Deps,
        options: RunOptions,
    ) -> Result<AgentRunResult, AgentRunError> {
        let run = AgentRun::new(self, prompt.into(), deps, options);
        run.run_to_completion().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimbus_models::MockModel;

    #[test]
    fn test_builder_defaults() {
        let agent: Agent = Agent::builder(Arc::new(MockModel::new())).build();
        assert!(agent.name().is_none());
        assert!(!agent.has_tools());
        assert_eq!(agent.max_tool_retries, DEFAULT_TOOL_RETRIES);
        assert_eq!(agent.system_prompt(), "");
    }
}
