//! Fluent agent builder.

use crate::agent::{Agent, DEFAULT_TOOL_RETRIES};
use nimbus_core::ModelSettings;
use nimbus_models::Model;
use nimbus_tools::{BoxedTool, Tool, ToolDefinition};
use std::sync::Arc;

/// Builder for [`Agent`].
pub struct AgentBuilder<Deps = ()> {
    model: Arc<dyn Model>,
    name: Option<String>,
    system_prompt: String,
    model_settings: ModelSettings,
    tools: Vec<BoxedTool<Deps>>,
    max_tool_retries: u32,
}

impl<Deps> AgentBuilder<Deps>
where
    Deps: Send + Sync + 'static,
{
    /// Create a builder around a model.
    pub fn new(model: Arc<dyn Model>) -> Self {
        Self {
            model,
            name: None,
            system_prompt: String::new(),
            model_settings: ModelSettings::new(),
            tools: Vec::new(),
            max_tool_retries: DEFAULT_TOOL_RETRIES,
        }
    }

    /// Set the agent name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the system prompt.
    #[must_use]
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Set the default model settings.
    #[must_use]
    pub fn model_settings(mut self, settings: ModelSettings) -> Self {
        self.model_settings = settings;
        self
    }

    /// Register a tool.
    #[must_use]
    pub fn tool(mut self, tool: impl Tool<Deps> + 'static) -> Self {
        self.tools.push(Arc::new(tool));
        self
    }

    /// Register an already shared tool.
    #[must_use]
    pub fn boxed_tool(mut self, tool: BoxedTool<Deps>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Set the per-run retry budget for recoverable tool failures.
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.max_tool_retries = retries;
        self
    }

    /// Build the agent, pre-computing tool definitions.
    #[must_use]
    pub fn build(self) -> Agent<Deps> {
        let defs: Vec<ToolDefinition> = self.tools.iter().map(|t| t.definition()).collect();

        Agent {
            model: self.model,
            name: self.name,
            system_prompt: Arc::from(self.system_prompt),
            model_settings: self.model_settings,
            tools: self.tools,
            cached_tool_defs: Arc::new(defs),
            max_tool_retries: self.max_tool_retries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nimbus_models::MockModel;
    use nimbus_tools::{RunContext, SchemaBuilder, ToolResult, ToolReturn};
    use serde_json::Value as JsonValue;

    struct PingTool;

    #[async_trait]
    impl Tool for PingTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("ping", "Reply with pong.")
                .with_parameters(SchemaBuilder::new().build())
        }

        async fn call(&self, _ctx: &RunContext, _args: JsonValue) -> ToolResult {
            Ok(ToolReturn::text("pong"))
        }
    }

    #[test]
    fn test_build_caches_tool_definitions() {
        let agent: Agent = Agent::builder(Arc::new(MockModel::new()))
            .name("test-agent")
            .system_prompt("Be concise.")
            .tool(PingTool)
            .retries(1)
            .build();

        assert_eq!(agent.name(), Some("test-agent"));
        assert_eq!(agent.tool_definitions().len(), 1);
        assert_eq!(agent.tool_definitions()[0].name, "ping");
        assert!(agent.find_tool("ping").is_some());
        assert!(agent.find_tool("missing").is_none());
    }
}
