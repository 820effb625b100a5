//! Agent run execution.
//!
//! A run sends the conversation to the model, executes any requested tool
//! calls, feeds the results back, and repeats until the model answers in
//! plain text. Recoverable tool failures become retry prompts and are
//! charged against the run's retry budget; anything else aborts the run.

use crate::agent::Agent;
use crate::errors::AgentRunError;
use nimbus_core::{
    FinishReason, ModelRequest, ModelRequestPart, ModelResponse, ModelSettings, RetryPromptPart,
    RunUsage, ToolCallPart, ToolReturnPart,
};
use nimbus_models::ModelRequestParameters;
use nimbus_tools::{RunContext, ToolError};
use std::sync::Arc;
use tracing::debug;

/// Options for a run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Override model settings.
    pub model_settings: Option<ModelSettings>,
    /// Message history to continue from.
    pub message_history: Option<Vec<ModelRequest>>,
}

impl RunOptions {
    /// Create new default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set model settings override.
    #[must_use]
    pub fn model_settings(mut self, settings: ModelSettings) -> Self {
        self.model_settings = Some(settings);
        self
    }

    /// Set message history.
    #[must_use]
    pub fn message_history(mut self, history: Vec<ModelRequest>) -> Self {
        self.message_history = Some(history);
        self
    }
}

/// Result of an agent run.
#[derive(Debug, Clone)]
pub struct AgentRunResult {
    /// The final text answer.
    pub output: String,
    /// Full message history, including the final model response.
    pub messages: Vec<ModelRequest>,
    /// Usage for this run.
    pub usage: RunUsage,
    /// Run id.
    pub run_id: String,
}

impl AgentRunResult {
    /// Get the output.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Consume and return the output.
    pub fn into_output(self) -> String {
        self.output
    }

    /// All messages, suitable as history for a follow-up run.
    pub fn all_messages(&self) -> &[ModelRequest] {
        &self.messages
    }
}

/// An in-flight agent run.
pub struct AgentRun<'a, Deps> {
    agent: &'a Agent<Deps>,
    ctx: RunContext<Deps>,
    messages: Vec<ModelRequest>,
    usage: RunUsage,
    settings: ModelSettings,
    retries: u32,
}

impl<'a, Deps> AgentRun<'a, Deps>
where
    Deps: Send + Sync + 'static,
{
    /// Create a new run.
    ///
    /// The system prompt is only injected when starting a fresh
    /// conversation; continued histories already contain it.
    pub fn new(agent: &'a Agent<Deps>, prompt: String, deps: Deps, options: RunOptions) -> Self {
        let ctx = RunContext::new(deps, agent.model().name());

        let settings = match options.model_settings {
            Some(overrides) => agent.model_settings.merge(&overrides),
            None => agent.model_settings.clone(),
        };

        let mut messages = options.message_history.unwrap_or_default();
        if messages.is_empty() && !agent.system_prompt.is_empty() {
            messages.push(ModelRequest::system(agent.system_prompt.as_ref()));
        }
        messages.push(ModelRequest::user(prompt));

        Self {
            agent,
            ctx,
            messages,
            usage: RunUsage::new(),
            settings,
            retries: 0,
        }
    }

    /// Drive the run until the model produces a final answer.
    pub async fn run_to_completion(mut self) -> Result<AgentRunResult, AgentRunError> {
        let params = ModelRequestParameters::new()
            .with_tools_arc(self.agent.tool_definitions())
            .with_allow_text(true);

        loop {
            let response = self
                .agent
                .model()
                .request(&self.messages, &self.settings, &params)
                .await?;

            match &response.usage {
                Some(usage) => self.usage.add_request(usage),
                None => self.usage.record_request(),
            }

            let calls: Vec<ToolCallPart> =
                response.tool_calls().into_iter().cloned().collect();

            if !calls.is_empty() {
                debug!(run_id = %self.ctx.run_id, count = calls.len(), "executing tool calls");
                self.record_response(&response);
                let returns = self.execute_tool_calls(calls).await?;
                self.messages.push(returns);
                continue;
            }

            let text = response.text();
            if !text.is_empty() {
                self.record_response(&response);
                return Ok(AgentRunResult {
                    output: text,
                    messages: self.messages,
                    usage: self.usage,
                    run_id: self.ctx.run_id,
                });
            }

            if response.finish_reason == Some(FinishReason::Stop) {
                return Err(AgentRunError::UnexpectedStop);
            }
            return Err(AgentRunError::NoOutput);
        }
    }

    /// Fold a model response back into the request stream so providers see
    /// proper user/assistant alternation.
    fn record_response(&mut self, response: &ModelResponse) {
        let mut req = ModelRequest::new();
        req.parts
            .push(ModelRequestPart::ModelResponse(Box::new(response.clone())));
        self.messages.push(req);
    }

    /// Execute tool calls sequentially, in the order the model issued them.
    async fn execute_tool_calls(
        &mut self,
        calls: Vec<ToolCallPart>,
    ) -> Result<ModelRequest, AgentRunError> {
        let mut req = ModelRequest::new();

        for tc in calls {
            self.usage.record_tool_call();

            let tool = Arc::clone(
                self.agent
                    .find_tool(&tc.tool_name)
                    .ok_or_else(|| AgentRunError::Tool(ToolError::NotFound(tc.tool_name.clone())))?,
            );

            let tool_ctx = self.ctx.for_tool(&tc.tool_name, tc.tool_call_id.clone());

            match tool.call(&tool_ctx, tc.args.clone()).await {
                Ok(ret) => {
                    let mut part = ToolReturnPart::new(&tc.tool_name, ret.content);
                    if let Some(id) = tc.tool_call_id {
                        part = part.with_tool_call_id(id);
                    }
                    req.parts.push(ModelRequestPart::ToolReturn(part));
                }
                Err(e) if e.is_retryable() => {
                    self.retries += 1;
                    self.usage.record_retry();
                    self.ctx.retry_count = self.retries;
                    if self.retries > self.agent.max_tool_retries {
                        return Err(AgentRunError::max_retries(format!(
                            "tool {}: {}",
                            tc.tool_name, e
                        )));
                    }
                    debug!(tool = %tc.tool_name, retries = self.retries, "retryable tool failure");
                    // The model sees the plain message, not the error wrapper.
                    let content = match &e {
                        ToolError::ModelRetry(msg) => msg.clone(),
                        other => other.to_string(),
                    };
                    let mut part = RetryPromptPart::new(content).with_tool_name(&tc.tool_name);
                    if let Some(id) = tc.tool_call_id {
                        part = part.with_tool_call_id(id);
                    }
                    req.parts.push(ModelRequestPart::RetryPrompt(part));
                }
                Err(e) => return Err(AgentRunError::Tool(e)),
            }
        }

        Ok(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nimbus_core::{ModelResponsePart, TextPart};
    use nimbus_models::MockModel;
    use nimbus_tools::{
        SchemaBuilder, Tool, ToolDefinition, ToolError, ToolResult, ToolReturn,
    };
    use serde_json::{json, Value as JsonValue};

    struct LookupTool;

    #[async_trait]
    impl Tool for LookupTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("lookup", "Look up a value.").with_parameters(
                SchemaBuilder::new().string("key", "Key to look up", true).build(),
            )
        }

        async fn call(&self, _ctx: &RunContext, args: JsonValue) -> ToolResult {
            match args["key"].as_str() {
                Some("answer") => Ok(ToolReturn::json(json!(42))),
                _ => Err(ToolError::model_retry("Unknown key, try 'answer'")),
            }
        }
    }

    struct BrokenTool;

    #[async_trait]
    impl Tool for BrokenTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("broken", "Always fails hard.")
                .with_parameters(SchemaBuilder::new().build())
        }

        async fn call(&self, _ctx: &RunContext, _args: JsonValue) -> ToolResult {
            Err(ToolError::invalid_args("nope"))
        }
    }

    fn text_response(text: &str) -> ModelResponse {
        ModelResponse::new(vec![ModelResponsePart::Text(TextPart::new(text))])
            .with_finish_reason(FinishReason::Stop)
    }

    fn tool_call_response(name: &str, args: JsonValue, id: &str) -> ModelResponse {
        ModelResponse::new(vec![ModelResponsePart::ToolCall(
            ToolCallPart::new(name, args).with_tool_call_id(id),
        )])
        .with_finish_reason(FinishReason::ToolCall)
    }

    #[tokio::test]
    async fn test_run_with_tool_call_then_answer() {
        let mock = MockModel::new()
            .with_response(tool_call_response("lookup", json!({"key": "answer"}), "call_0"))
            .with_response(text_response("The answer is 42."));

        let agent: Agent = Agent::builder(Arc::new(mock)).tool(LookupTool).build();
        let result = agent.run("what is the answer?", ()).await.unwrap();

        assert_eq!(result.output(), "The answer is 42.");
        assert_eq!(result.usage.requests, 2);
        assert_eq!(result.usage.tool_calls, 1);
        assert_eq!(result.usage.retries, 0);

        // user, replayed response, tool return, final response
        assert_eq!(result.messages.len(), 4);
        assert!(matches!(
            result.messages[2].parts[0],
            ModelRequestPart::ToolReturn(_)
        ));
    }

    #[tokio::test]
    async fn test_recoverable_failure_becomes_retry_prompt() {
        let mock = MockModel::new()
            .with_response(tool_call_response("lookup", json!({"key": "wrong"}), "call_0"))
            .with_response(tool_call_response("lookup", json!({"key": "answer"}), "call_1"))
            .with_response(text_response("Got it: 42."));

        let agent: Agent = Agent::builder(Arc::new(mock)).tool(LookupTool).build();
        let result = agent.run("look it up", ()).await.unwrap();

        assert_eq!(result.output(), "Got it: 42.");
        assert_eq!(result.usage.retries, 1);
        assert!(matches!(
            result.messages[2].parts[0],
            ModelRequestPart::RetryPrompt(_)
        ));
    }

    #[tokio::test]
    async fn test_retry_budget_exhaustion() {
        let mock = MockModel::new()
            .with_response(tool_call_response("lookup", json!({"key": "a"}), "call_0"))
            .with_response(tool_call_response("lookup", json!({"key": "b"}), "call_1"))
            .with_response(tool_call_response("lookup", json!({"key": "c"}), "call_2"));

        let agent: Agent = Agent::builder(Arc::new(mock)).tool(LookupTool).retries(2).build();
        let err = agent.run("look it up", ()).await.unwrap_err();

        assert!(matches!(err, AgentRunError::MaxRetriesExceeded { .. }));
    }

    #[tokio::test]
    async fn test_hard_tool_failure_aborts() {
        let mock = MockModel::new()
            .with_response(tool_call_response("broken", json!({}), "call_0"));

        let agent: Agent = Agent::builder(Arc::new(mock)).tool(BrokenTool).build();
        let err = agent.run("break", ()).await.unwrap_err();

        assert!(matches!(err, AgentRunError::Tool(_)));
    }

    #[tokio::test]
    async fn test_unknown_tool_aborts() {
        let mock = MockModel::new()
            .with_response(tool_call_response("missing", json!({}), "call_0"));

        let agent: Agent = Agent::builder(Arc::new(mock)).build();
        let err = agent.run("call something", ()).await.unwrap_err();

        assert!(matches!(err, AgentRunError::Tool(ToolError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_system_prompt_only_on_fresh_conversation() {
        let mock = MockModel::new()
            .with_response(text_response("hello"))
            .with_response(text_response("again"));

        let agent: Agent = Agent::builder(Arc::new(mock))
            .system_prompt("Be concise.")
            .build();

        let first = agent.run("hi", ()).await.unwrap();
        assert!(matches!(
            first.messages[0].parts[0],
            ModelRequestPart::SystemPrompt(_)
        ));

        let options = RunOptions::new().message_history(first.messages.clone());
        let second = agent.run_with_options("more", (), options).await.unwrap();

        let system_parts = second
            .messages
            .iter()
            .flat_map(|m| &m.parts)
            .filter(|p| matches!(p, ModelRequestPart::SystemPrompt(_)))
            .count();
        assert_eq!(system_parts, 1);
    }

    #[tokio::test]
    async fn test_stop_without_text_is_unexpected() {
        let mock = MockModel::new().with_response(
            ModelResponse::new(vec![]).with_finish_reason(FinishReason::Stop),
        );

        let agent: Agent = Agent::builder(Arc::new(mock)).build();
        let err = agent.run("hi", ()).await.unwrap_err();
        assert!(matches!(err, AgentRunError::UnexpectedStop));
    }
}
