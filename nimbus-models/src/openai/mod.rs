//! OpenAI-compatible chat-completions model.
//!
//! Talks to any endpoint implementing the OpenAI chat-completions API with
//! function calling. The base URL is configurable so tests can point the
//! client at a local mock server and self-hosted gateways work unchanged.

pub mod types;

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::error::ModelError;
use crate::model::{Model, ModelRequestParameters};
use nimbus_core::{
    FinishReason, ModelRequest, ModelRequestPart, ModelResponse, ModelResponsePart, ModelSettings,
    RequestUsage, TextPart, ToolCallPart,
};

/// OpenAI chat-completions client.
#[derive(Debug, Clone)]
pub struct OpenAiModel {
    /// Model name.
    model_name: String,
    /// HTTP client.
    client: Client,
    /// Base URL.
    base_url: String,
    /// API key.
    api_key: String,
    /// Default request timeout.
    default_timeout: Duration,
}

impl OpenAiModel {
    /// Default OpenAI base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com";

    /// Create a new client.
    pub fn new(model_name: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            client: Client::new(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            default_timeout: Duration::from_secs(120),
        }
    }

    /// Create from `OPENAI_API_KEY`, `OPENAI_MODEL` and `OPENAI_BASE_URL`.
    ///
    /// The key is required; model defaults to `gpt-4o`.
    pub fn from_env() -> Result<Self, ModelError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ModelError::configuration("OPENAI_API_KEY is not set"))?;
        let model_name =
            std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());
        let mut model = Self::new(model_name, api_key);
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            model = model.with_base_url(base_url);
        }
        Ok(model)
    }

    /// Set a custom base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the default timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Set a shared HTTP client.
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Build the chat request body.
    fn build_request(
        &self,
        messages: &[ModelRequest],
        settings: &ModelSettings,
        params: &ModelRequestParameters,
    ) -> types::ChatRequest {
        let api_messages = self.convert_messages(messages);
        let tools = self.convert_tools(params);

        types::ChatRequest {
            model: self.model_name.clone(),
            messages: api_messages,
            tools: if tools.is_empty() { None } else { Some(tools) },
            temperature: settings.temperature,
            top_p: settings.top_p,
            max_tokens: settings.max_tokens,
            stop: settings.stop.clone(),
            seed: settings.seed,
            stream: Some(false),
        }
    }

    /// Flatten request parts into OpenAI messages.
    fn convert_messages(&self, messages: &[ModelRequest]) -> Vec<types::Message> {
        let mut result = Vec::new();

        for request in messages {
            for part in &request.parts {
                match part {
                    ModelRequestPart::SystemPrompt(sp) => {
                        result.push(types::Message::plain("system", &sp.content));
                    }
                    ModelRequestPart::UserPrompt(up) => {
                        result.push(types::Message::plain("user", &up.content));
                    }
                    ModelRequestPart::ToolReturn(tr) => {
                        result.push(types::Message {
                            role: "tool".to_string(),
                            content: Some(tr.content.to_string()),
                            tool_calls: None,
                            tool_call_id: tr.tool_call_id.clone(),
                        });
                    }
                    ModelRequestPart::RetryPrompt(rp) => {
                        // A retry tied to a tool call must answer that call;
                        // otherwise it reads as a fresh user instruction.
                        if let Some(id) = &rp.tool_call_id {
                            result.push(types::Message {
                                role: "tool".to_string(),
                                content: Some(rp.content.clone()),
                                tool_calls: None,
                                tool_call_id: Some(id.clone()),
                            });
                        } else {
                            result.push(types::Message::plain("user", &rp.content));
                        }
                    }
                    ModelRequestPart::ModelResponse(response) => {
                        result.push(self.convert_response_message(response));
                    }
                }
            }
        }

        result
    }

    /// Replay a prior model response as an assistant message.
    fn convert_response_message(&self, response: &ModelResponse) -> types::Message {
        let mut content = String::new();
        let mut tool_calls = Vec::new();

        for part in &response.parts {
            match part {
                ModelResponsePart::Text(t) => content.push_str(&t.content),
                ModelResponsePart::ToolCall(tc) => {
                    tool_calls.push(types::ToolCall {
                        id: tc
                            .tool_call_id
                            .clone()
                            .unwrap_or_else(|| format!("call_{}", tool_calls.len())),
                        r#type: "function".to_string(),
                        function: types::FunctionCall {
                            name: tc.tool_name.clone(),
                            arguments: tc.args.to_string(),
                        },
                    });
                }
            }
        }

        types::Message {
            role: "assistant".to_string(),
            content: if content.is_empty() {
                None
            } else {
                Some(content)
            },
            tool_calls: if tool_calls.is_empty() {
                None
            } else {
                Some(tool_calls)
            },
            tool_call_id: None,
        }
    }

    /// Convert tool definitions to the OpenAI function format.
    fn convert_tools(&self, params: &ModelRequestParameters) -> Vec<types::Tool> {
        params
            .tools
            .iter()
            .map(|t| types::Tool {
                r#type: "function".to_string(),
                function: types::FunctionDef {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.parameters_json_schema.clone(),
                },
            })
            .collect()
    }

    /// Parse an API response into a [`ModelResponse`].
    fn parse_response(&self, response: types::ChatResponse) -> Result<ModelResponse, ModelError> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::invalid_response("response contained no choices"))?;

        let mut parts = Vec::new();

        if let Some(content) = choice.message.content {
            if !content.is_empty() {
                parts.push(ModelResponsePart::Text(TextPart::new(content)));
            }
        }

        if let Some(tool_calls) = choice.message.tool_calls {
            for tc in tool_calls {
                // Arguments arrive as a JSON-encoded string; a malformed
                // payload is surfaced to the tool as-is rather than dropped.
                let args = serde_json::from_str(&tc.function.arguments)
                    .unwrap_or(serde_json::Value::String(tc.function.arguments));
                parts.push(ModelResponsePart::ToolCall(
                    ToolCallPart::new(tc.function.name, args).with_tool_call_id(tc.id),
                ));
            }
        }

        let finish_reason = match choice.finish_reason.as_deref() {
            Some("stop") => Some(FinishReason::Stop),
            Some("length") => Some(FinishReason::Length),
            Some("tool_calls") => Some(FinishReason::ToolCall),
            _ => None,
        };

        let usage = response.usage.map(|u| RequestUsage {
            request_tokens: u.prompt_tokens,
            response_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        let mut parsed = ModelResponse::new(parts);
        parsed.finish_reason = finish_reason;
        parsed.usage = usage;
        parsed.model_name = Some(response.model);
        Ok(parsed)
    }
}

#[async_trait]
impl Model for OpenAiModel {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn system(&self) -> &str {
        "openai"
    }

    async fn request(
        &self,
        messages: &[ModelRequest],
        settings: &ModelSettings,
        params: &ModelRequestParameters,
    ) -> Result<ModelResponse, ModelError> {
        let body = self.build_request(messages, settings, params);
        let timeout = settings.timeout.unwrap_or(self.default_timeout);

        tracing::debug!(model = %self.model_name, messages = body.messages.len(), "chat completion request");

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            let text = response.text().await.unwrap_or_default();
            return Err(ModelError::auth(text));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ModelError::http(status.as_u16(), text));
        }

        let chat_response: types::ChatResponse = response
            .json()
            .await
            .map_err(|e| ModelError::invalid_response(e.to_string()))?;

        self.parse_response(chat_response)
    }
}
