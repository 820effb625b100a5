//! Conversation message types.
//!
//! A conversation is an ordered sequence of [`ModelRequest`] values, each a
//! bundle of role-tagged parts. Model replies are [`ModelResponse`] values;
//! when a reply triggers tool execution it is folded back into the request
//! stream as a [`ModelRequestPart::ModelResponse`] so providers see proper
//! user/assistant alternation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A system instruction for the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemPromptPart {
    /// Instruction text.
    pub content: String,
}

/// A user message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPromptPart {
    /// Message text.
    pub content: String,
}

/// The result of a tool call, fed back to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolReturnPart {
    /// Name of the tool that produced this result.
    pub tool_name: String,
    /// Tool return value as JSON.
    pub content: JsonValue,
    /// Provider-assigned call id, echoed back when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ToolReturnPart {
    /// Create a new tool return part.
    pub fn new(tool_name: impl Into<String>, content: JsonValue) -> Self {
        Self {
            tool_name: tool_name.into(),
            content,
            tool_call_id: None,
        }
    }

    /// Attach the provider's tool call id.
    #[must_use]
    pub fn with_tool_call_id(mut self, id: impl Into<String>) -> Self {
        self.tool_call_id = Some(id.into());
        self
    }
}

/// A prompt asking the model to retry after a recoverable tool failure.
///
/// This is the wire form of the retryable condition: the tool could not
/// produce a result from the arguments it was given (e.g. an unresolvable
/// location), and the model is invited to reformulate and call again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPromptPart {
    /// Explanation shown to the model.
    pub content: String,
    /// Tool whose call should be retried, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    /// Provider-assigned call id, echoed back when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl RetryPromptPart {
    /// Create a new retry prompt.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_name: None,
            tool_call_id: None,
        }
    }

    /// Attach the failing tool's name.
    #[must_use]
    pub fn with_tool_name(mut self, name: impl Into<String>) -> Self {
        self.tool_name = Some(name.into());
        self
    }

    /// Attach the provider's tool call id.
    #[must_use]
    pub fn with_tool_call_id(mut self, id: impl Into<String>) -> Self {
        self.tool_call_id = Some(id.into());
        self
    }
}

/// One part of a model request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "part_kind", rename_all = "kebab-case")]
pub enum ModelRequestPart {
    /// System instruction.
    SystemPrompt(SystemPromptPart),
    /// User message.
    UserPrompt(UserPromptPart),
    /// Tool execution result.
    ToolReturn(ToolReturnPart),
    /// Retry request after a recoverable failure.
    RetryPrompt(RetryPromptPart),
    /// A prior model response, replayed for role alternation.
    ModelResponse(Box<ModelResponse>),
}

/// A request to the model: an ordered bundle of parts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelRequest {
    /// Ordered request parts.
    pub parts: Vec<ModelRequestPart>,
}

impl ModelRequest {
    /// Create an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a request holding a single system prompt.
    pub fn system(content: impl Into<String>) -> Self {
        let mut req = Self::new();
        req.add_system_prompt(content);
        req
    }

    /// Create a request holding a single user prompt.
    pub fn user(content: impl Into<String>) -> Self {
        let mut req = Self::new();
        req.add_user_prompt(content);
        req
    }

    /// Append a system prompt part.
    pub fn add_system_prompt(&mut self, content: impl Into<String>) {
        self.parts.push(ModelRequestPart::SystemPrompt(SystemPromptPart {
            content: content.into(),
        }));
    }

    /// Append a user prompt part.
    pub fn add_user_prompt(&mut self, content: impl Into<String>) {
        self.parts.push(ModelRequestPart::UserPrompt(UserPromptPart {
            content: content.into(),
        }));
    }

    /// Check whether the request has no parts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Plain text produced by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPart {
    /// Text content.
    pub content: String,
}

impl TextPart {
    /// Create a new text part.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallPart {
    /// Name of the tool to invoke.
    pub tool_name: String,
    /// Arguments as JSON.
    pub args: JsonValue,
    /// Provider-assigned call id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ToolCallPart {
    /// Create a new tool call part.
    pub fn new(tool_name: impl Into<String>, args: JsonValue) -> Self {
        Self {
            tool_name: tool_name.into(),
            args,
            tool_call_id: None,
        }
    }

    /// Attach the provider's tool call id.
    #[must_use]
    pub fn with_tool_call_id(mut self, id: impl Into<String>) -> Self {
        self.tool_call_id = Some(id.into());
        self
    }
}

/// One part of a model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "part_kind", rename_all = "kebab-case")]
pub enum ModelResponsePart {
    /// Text content.
    Text(TextPart),
    /// Tool invocation request.
    ToolCall(ToolCallPart),
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural end of turn.
    Stop,
    /// Token limit reached.
    Length,
    /// Stopped to request tool execution.
    ToolCall,
}

/// A complete model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    /// Ordered response parts.
    pub parts: Vec<ModelResponsePart>,
    /// Why generation stopped, when reported.
    pub finish_reason: Option<FinishReason>,
    /// Token usage for this request, when reported.
    pub usage: Option<crate::usage::RequestUsage>,
    /// Model that produced the response.
    pub model_name: Option<String>,
    /// When the response was received.
    pub timestamp: DateTime<Utc>,
}

impl ModelResponse {
    /// Create a response from parts, timestamped now.
    pub fn new(parts: Vec<ModelResponsePart>) -> Self {
        Self {
            parts,
            finish_reason: None,
            usage: None,
            model_name: None,
            timestamp: Utc::now(),
        }
    }

    /// Set the finish reason.
    #[must_use]
    pub fn with_finish_reason(mut self, reason: FinishReason) -> Self {
        self.finish_reason = Some(reason);
        self
    }

    /// Concatenated text of all text parts.
    #[must_use]
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                ModelResponsePart::Text(t) => Some(t.content.as_str()),
                ModelResponsePart::ToolCall(_) => None,
            })
            .collect()
    }

    /// All tool call parts, in order.
    #[must_use]
    pub fn tool_calls(&self) -> Vec<&ToolCallPart> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                ModelResponsePart::ToolCall(tc) => Some(tc),
                ModelResponsePart::Text(_) => None,
            })
            .collect()
    }

    /// Check whether the response requests any tool calls.
    #[must_use]
    pub fn has_tool_calls(&self) -> bool {
        self.parts
            .iter()
            .any(|p| matches!(p, ModelResponsePart::ToolCall(_)))
    }
}
