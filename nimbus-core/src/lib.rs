//! Core types shared across the nimbus workspace.
//!
//! This crate holds the role-tagged conversation message types exchanged
//! between the agent loop and model providers, together with model settings
//! and per-run usage counters. It deliberately knows nothing about HTTP,
//! tools or any concrete provider.

pub mod messages;
pub mod settings;
pub mod usage;

pub use messages::{
    FinishReason, ModelRequest, ModelRequestPart, ModelResponse, ModelResponsePart,
    RetryPromptPart, SystemPromptPart, TextPart, ToolCallPart, ToolReturnPart, UserPromptPart,
};
pub use settings::ModelSettings;
pub use usage::{RequestUsage, RunUsage};
