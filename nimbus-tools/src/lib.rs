//! Tool contract between the agent loop and its external data tools.
//!
//! A tool is a typed function exposed to the language model: a
//! [`ToolDefinition`] (name, description, JSON-schema parameters) describes
//! it to the model, and the [`Tool`] trait executes it against a
//! [`RunContext`] carrying the shared dependency bundle.
//!
//! The one piece of deliberate design here is [`ToolError::ModelRetry`]: a
//! retryable condition distinct from hard failure, inviting the orchestrating
//! model to retry with different arguments.

pub mod context;
pub mod definition;
pub mod errors;
pub mod schema;
pub mod tool;

pub use context::RunContext;
pub use definition::{ObjectJsonSchema, ToolDefinition};
pub use errors::ToolError;
pub use schema::SchemaBuilder;
pub use tool::{BoxedTool, Tool, ToolResult, ToolReturn};
