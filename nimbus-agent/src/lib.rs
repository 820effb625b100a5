//! Agent orchestration.
//!
//! Wires a [`nimbus_models::Model`] to a set of [`nimbus_tools::Tool`]s
//! and runs the conversation loop: the model requests tool calls, the
//! agent executes them and feeds results back, and the loop ends when the
//! model replies in plain text.
//!
//! # Example
//!
//! ```no_run
//! use nimbus_agent::Agent;
//! use nimbus_models::OpenAiModel;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let model = Arc::new(OpenAiModel::from_env()?);
//! let agent: Agent = Agent::builder(model)
//!     .system_prompt("Be concise, reply with one sentence.")
//!     .build();
//!
//! let result = agent.run("Hello!", ()).await?;
//! println!("{}", result.output());
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod builder;
pub mod errors;
pub mod run;

pub use agent::{Agent, DEFAULT_TOOL_RETRIES};
pub use builder::AgentBuilder;
pub use errors::AgentRunError;
pub use run::{AgentRun, AgentRunResult, RunOptions};
