//! Model trait and provider implementations.
//!
//! The [`Model`] trait is the seam between the agent loop and any hosted
//! chat-completion provider. This crate ships an OpenAI-compatible client
//! (the default runtime) and a scripted [`MockModel`] for tests.

pub mod error;
pub mod mock;
pub mod model;
pub mod openai;

pub use error::{ModelError, ModelResult};
pub use mock::MockModel;
pub use model::{BoxedModel, Model, ModelRequestParameters};
pub use openai::OpenAiModel;
