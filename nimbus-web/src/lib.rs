//! Browser chat front-end.
//!
//! A single embedded page plus a JSON endpoint. Conversation history lives
//! in an explicit [`ChatSession`] created at startup and torn down with the
//! process; errors from a turn are rendered in place of the reply rather
//! than crashing the session.

use axum::{
    extract::State,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use nimbus_agent::{Agent, RunOptions};
use nimbus_core::ModelRequest;
use nimbus_weather::Deps;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

/// In-memory conversation history for one browser session.
#[derive(Debug, Default)]
pub struct ChatSession {
    messages: Mutex<Vec<ModelRequest>>,
}

impl ChatSession {
    /// Create an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the history so far.
    pub async fn history(&self) -> Vec<ModelRequest> {
        self.messages.lock().await.clone()
    }

    /// Replace the history with the post-turn message list.
    pub async fn replace(&self, messages: Vec<ModelRequest>) {
        *self.messages.lock().await = messages;
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The assembled weather agent.
    pub agent: Arc<Agent<Deps>>,
    /// Dependency bundle cloned into each turn.
    pub deps: Deps,
    /// Conversation history.
    pub session: Arc<ChatSession>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    /// Agent reply, or error text when `error` is set.
    pub reply: String,
    /// Whether the turn failed.
    pub error: bool,
}

/// Serve the embedded chat page.
pub async fn index() -> Html<&'static str> {
    static INDEX: &str = include_str!("../static/index.html");
    Html(INDEX)
}

/// Run one conversation turn.
pub async fn chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Json<ChatReply> {
    let history = state.session.history().await;
    let options = RunOptions::new().message_history(history);

    match state
        .agent
        .run_with_options(req.message, state.deps.clone(), options)
        .await
    {
        Ok(result) => {
            state.session.replace(result.all_messages().to_vec()).await;
            Json(ChatReply {
                reply: result.into_output(),
                error: false,
            })
        }
        Err(e) => {
            warn!(error = %e, "chat turn failed");
            Json(ChatReply {
                reply: format!("An error occurred: {e}"),
                error: true,
            })
        }
    }
}

/// Build the application router with the provided state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/chat", post(chat))
        .with_state(state)
}
