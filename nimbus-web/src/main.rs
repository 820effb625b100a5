//! Web chat server entry point.

use anyhow::Context;
use nimbus_models::OpenAiModel;
use nimbus_weather::{weather_agent, Deps};
use nimbus_web::{app, AppState, ChatSession};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let model = OpenAiModel::from_env().context("configuring the model")?;
    let state = AppState {
        agent: Arc::new(weather_agent(Arc::new(model))),
        deps: Deps::from_env(reqwest::Client::new()),
        session: Arc::new(ChatSession::new()),
    };

    let addr = std::env::var("NIMBUS_WEB_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "serving weather chat");

    axum::serve(listener, app(state)).await?;
    Ok(())
}
