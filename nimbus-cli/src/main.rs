//! Console chat loop for the weather agent.

use anyhow::Context;
use nimbus_agent::RunOptions;
use nimbus_core::ModelRequest;
use nimbus_models::OpenAiModel;
use nimbus_weather::{weather_agent, Deps};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let model = OpenAiModel::from_env().context("configuring the model")?;
    let agent = weather_agent(Arc::new(model));
    let client = reqwest::Client::new();

    println!("Weather Chat Agent (type 'exit' to quit)");

    let stdin = io::stdin();
    let mut messages: Vec<ModelRequest> = Vec::new();

    loop {
        print!("You: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();

        if matches!(query.to_lowercase().as_str(), "exit" | "quit" | "q") {
            println!("Goodbye!");
            break;
        }
        if query.is_empty() {
            continue;
        }

        let deps = Deps::from_env(client.clone());
        let options = RunOptions::new().message_history(messages.clone());

        match agent.run_with_options(query, deps, options).await {
            Ok(result) => {
                messages = result.all_messages().to_vec();
                println!("Agent: {}", result.output());
            }
            Err(e) => println!("An error occurred: {e}"),
        }
    }

    Ok(())
}
