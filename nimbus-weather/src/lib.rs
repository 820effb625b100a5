//! Conversational weather assistant.
//!
//! Three tools behind one agent: [`GetLatLng`] resolves a free-text
//! location to coordinates, [`GetWeather`] fetches current conditions and
//! [`GetForecast`] the hourly forecast. A missing API key switches a tool
//! to its fixed offline stub instead of failing, and an unresolvable
//! location invites the model to rephrase rather than aborting the turn.
//!
//! # Example
//!
//! ```no_run
//! use nimbus_models::OpenAiModel;
//! use nimbus_weather::{weather_agent, Deps};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let model = Arc::new(OpenAiModel::from_env()?);
//! let agent = weather_agent(model);
//! let deps = Deps::from_env(reqwest::Client::new());
//!
//! let result = agent.run("What is the weather like in London?", deps).await?;
//! println!("{}", result.output());
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod codes;
mod coords;
pub mod deps;
pub mod forecast;
pub mod geocode;
pub mod weather;

pub use agent::{weather_agent, SYSTEM_PROMPT, TOOL_RETRIES};
pub use deps::{Deps, DEFAULT_GEO_BASE_URL, DEFAULT_WEATHER_BASE_URL};
pub use forecast::GetForecast;
pub use geocode::{GetLatLng, STUB_COORDINATE};
pub use weather::{GetWeather, STUB_DESCRIPTION, STUB_TEMPERATURE};
