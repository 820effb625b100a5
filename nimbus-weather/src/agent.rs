//! Weather agent assembly.

use crate::forecast::GetForecast;
use crate::geocode::GetLatLng;
use crate::weather::GetWeather;
use nimbus_agent::Agent;
use nimbus_models::Model;
use std::sync::Arc;

use crate::deps::Deps;

/// System instruction given to the model.
pub const SYSTEM_PROMPT: &str =
    "Be concise, reply with one sentence. Always include temperature in your response.";

/// Retry budget for recoverable tool failures, per conversation turn.
pub const TOOL_RETRIES: u32 = 2;

/// Assemble the weather agent: three tools, the concise-answer
/// instruction, and a bounded retry budget.
#[must_use]
pub fn weather_agent(model: Arc<dyn Model>) -> Agent<Deps> {
    Agent::builder(model)
        .name("weather-agent")
        .system_prompt(SYSTEM_PROMPT)
        .tool(GetLatLng)
        .tool(GetWeather)
        .tool(GetForecast)
        .retries(TOOL_RETRIES)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimbus_models::MockModel;

    #[test]
    fn test_assembly() {
        let agent = weather_agent(Arc::new(MockModel::new()));
        assert_eq!(agent.name(), Some("weather-agent"));
        assert_eq!(agent.system_prompt(), SYSTEM_PROMPT);

        let names: Vec<_> = agent
            .tool_definitions()
            .iter()
            .map(|d| d.name.clone())
            .collect();
        assert_eq!(names, vec!["get_lat_lng", "get_weather", "get_forecast"]);
    }
}
