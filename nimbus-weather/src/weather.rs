//! Current-conditions tool.

use async_trait::async_trait;
use nimbus_tools::{
    RunContext, SchemaBuilder, Tool, ToolDefinition, ToolError, ToolResult, ToolReturn,
};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tracing::debug;

use crate::codes;
use crate::coords::CoordArgs;
use crate::deps::Deps;

/// Reading returned when no weather key is configured.
pub const STUB_TEMPERATURE: &str = "21°C";

/// Description paired with [`STUB_TEMPERATURE`].
pub const STUB_DESCRIPTION: &str = "Sunny";

/// Fetch current conditions at a coordinate.
pub struct GetWeather;

#[derive(Debug, Deserialize)]
struct RealtimeResponse {
    data: RealtimeData,
}

#[derive(Debug, Deserialize)]
struct RealtimeData {
    values: ConditionValues,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConditionValues {
    pub temperature: f64,
    #[serde(rename = "weatherCode")]
    pub weather_code: i64,
}

impl ConditionValues {
    /// Integer-rounded Celsius with the degree symbol.
    pub(crate) fn formatted_temperature(&self) -> String {
        format!("{:.0}°C", self.temperature)
    }
}

#[async_trait]
impl Tool<Deps> for GetWeather {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_weather",
            "Get the current weather at a location. The temperature attribute has the correct temperature.",
        )
        .with_parameters(
            SchemaBuilder::new()
                .number("lat", "Latitude of the location.", true)
                .number("lng", "Longitude of the location.", true)
                .build(),
        )
    }

    async fn call(&self, ctx: &RunContext<Deps>, args: JsonValue) -> ToolResult {
        let args: CoordArgs = serde_json::from_value(args)
            .map_err(|e| ToolError::invalid_args(e.to_string()))?;
        let deps = &ctx.deps;

        let Some(api_key) = deps.weather_api_key.as_deref() else {
            return Ok(ToolReturn::json(json!({
                "temperature": STUB_TEMPERATURE,
                "description": STUB_DESCRIPTION,
            })));
        };

        let location = args.location_param()?;
        debug!(%location, "calling weather API");
        let response = deps
            .client
            .get(format!("{}/v4/weather/realtime", deps.weather_base_url))
            .query(&[
                ("apikey", api_key),
                ("location", location.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| ToolError::execution_failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::http(status.as_u16(), body));
        }

        let parsed: RealtimeResponse = response
            .json()
            .await
            .map_err(|e| ToolError::execution_failed(e.to_string()))?;
        let values = parsed.data.values;

        Ok(ToolReturn::json(json!({
            "temperature": values.formatted_temperature(),
            "description": codes::describe(values.weather_code),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ctx(deps: Deps) -> RunContext<Deps> {
        RunContext::new(deps, "test-model")
    }

    #[tokio::test]
    async fn test_stub_without_api_key() {
        let deps = Deps::new(reqwest::Client::new());
        let ret = GetWeather
            .call(&ctx(deps), json!({"lat": 89.9, "lng": 179.9}))
            .await
            .unwrap();
        assert_eq!(
            ret.content,
            json!({"temperature": "21°C", "description": "Sunny"})
        );
    }

    #[tokio::test]
    async fn test_rounding_and_code_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/weather/realtime"))
            .and(query_param("apikey", "weather-key"))
            .and(query_param("location", "51.1,-0.1"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"values": {"temperature": 21.4, "weatherCode": 1000}}
            })))
            .mount(&server)
            .await;

        let deps = Deps::new(reqwest::Client::new())
            .with_weather_api_key(Some("weather-key".into()))
            .with_weather_base_url(server.uri());

        let ret = GetWeather
            .call(&ctx(deps), json!({"lat": 51.1, "lng": -0.1}))
            .await
            .unwrap();
        assert_eq!(
            ret.content,
            json!({"temperature": "21°C", "description": "Clear, Sunny"})
        );
    }

    #[tokio::test]
    async fn test_unknown_code_maps_to_unknown() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/weather/realtime"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"values": {"temperature": -3.6, "weatherCode": 31337}}
            })))
            .mount(&server)
            .await;

        let deps = Deps::new(reqwest::Client::new())
            .with_weather_api_key(Some("weather-key".into()))
            .with_weather_base_url(server.uri());

        let ret = GetWeather
            .call(&ctx(deps), json!({"lat": 60.0, "lng": 25.0}))
            .await
            .unwrap();
        assert_eq!(
            ret.content,
            json!({"temperature": "-4°C", "description": "Unknown"})
        );
    }

    #[tokio::test]
    async fn test_non_success_is_hard_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/weather/realtime"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let deps = Deps::new(reqwest::Client::new())
            .with_weather_api_key(Some("weather-key".into()))
            .with_weather_base_url(server.uri());

        let err = GetWeather
            .call(&ctx(deps), json!({"lat": 51.1, "lng": -0.1}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Http { status: 500, .. }));
    }
}
