//! Hourly forecast tool.

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
use crate::weather::ConditionValues;

/// Fetch the hourly forecast at a coordinate.
///
/// Covers the provider's available horizon (five days in practice). Unlike
/// [`crate::weather::GetWeather`] there is no offline stub: the request
/// goes out even without a key and the provider's rejection surfaces as a
/// hard failure.
pub struct GetForecast;

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    timelines: Timelines,
    #[serde(default)]
    location: Option<Location>,
}

#[derive(Debug, Deserialize)]
struct Timelines {
    hourly: Vec<HourlyInterval>,
}

#[derive(Debug, Deserialize)]
struct HourlyInterval {
    time: String,
    values: ConditionValues,
}

#[derive(Debug, Deserialize)]
struct Location {
    #[serde(default)]
    name: Option<String>,
}

#[async_trait]
impl Tool<Deps> for GetForecast {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_forecast",
            "Get the hourly weather forecast at a location for the next five days.",
        )
        .with_parameters(
            SchemaBuilder::new()
                .number_constrained(
                    "lat",
                    "Latitude of the location.",
                    true,
                    Some(-90.0),
                    Some(90.0),
                )
                .number_constrained(
                    "lng",
                    "Longitude of the location.",
                    true,
                    Some(-180.0),
                    Some(180.0),
                )
                .build(),
        )
    }

    async fn call(&self, ctx: &RunContext<Deps>, args: JsonValue) -> ToolResult {
        let args: CoordArgs = serde_json::from_value(args)
            .map_err(|e| ToolError::invalid_args(e.to_string()))?;
        let deps = &ctx.deps;

        let location = args.location_param()?;
        let mut query: Vec<(&str, &str)> =
            vec![("location", location.as_str()), ("units", "metric")];
        if let Some(key) = deps.weather_api_key.as_deref() {
            query.push(("apikey", key));
        }

        debug!(%location, "calling forecast API");
        let response = deps
            .client
            .get(format!("{}/v4/weather/forecast", deps.weather_base_url))
            .query(&query)
            .send()
            .await
            .map_err(|e| ToolError::execution_failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::http(status.as_u16(), body));
        }

        let parsed: ForecastResponse = response
            .json()
            .await
            .map_err(|e| ToolError::execution_failed(e.to_string()))?;

        // Upstream ordering is preserved, not re-sorted.
        let hourly: Vec<JsonValue> = parsed
            .timelines
            .hourly
            .into_iter()
            .map(|interval| {
                json!({
                    "date_time": interval.time,
                    "temperature": interval.values.formatted_temperature(),
                    "description": codes::describe(interval.values.weather_code),
                })
            })
            .collect();

        let location_name = parsed
            .location
            .and_then(|l| l.name)
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(ToolReturn::json(json!({
            "hourly": hourly,
            "location": location_name,
        })))
    }
}
