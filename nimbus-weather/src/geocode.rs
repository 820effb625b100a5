//! Location resolution tool.

use async_trait::async_trait;
use nimbus_tools::{
    RunContext, SchemaBuilder, Tool, ToolDefinition, ToolError, ToolResult, ToolReturn,
};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tracing::debug;

use crate::deps::Deps;

/// Coordinate returned when no geocoding key is configured.
///
/// A fixed point near London, so the rest of the pipeline stays exercisable
/// offline.
pub const STUB_COORDINATE: (f64, f64) = (51.1, -0.1);

/// Resolve a free-text location description to latitude/longitude.
///
/// Zero search results is the retryable condition: the description was
/// valid but unresolvable, and the model is invited to rephrase and call
/// again. Non-2xx responses are hard failures.
pub struct GetLatLng;

#[derive(Debug, Deserialize)]
struct Args {
    location_description: String,
}

#[async_trait]
impl Tool<Deps> for GetLatLng {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("get_lat_lng", "Get the latitude and longitude of a location.")
            .with_parameters(
                SchemaBuilder::new()
                    .string("location_description", "A description of a location.", true)
                    .build(),
            )
    }

    async fn call(&self, ctx: &RunContext<Deps>, args: JsonValue) -> ToolResult {
        let args: Args = serde_json::from_value(args)
            .map_err(|e| ToolError::invalid_args(e.to_string()))?;
        let deps = &ctx.deps;

        let Some(api_key) = deps.geo_api_key.as_deref() else {
            return Ok(ToolReturn::json(json!({
                "lat": STUB_COORDINATE.0,
                "lng": STUB_COORDINATE.1,
            })));
        };

        debug!(query = %args.location_description, "calling geocode API");
        let response = deps
            .client
            .get(format!("{}/search", deps.geo_base_url))
            .query(&[("q", args.location_description.as_str()), ("api_key", api_key)])
            .send()
            .await
            .map_err(|e| ToolError::execution_failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::http(status.as_u16(), body));
        }

        let results: Vec<JsonValue> = response
            .json()
            .await
            .map_err(|e| ToolError::execution_failed(e.to_string()))?;

        match results.first() {
            // lat/lon pass through exactly as the service returned them
            // (strings in practice); the model handles either form.
            Some(first) => Ok(ToolReturn::json(json!({
                "lat": first["lat"],
                "lng": first["lon"],
            }))),
            None => Err(ToolError::model_retry("Could not find the location")),
        }
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
        let ret = GetLatLng
            .call(&ctx(deps), json!({"location_description": "anywhere at all"}))
            .await
            .unwrap();
        assert_eq!(ret.content, json!({"lat": 51.1, "lng": -0.1}));
    }

    #[tokio::test]
    async fn test_first_result_passthrough() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "London"))
            .and(query_param("api_key", "geo-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"lat": "51.5073219", "lon": "-0.1276474", "display_name": "London"},
                {"lat": "42.98", "lon": "-81.24", "display_name": "London, Ontario"}
            ])))
            .mount(&server)
            .await;

        let deps = Deps::new(reqwest::Client::new())
            .with_geo_api_key(Some("geo-key".into()))
            .with_geo_base_url(server.uri());

        let ret = GetLatLng
            .call(&ctx(deps), json!({"location_description": "London"}))
            .await
            .unwrap();
        assert_eq!(ret.content, json!({"lat": "51.5073219", "lng": "-0.1276474"}));
    }

    #[tokio::test]
    async fn test_zero_results_is_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let deps = Deps::new(reqwest::Client::new())
            .with_geo_api_key(Some("geo-key".into()))
            .with_geo_base_url(server.uri());

        let err = GetLatLng
            .call(&ctx(deps), json!({"location_description": "nowheresville"}))
            .await
            .unwrap_err();
        assert!(err.is_model_retry());
        assert!(err.to_string().contains("Could not find the location"));
    }

    #[tokio::test]
    async fn test_non_success_is_hard_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let deps = Deps::new(reqwest::Client::new())
            .with_geo_api_key(Some("geo-key".into()))
            .with_geo_base_url(server.uri());

        let err = GetLatLng
            .call(&ctx(deps), json!({"location_description": "London"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Http { status: 429, .. }));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_missing_argument() {
        let deps = Deps::new(reqwest::Client::new());
        let err = GetLatLng.call(&ctx(deps), json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
