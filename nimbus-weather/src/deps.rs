//! Shared dependency bundle for the weather tools.

/// Default geocoding service.
pub const DEFAULT_GEO_BASE_URL: &str = "https://geocode.maps.co";

/// Default weather provider.
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.tomorrow.io";

/// Resources threaded through every tool call of one conversation turn.
///
/// Immutable after construction. A missing API key is not an error: the
/// corresponding tool switches to its fixed offline stub instead.
#[derive(Debug, Clone)]
pub struct Deps {
    /// Shared HTTP client.
    pub client: reqwest::Client,
    /// Weather provider API key; stub readings when absent.
    pub weather_api_key: Option<String>,
    /// Geocoding API key; stub coordinate when absent.
    pub geo_api_key: Option<String>,
    /// Geocoding service base URL.
    pub geo_base_url: String,
    /// Weather provider base URL.
    pub weather_base_url: String,
}

impl Deps {
    /// Create a bundle with default service URLs and no keys.
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            weather_api_key: None,
            geo_api_key: None,
            geo_base_url: DEFAULT_GEO_BASE_URL.to_string(),
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
        }
    }

    /// Create a bundle from the environment.
    ///
    /// Reads `WEATHER_API_KEY` and `GEO_API_KEY`; either may be absent.
    #[must_use]
    pub fn from_env(client: reqwest::Client) -> Self {
        Self::new(client)
            .with_weather_api_key(std::env::var("WEATHER_API_KEY").ok())
            .with_geo_api_key(std::env::var("GEO_API_KEY").ok())
    }

    /// Set the weather API key.
    #[must_use]
    pub fn with_weather_api_key(mut self, key: Option<String>) -> Self {
        self.weather_api_key = key;
        self
    }

    /// Set the geocoding API key.
    #[must_use]
    pub fn with_geo_api_key(mut self, key: Option<String>) -> Self {
        self.geo_api_key = key;
        self
    }

    /// Override the geocoding service base URL.
    #[must_use]
    pub fn with_geo_base_url(mut self, url: impl Into<String>) -> Self {
        self.geo_base_url = url.into();
        self
    }

    /// Override the weather provider base URL.
    #[must_use]
    pub fn with_weather_base_url(mut self, url: impl Into<String>) -> Self {
        self.weather_base_url = url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let deps = Deps::new(reqwest::Client::new());
        assert!(deps.weather_api_key.is_none());
        assert!(deps.geo_api_key.is_none());
        assert_eq!(deps.geo_base_url, DEFAULT_GEO_BASE_URL);
        assert_eq!(deps.weather_base_url, DEFAULT_WEATHER_BASE_URL);
    }

    #[test]
    fn test_builders() {
        let deps = Deps::new(reqwest::Client::new())
            .with_geo_api_key(Some("geo-key".into()))
            .with_weather_base_url("http://localhost:9999");
        assert_eq!(deps.geo_api_key.as_deref(), Some("geo-key"));
        assert_eq!(deps.weather_base_url, "http://localhost:9999");
    }
}
