//! Open-Meteo forecast client
//!
//! Fetches raw multi-resolution forecast data for a coordinate from the
//! Open-Meteo GFS endpoint. The request pre-selects Fahrenheit, mph and inch
//! units so the payload needs no client-side conversion; the one exception is
//! snow depth, which the provider reports in meters regardless of the
//! precipitation unit (the snapshot builder converts it).

use std::time::Duration;

use async_trait::async_trait;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::ForecastFetcher;
use crate::config::ForecastConfig;

/// Production forecast endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1/gfs";

const CURRENT_FIELDS: &[&str] = &[
    "temperature_2m",
    "apparent_temperature",
    "snowfall",
    "wind_speed_10m",
    "wind_gusts_10m",
    "visibility",
];
const MINUTELY_FIELDS: &[&str] = &["temperature_2m", "snowfall", "wind_speed_10m", "visibility"];
const HOURLY_FIELDS: &[&str] = &[
    "snowfall",
    "snow_depth",
    "wind_speed_10m",
    "wind_gusts_10m",
    "visibility",
];

/// Longest response-body snippet included in diagnostics
const BODY_SNIPPET_CHARS: usize = 400;

/// Raw forecast payload as returned by the provider
///
/// Every field is optional and every series array may be shorter than
/// requested or contain nulls; absence is not an error anywhere downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawForecastResponse {
    pub current: Option<CurrentConditions>,
    pub minutely_15: Option<MinutelySeries>,
    pub hourly: Option<HourlySeries>,
}

/// Single-point current-instant metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub time: Option<String>,
    #[serde(rename = "temperature_2m")]
    pub temperature: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub snowfall: Option<f64>,
    #[serde(rename = "wind_speed_10m")]
    pub wind_speed: Option<f64>,
    #[serde(rename = "wind_gusts_10m")]
    pub wind_gusts: Option<f64>,
    /// Meters
    pub visibility: Option<f64>,
}

/// 15-minute-resolution parallel arrays; `time` defines the shared index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MinutelySeries {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m")]
    pub temperature: Option<Vec<Option<f64>>>,
    pub snowfall: Option<Vec<Option<f64>>>,
    #[serde(rename = "wind_speed_10m")]
    pub wind_speed: Option<Vec<Option<f64>>>,
    pub visibility: Option<Vec<Option<f64>>>,
}

/// Hourly-resolution parallel arrays covering up to 72 past hours
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlySeries {
    #[serde(default)]
    pub time: Vec<String>,
    pub snowfall: Option<Vec<Option<f64>>>,
    /// Meters
    pub snow_depth: Option<Vec<Option<f64>>>,
    #[serde(rename = "wind_speed_10m")]
    pub wind_speed: Option<Vec<Option<f64>>>,
    #[serde(rename = "wind_gusts_10m")]
    pub wind_gusts: Option<Vec<Option<f64>>>,
    pub visibility: Option<Vec<Option<f64>>>,
}

/// HTTP client for the Open-Meteo forecast endpoint
///
/// Stateless and safe to call concurrently; transient failures are retried by
/// the middleware before the null-on-failure contract kicks in.
pub struct OpenMeteoClient {
    http: ClientWithMiddleware,
    base_url: String,
}

impl OpenMeteoClient {
    /// Build a client from forecast configuration
    pub fn new(config: &ForecastConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let http = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// Client against an explicit base URL with default timeout and no
    /// retries (used by tests against a local mock server).
    pub fn with_base_url(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let config = ForecastConfig {
            base_url: base_url.into(),
            timeout: Duration::from_secs(crate::config::DEFAULT_REQUEST_TIMEOUT_SECS),
            max_retries: 0,
        };
        Self::new(&config)
    }

    fn query(latitude: f64, longitude: f64, elevation_meters: Option<f64>) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
        ];

        if let Some(elevation) = elevation_meters.filter(|e| e.is_finite()) {
            query.push(("elevation", elevation.to_string()));
        }

        query.push(("current", CURRENT_FIELDS.join(",")));
        query.push(("minutely_15", MINUTELY_FIELDS.join(",")));
        query.push(("past_minutely_15", "1".to_string()));
        query.push(("forecast_minutely_15", "2".to_string()));
        query.push(("hourly", HOURLY_FIELDS.join(",")));
        query.push(("past_hours", "72".to_string()));
        query.push(("forecast_hours", "0".to_string()));
        query.push(("temperature_unit", "fahrenheit".to_string()));
        query.push(("wind_speed_unit", "mph".to_string()));
        query.push(("precipitation_unit", "inch".to_string()));
        query.push(("timezone", "auto".to_string()));
        query
    }
}

#[async_trait]
impl ForecastFetcher for OpenMeteoClient {
    async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        elevation_meters: Option<f64>,
    ) -> Option<RawForecastResponse> {
        let query = Self::query(latitude, longitude, elevation_meters);

        let response = match self.http.get(&self.base_url).query(&query).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!("Open-Meteo network error: {err}");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(BODY_SNIPPET_CHARS).collect();
            warn!("Open-Meteo HTTP status {status}, body snippet: {snippet}");
            return None;
        }

        match response.json::<RawForecastResponse>().await {
            Ok(raw) => Some(raw),
            Err(err) => {
                warn!("Failed to parse Open-Meteo response: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn forecast_json() -> serde_json::Value {
        serde_json::json!({
            "latitude": 39.48,
            "longitude": -106.04,
            "current": {
                "time": "2026-01-15T12:00",
                "temperature_2m": 18.5,
                "apparent_temperature": 9.1,
                "snowfall": 0.02,
                "wind_speed_10m": 14.0,
                "wind_gusts_10m": 22.0,
                "visibility": 8046.72
            },
            "minutely_15": {
                "time": ["2026-01-15T11:45", "2026-01-15T12:00", "2026-01-15T12:15"],
                "temperature_2m": [18.0, 18.5, null],
                "snowfall": [0.01, 0.02, 0.03],
                "wind_speed_10m": [12.0, 14.0, 16.0]
            },
            "hourly": {
                "time": ["2026-01-15T10:00", "2026-01-15T11:00"],
                "snowfall": [0.5, 0.8],
                "snow_depth": [1.2, 1.25]
            }
        })
    }

    #[tokio::test]
    async fn test_fetch_parses_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/gfs"))
            .and(query_param("temperature_unit", "fahrenheit"))
            .and(query_param("wind_speed_unit", "mph"))
            .and(query_param("precipitation_unit", "inch"))
            .and(query_param("past_hours", "72"))
            .and(query_param("forecast_hours", "0"))
            .and(query_param("past_minutely_15", "1"))
            .and(query_param("forecast_minutely_15", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_json()))
            .mount(&server)
            .await;

        let client = OpenMeteoClient::with_base_url(format!("{}/v1/gfs", server.uri())).unwrap();
        let raw = client.fetch_forecast(39.4817, -106.0384, Some(3445.0)).await;

        let raw = raw.expect("expected parsed payload");
        let current = raw.current.unwrap();
        assert_eq!(current.temperature, Some(18.5));
        assert_eq!(current.wind_gusts, Some(22.0));

        let minutely = raw.minutely_15.unwrap();
        assert_eq!(minutely.time.len(), 3);
        assert_eq!(minutely.temperature.unwrap()[2], None);

        let hourly = raw.hourly.unwrap();
        assert_eq!(hourly.snow_depth.unwrap(), vec![Some(1.2), Some(1.25)]);
        // Fields we never requested stay absent without failing the parse
        assert!(hourly.wind_gusts.is_none());
    }

    #[tokio::test]
    async fn test_elevation_param_included_when_hinted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/gfs"))
            .and(query_param("elevation", "3445"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_json()))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenMeteoClient::with_base_url(format!("{}/v1/gfs", server.uri())).unwrap();
        let raw = client.fetch_forecast(39.4817, -106.0384, Some(3445.0)).await;
        assert!(raw.is_some());
    }

    #[tokio::test]
    async fn test_error_status_returns_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/gfs"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let client = OpenMeteoClient::with_base_url(format!("{}/v1/gfs", server.uri())).unwrap();
        assert!(client.fetch_forecast(39.0, -106.0, None).await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_body_returns_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/gfs"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let client = OpenMeteoClient::with_base_url(format!("{}/v1/gfs", server.uri())).unwrap();
        assert!(client.fetch_forecast(39.0, -106.0, None).await.is_none());
    }

    #[test]
    fn test_query_omits_non_finite_elevation() {
        let query = OpenMeteoClient::query(39.0, -106.0, Some(f64::NAN));
        assert!(query.iter().all(|(name, _)| *name != "elevation"));

        let query = OpenMeteoClient::query(39.0, -106.0, Some(3200.0));
        assert!(query.iter().any(|(name, value)| *name == "elevation" && value == "3200"));
    }
}
