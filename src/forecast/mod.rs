//! Forecast retrieval
//!
//! This module owns everything between the conditions service and the
//! upstream forecast provider: the Open-Meteo HTTP client and the
//! request-collapsing TTL cache wrapped around it.

pub mod cache;
pub mod open_meteo;

use async_trait::async_trait;

pub use cache::ForecastCache;
pub use open_meteo::{OpenMeteoClient, RawForecastResponse};

/// Seam between the cache and the upstream client.
///
/// `None` is the sole failure signal: implementations never raise past this
/// boundary, and callers treat a missing response as "degrade to the stub".
#[async_trait]
pub trait ForecastFetcher: Send + Sync {
    async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        elevation_meters: Option<f64>,
    ) -> Option<RawForecastResponse>;
}
