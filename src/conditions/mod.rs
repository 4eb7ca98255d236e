//! Conditions service
//!
//! Thin orchestrator over the static resort directory, the forecast cache
//! and the snapshot builder. Upstream unavailability is absorbed here: the
//! cache's `None` passes straight through to the builder, which answers with
//! the stub snapshot instead of an error.

pub mod snapshot;

use std::sync::Arc;

use tracing::debug;

use crate::error::ConditionsError;
use crate::forecast::cache::ForecastCache;
use crate::models::ConditionsSnapshot;
use crate::resorts::ResortDirectory;

/// Conditions lookup for resorts by slug
pub struct ConditionsService {
    directory: Arc<ResortDirectory>,
    cache: Arc<ForecastCache>,
}

impl ConditionsService {
    pub fn new(directory: Arc<ResortDirectory>, cache: Arc<ForecastCache>) -> Self {
        Self { directory, cache }
    }

    /// Conditions snapshot for a resort slug.
    ///
    /// Fails only when the slug does not resolve in the directory.
    pub async fn conditions_for_resort(
        &self,
        slug: &str,
    ) -> Result<ConditionsSnapshot, ConditionsError> {
        let resort = self
            .directory
            .by_slug(slug)
            .ok_or_else(|| ConditionsError::resort_not_found(slug))?;

        let elevation_hint = resort.midpoint_elevation_meters();
        let raw = self
            .cache
            .get_or_fetch(resort.lat, resort.lon, elevation_hint)
            .await;

        if raw.is_none() {
            debug!("no live forecast for {}, serving stub snapshot", resort.slug);
        }

        Ok(snapshot::build_snapshot(&resort.slug, raw.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::ForecastFetcher;
    use crate::forecast::open_meteo::{HourlySeries, RawForecastResponse};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Fetcher stub returning a canned response and recording the request
    struct StubFetcher {
        response: Option<RawForecastResponse>,
        seen: Mutex<Vec<(f64, f64, Option<f64>)>>,
    }

    impl StubFetcher {
        fn returning(response: Option<RawForecastResponse>) -> Self {
            Self {
                response,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ForecastFetcher for StubFetcher {
        async fn fetch_forecast(
            &self,
            latitude: f64,
            longitude: f64,
            elevation_meters: Option<f64>,
        ) -> Option<RawForecastResponse> {
            self.seen
                .lock()
                .unwrap()
                .push((latitude, longitude, elevation_meters));
            self.response.clone()
        }
    }

    fn service_with(fetcher: Arc<StubFetcher>) -> ConditionsService {
        let cache = Arc::new(ForecastCache::new(fetcher, Duration::from_secs(180), 500));
        ConditionsService::new(Arc::new(ResortDirectory::bundled()), cache)
    }

    #[tokio::test]
    async fn test_unknown_slug_is_not_found() {
        let service = service_with(Arc::new(StubFetcher::returning(None)));
        let err = service.conditions_for_resort("mont-blanc").await.unwrap_err();
        assert!(matches!(err, ConditionsError::ResortNotFound { .. }));
    }

    #[tokio::test]
    async fn test_upstream_failure_degrades_to_stub() {
        let service = service_with(Arc::new(StubFetcher::returning(None)));
        let snapshot = service.conditions_for_resort("vail").await.unwrap();
        assert_eq!(snapshot.resort_slug, "vail");
        assert!(snapshot.short_text.contains("unavailable"));
    }

    #[tokio::test]
    async fn test_breckenridge_light_refresh_end_to_end() {
        // 72 hourly samples, only the last two nonzero, summing to 1.3
        let mut samples = vec![Some(0.0); 70];
        samples.push(Some(0.5));
        samples.push(Some(0.8));
        let raw = RawForecastResponse {
            hourly: Some(HourlySeries {
                time: (0..72).map(|i| format!("t{i}")).collect(),
                snowfall: Some(samples),
                ..HourlySeries::default()
            }),
            ..RawForecastResponse::default()
        };

        let fetcher = Arc::new(StubFetcher::returning(Some(raw)));
        let service = service_with(fetcher.clone());

        let snapshot = service.conditions_for_resort("breckenridge").await.unwrap();
        assert_eq!(snapshot.resort_slug, "breckenridge");
        assert_eq!(snapshot.snowfall24h_in, 1.3);
        assert!(snapshot.short_text.contains("light refresh"));

        // The directory's coordinates and the elevation midpoint reached the
        // fetcher: (12998 + 9600) / 2 ft in meters.
        let seen = fetcher.seen.lock().unwrap();
        let (lat, lon, elevation) = seen[0];
        assert_eq!(lat, 39.4817);
        assert_eq!(lon, -106.0384);
        assert!((elevation.unwrap() - 3443.9352).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_slug_resolution_is_case_insensitive() {
        let service = service_with(Arc::new(StubFetcher::returning(None)));
        let snapshot = service.conditions_for_resort("Breckenridge").await.unwrap();
        assert_eq!(snapshot.resort_slug, "breckenridge");
    }
}
