//! Runtime configuration for the PowCollective server
//!
//! All settings come from environment variables with validated fallbacks;
//! an absent or unparseable value silently falls back to its default.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::forecast::open_meteo;

/// Default HTTP listen port
pub const DEFAULT_PORT: u16 = 3001;
/// Default forecast cache TTL in milliseconds (3 minutes)
pub const DEFAULT_CACHE_TTL_MS: u64 = 3 * 60 * 1000;
/// Default forecast cache capacity in entries
pub const DEFAULT_CACHE_CAPACITY: usize = 500;
/// Default upstream request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 8;
/// Default number of transient-failure retries per upstream request
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Root configuration for the server
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP listen port (`PORT`)
    pub port: u16,
    /// Forecast cache TTL (`CONDITIONS_CACHE_TTL_MS`, milliseconds)
    pub cache_ttl: Duration,
    /// Forecast cache capacity bound (`CONDITIONS_CACHE_CAPACITY`)
    pub cache_capacity: usize,
    /// Upstream forecast client settings
    pub forecast: ForecastConfig,
}

/// Upstream forecast provider settings
#[derive(Debug, Clone)]
pub struct ForecastConfig {
    /// Base endpoint URL (`FORECAST_BASE_URL`)
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Transient-failure retries
    pub max_retries: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            base_url: open_meteo::DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            cache_ttl: Duration::from_millis(DEFAULT_CACHE_TTL_MS),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            forecast: ForecastConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let cache_ttl_ms = parse_env::<u64>("CONDITIONS_CACHE_TTL_MS")
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_CACHE_TTL_MS);
        let cache_capacity = parse_env::<usize>("CONDITIONS_CACHE_CAPACITY")
            .filter(|cap| *cap > 0)
            .unwrap_or(DEFAULT_CACHE_CAPACITY);
        let timeout_secs = parse_env::<u64>("FORECAST_TIMEOUT_SECS")
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Self {
            port: parse_env("PORT").unwrap_or(DEFAULT_PORT),
            cache_ttl: Duration::from_millis(cache_ttl_ms),
            cache_capacity,
            forecast: ForecastConfig {
                base_url: env::var("FORECAST_BASE_URL")
                    .ok()
                    .filter(|url| url.starts_with("http://") || url.starts_with("https://"))
                    .unwrap_or_else(|| open_meteo::DEFAULT_BASE_URL.to_string()),
                timeout: Duration::from_secs(timeout_secs),
                max_retries: parse_env("FORECAST_MAX_RETRIES").unwrap_or(DEFAULT_MAX_RETRIES),
            },
        }
    }
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|raw| raw.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.port, 3001);
        assert_eq!(config.cache_ttl, Duration::from_secs(180));
        assert_eq!(config.cache_capacity, 500);
        assert!(config.forecast.base_url.starts_with("https://"));
    }

    #[test]
    fn test_invalid_ttl_falls_back_to_default() {
        // SAFETY: Test environment, setting test values only
        unsafe {
            env::set_var("CONDITIONS_CACHE_TTL_MS", "not-a-number");
        }

        let config = AppConfig::from_env();

        // SAFETY: Test cleanup
        unsafe {
            env::remove_var("CONDITIONS_CACHE_TTL_MS");
        }

        assert_eq!(config.cache_ttl, Duration::from_millis(DEFAULT_CACHE_TTL_MS));
    }

    #[test]
    fn test_zero_ttl_falls_back_to_default() {
        // SAFETY: Test environment, setting test values only
        unsafe {
            env::set_var("CONDITIONS_CACHE_TTL_MS", "0");
        }

        let config = AppConfig::from_env();

        // SAFETY: Test cleanup
        unsafe {
            env::remove_var("CONDITIONS_CACHE_TTL_MS");
        }

        assert_eq!(config.cache_ttl, Duration::from_millis(DEFAULT_CACHE_TTL_MS));
    }
}
