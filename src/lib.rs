//! `PowCollective` - Ski resort conditions aggregation API
//!
//! This library aggregates third-party weather-forecast data into a compact
//! conditions snapshot for ski resorts and exposes it, alongside a static
//! resort directory, via a small HTTP API.

pub mod api;
pub mod conditions;
pub mod config;
pub mod error;
pub mod forecast;
pub mod models;
pub mod resorts;
pub mod web;

// Re-export core types for public API
pub use conditions::ConditionsService;
pub use config::{AppConfig, ForecastConfig};
pub use error::ConditionsError;
pub use forecast::{ForecastCache, ForecastFetcher, OpenMeteoClient, RawForecastResponse};
pub use models::{ClusterBucket, ConditionsSnapshot, ResortSummary, Severity};
pub use resorts::ResortDirectory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
