//! Derived conditions snapshot served to the browser client
//!
//! Everything here is computed fresh per request by the snapshot builder and
//! never mutated after construction. Field names serialize in camelCase to
//! match the client's wire format.

use serde::{Deserialize, Serialize};

/// Coarse weather-intensity classification of a cluster bucket, used for UI
/// styling and alerting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Calm,
    Good,
    Stormy,
}

/// One of three short-term (15-minute-scale) condition summaries:
/// past, current, near-future.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterBucket {
    pub label: String,
    pub temp_f: f64,
    /// Rounded to 2 decimal places
    pub snowfall_in: f64,
    pub wind_mph: f64,
    pub severity: Severity,
}

/// Complete derived conditions payload for one resort at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionsSnapshot {
    pub resort_slug: String,
    /// Timestamp of computation, not of the underlying forecast data
    pub generated_at_iso: String,
    pub temp_f: f64,
    pub feels_like_f: f64,
    pub wind_mph: f64,
    pub gust_mph: f64,
    pub visibility_miles: f64,
    pub snowfall24h_in: f64,
    pub snowfall48h_in: f64,
    pub snowfall72h_in: f64,
    pub snow_depth_base_in: f64,
    pub snow_depth_summit_in: f64,
    pub short_text: String,
    /// Always exactly three buckets, ordered past, now, future
    pub cluster_buckets: Vec<ClusterBucket>,
}
