//! Resort directory entries

use serde::{Deserialize, Serialize};

/// Feet to meters conversion factor
pub const FEET_TO_METERS: f64 = 0.3048;

/// Rough size class of a resort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResortSize {
    Local,
    Regional,
    Mega,
}

/// Pass affiliation of a resort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResortBrand {
    Epic,
    Ikon,
    Independent,
}

/// A single entry in the static resort directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResortSummary {
    /// Unique key, matched case-insensitively in lookups
    pub slug: String,
    pub name: String,
    /// Two-letter state code (e.g. "CO")
    pub state_code: String,
    pub state_slug: String,
    pub size: ResortSize,
    pub brand: ResortBrand,
    pub elevation_top_ft: f64,
    pub elevation_base_ft: f64,
    pub vertical_drop_ft: f64,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_drive_from_city_minutes: Option<u32>,
}

impl ResortSummary {
    /// Elevation hint for forecast requests: the midpoint of base and summit
    /// elevation, in meters. `None` when the directory carries no elevation
    /// stats for this resort.
    #[must_use]
    pub fn midpoint_elevation_meters(&self) -> Option<f64> {
        if self.elevation_top_ft > 0.0 && self.elevation_base_ft > 0.0 {
            Some((self.elevation_top_ft + self.elevation_base_ft) / 2.0 * FEET_TO_METERS)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resort(top_ft: f64, base_ft: f64) -> ResortSummary {
        ResortSummary {
            slug: "test-resort".to_string(),
            name: "Test Resort".to_string(),
            state_code: "CO".to_string(),
            state_slug: "colorado".to_string(),
            size: ResortSize::Regional,
            brand: ResortBrand::Independent,
            elevation_top_ft: top_ft,
            elevation_base_ft: base_ft,
            vertical_drop_ft: top_ft - base_ft,
            lat: 39.0,
            lon: -106.0,
            default_city: None,
            default_drive_from_city_minutes: None,
        }
    }

    #[test]
    fn test_midpoint_elevation() {
        let hint = resort(12000.0, 9000.0).midpoint_elevation_meters().unwrap();
        // (12000 + 9000) / 2 * 0.3048 = 3200.4 m
        assert!((hint - 3200.4).abs() < 1e-9);
    }

    #[test]
    fn test_midpoint_elevation_missing_stats() {
        assert_eq!(resort(0.0, 0.0).midpoint_elevation_meters(), None);
        assert_eq!(resort(12000.0, 0.0).midpoint_elevation_meters(), None);
    }
}
