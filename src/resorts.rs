//! Static resort directory
//!
//! The directory ships with the server binary; resorts are looked up by
//! case-insensitive slug and optionally filtered by state slug.

use crate::models::{ResortBrand, ResortSize, ResortSummary};

/// In-memory resort directory
pub struct ResortDirectory {
    resorts: Vec<ResortSummary>,
}

impl ResortDirectory {
    /// Directory with the bundled resort list
    #[must_use]
    pub fn bundled() -> Self {
        Self {
            resorts: bundled_resorts(),
        }
    }

    /// All resorts, optionally filtered by state slug
    #[must_use]
    pub fn all(&self, state_slug: Option<&str>) -> Vec<ResortSummary> {
        match state_slug {
            None => self.resorts.clone(),
            Some(state) => {
                let normalized = state.to_lowercase();
                self.resorts
                    .iter()
                    .filter(|r| r.state_slug.to_lowercase() == normalized)
                    .cloned()
                    .collect()
            }
        }
    }

    /// Look up a resort by case-insensitive slug
    #[must_use]
    pub fn by_slug(&self, slug: &str) -> Option<&ResortSummary> {
        let normalized = slug.to_lowercase();
        self.resorts
            .iter()
            .find(|r| r.slug.to_lowercase() == normalized)
    }
}

#[allow(clippy::too_many_arguments)]
fn resort(
    slug: &str,
    name: &str,
    state_code: &str,
    state_slug: &str,
    size: ResortSize,
    brand: ResortBrand,
    elevation_top_ft: f64,
    elevation_base_ft: f64,
    lat: f64,
    lon: f64,
    default_city: Option<(&str, u32)>,
) -> ResortSummary {
    ResortSummary {
        slug: slug.to_string(),
        name: name.to_string(),
        state_code: state_code.to_string(),
        state_slug: state_slug.to_string(),
        size,
        brand,
        elevation_top_ft,
        elevation_base_ft,
        vertical_drop_ft: elevation_top_ft - elevation_base_ft,
        lat,
        lon,
        default_city: default_city.map(|(city, _)| city.to_string()),
        default_drive_from_city_minutes: default_city.map(|(_, minutes)| minutes),
    }
}

fn bundled_resorts() -> Vec<ResortSummary> {
    use ResortBrand::{Epic, Ikon, Independent};
    use ResortSize::{Mega, Regional};

    vec![
        resort(
            "breckenridge",
            "Breckenridge",
            "CO",
            "colorado",
            Mega,
            Epic,
            12_998.0,
            9_600.0,
            39.4817,
            -106.0384,
            Some(("Denver", 110)),
        ),
        resort(
            "vail",
            "Vail",
            "CO",
            "colorado",
            Mega,
            Epic,
            11_570.0,
            8_120.0,
            39.6061,
            -106.3550,
            Some(("Denver", 120)),
        ),
        resort(
            "keystone",
            "Keystone",
            "CO",
            "colorado",
            Regional,
            Epic,
            12_408.0,
            9_280.0,
            39.6084,
            -105.9437,
            Some(("Denver", 90)),
        ),
        resort(
            "aspen-snowmass",
            "Aspen Snowmass",
            "CO",
            "colorado",
            Mega,
            Ikon,
            12_510.0,
            8_104.0,
            39.2084,
            -106.9490,
            Some(("Aspen", 20)),
        ),
        resort(
            "steamboat",
            "Steamboat",
            "CO",
            "colorado",
            Mega,
            Ikon,
            10_568.0,
            6_900.0,
            40.4572,
            -106.8045,
            None,
        ),
        resort(
            "park-city",
            "Park City Mountain",
            "UT",
            "utah",
            Mega,
            Epic,
            10_026.0,
            6_800.0,
            40.6514,
            -111.5080,
            Some(("Salt Lake City", 40)),
        ),
        resort(
            "alta",
            "Alta",
            "UT",
            "utah",
            Regional,
            Ikon,
            11_068.0,
            8_530.0,
            40.5884,
            -111.6386,
            Some(("Salt Lake City", 45)),
        ),
        resort(
            "jackson-hole",
            "Jackson Hole",
            "WY",
            "wyoming",
            Mega,
            Ikon,
            10_450.0,
            6_311.0,
            43.5875,
            -110.8279,
            None,
        ),
        resort(
            "palisades-tahoe",
            "Palisades Tahoe",
            "CA",
            "california",
            Mega,
            Ikon,
            9_050.0,
            6_200.0,
            39.1969,
            -120.2358,
            Some(("Reno", 60)),
        ),
        resort(
            "big-sky",
            "Big Sky",
            "MT",
            "montana",
            Mega,
            Ikon,
            11_166.0,
            6_800.0,
            45.2862,
            -111.4015,
            None,
        ),
        resort(
            "stowe",
            "Stowe",
            "VT",
            "vermont",
            Regional,
            Epic,
            3_719.0,
            1_559.0,
            44.5303,
            -72.7814,
            None,
        ),
        resort(
            "killington",
            "Killington",
            "VT",
            "vermont",
            Regional,
            Independent,
            4_241.0,
            1_165.0,
            43.6045,
            -72.8201,
            None,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let directory = ResortDirectory::bundled();
        let resort = directory.by_slug("BRECKENRIDGE").unwrap();
        assert_eq!(resort.slug, "breckenridge");
        assert_eq!(resort.state_code, "CO");
    }

    #[test]
    fn test_unknown_slug_is_none() {
        let directory = ResortDirectory::bundled();
        assert!(directory.by_slug("mont-blanc").is_none());
    }

    #[test]
    fn test_state_filter() {
        let directory = ResortDirectory::bundled();
        let colorado = directory.all(Some("colorado"));
        assert!(!colorado.is_empty());
        assert!(colorado.iter().all(|r| r.state_slug == "colorado"));

        let everything = directory.all(None);
        assert!(everything.len() > colorado.len());
    }

    #[test]
    fn test_slugs_are_unique() {
        let directory = ResortDirectory::bundled();
        let all = directory.all(None);
        let mut slugs: Vec<_> = all.iter().map(|r| r.slug.clone()).collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), all.len());
    }
}
