//! Snapshot builder
//!
//! Pure transformation from a raw forecast response (or its absence) into the
//! UI-ready conditions snapshot: per-field defaulting, rolling snowfall sums,
//! cluster bucketing, severity classification and narrative selection. No
//! I/O; every input shape, however partial, produces a renderable snapshot.

use chrono::{SecondsFormat, Utc};

use crate::forecast::open_meteo::{CurrentConditions, MinutelySeries, RawForecastResponse};
use crate::models::{ClusterBucket, ConditionsSnapshot, Severity};

/// Fixed three-slot bucket sequence, past to future
pub const BUCKET_LABELS: [&str; 3] = ["Past 15 min", "Now", "Next 15 min"];

const DEFAULT_TEMP_F: f64 = 20.0;
const DEFAULT_WIND_MPH: f64 = 10.0;
const METERS_PER_MILE: f64 = 1609.344;
const INCHES_PER_METER: f64 = 39.3701;

/// Build the conditions snapshot for a resort from raw forecast data.
///
/// A `None` input yields the documented stub snapshot so the client always
/// has a valid shape to render.
#[must_use]
pub fn build_snapshot(resort_slug: &str, raw: Option<&RawForecastResponse>) -> ConditionsSnapshot {
    let Some(raw) = raw else {
        return stub_snapshot(resort_slug);
    };

    let current = raw.current.as_ref();

    // Defaulting table for the current-instant metrics. Wind degrades to a
    // sane constant rather than deriving from another field.
    let temp_f = instant_field(current, |c| c.temperature).unwrap_or(DEFAULT_TEMP_F);
    let feels_like_f = instant_field(current, |c| c.apparent_temperature).unwrap_or(temp_f);
    let wind_mph = instant_field(current, |c| c.wind_speed).unwrap_or(DEFAULT_WIND_MPH);
    let gust_mph = instant_field(current, |c| c.wind_gusts).unwrap_or(wind_mph);
    let visibility_miles = instant_field(current, |c| c.visibility)
        .map(|meters| round1(meters / METERS_PER_MILE))
        .unwrap_or(0.0);
    let current_snowfall_in = instant_field(current, |c| c.snowfall).unwrap_or(0.0);

    let hourly_snowfall = raw.hourly.as_ref().and_then(|h| h.snowfall.as_ref());
    let snowfall24h_in = round2(trailing_sum(hourly_snowfall, 24));
    let snowfall48h_in = round2(trailing_sum(hourly_snowfall, 48));
    let snowfall72h_in = round2(trailing_sum(hourly_snowfall, 72));

    // The source data carries one depth series with no elevation bands, so
    // base and summit report the same measured depth.
    let snow_depth_in = last_valid(raw.hourly.as_ref().and_then(|h| h.snow_depth.as_ref()))
        .map(|meters| round1(meters * INCHES_PER_METER))
        .unwrap_or(0.0);

    let cluster_buckets = build_cluster_buckets(
        raw.minutely_15.as_ref(),
        temp_f,
        wind_mph,
        current_snowfall_in,
    );

    ConditionsSnapshot {
        resort_slug: resort_slug.to_string(),
        generated_at_iso: now_iso(),
        temp_f,
        feels_like_f,
        wind_mph,
        gust_mph,
        visibility_miles,
        snowfall24h_in,
        snowfall48h_in,
        snowfall72h_in,
        snow_depth_base_in: snow_depth_in,
        snow_depth_summit_in: snow_depth_in,
        short_text: narrative(temp_f, wind_mph, snowfall24h_in, snowfall72h_in),
        cluster_buckets,
    }
}

/// Severity of a bucket as a pure function of its metrics.
///
/// The stormy check runs first and overrides unconditionally.
#[must_use]
pub fn classify_severity(temp_f: f64, snowfall_in: f64, wind_mph: f64) -> Severity {
    if wind_mph >= 40.0 || snowfall_in >= 0.25 {
        return Severity::Stormy;
    }
    if (0.05..0.25).contains(&snowfall_in) && wind_mph <= 30.0 && temp_f <= 30.0 {
        return Severity::Good;
    }
    Severity::Calm
}

fn instant_field(
    current: Option<&CurrentConditions>,
    pick: impl Fn(&CurrentConditions) -> Option<f64>,
) -> Option<f64> {
    current.and_then(pick).filter(|v| v.is_finite())
}

/// Sum of the trailing `hours` samples, using whatever suffix of the series
/// exists. Missing or negative samples contribute nothing; fewer samples than
/// requested means a partial sum, never padding.
fn trailing_sum(samples: Option<&Vec<Option<f64>>>, hours: usize) -> f64 {
    let Some(samples) = samples else {
        return 0.0;
    };
    let start = samples.len().saturating_sub(hours);
    samples[start..]
        .iter()
        .filter_map(|sample| *sample)
        .filter(|v| v.is_finite() && *v > 0.0)
        .sum()
}

fn last_valid(samples: Option<&Vec<Option<f64>>>) -> Option<f64> {
    samples?
        .iter()
        .rev()
        .filter_map(|sample| *sample)
        .find(|v| v.is_finite())
}

/// Sample at `index`, falling back to the series' own last valid value, then
/// to the current-instant value.
fn sample_or(samples: Option<&Vec<Option<f64>>>, index: usize, current: f64) -> f64 {
    samples
        .and_then(|s| s.get(index).copied().flatten())
        .filter(|v| v.is_finite())
        .or_else(|| last_valid(samples))
        .unwrap_or(current)
}

fn build_cluster_buckets(
    minutely: Option<&MinutelySeries>,
    current_temp_f: f64,
    current_wind_mph: f64,
    current_snowfall_in: f64,
) -> Vec<ClusterBucket> {
    let Some(minutely) = minutely.filter(|m| !m.time.is_empty()) else {
        // No minutely data at all: three identical buckets from the current
        // instant, with zero snowfall.
        return BUCKET_LABELS
            .into_iter()
            .map(|label| bucket(label, current_temp_f, 0.0, current_wind_mph))
            .collect();
    };

    // With >= 3 samples the buckets are the trailing slice of the series; the
    // past/now/next labels assume that tail straddles the present moment.
    let indices: [usize; 3] = match minutely.time.len() {
        1 => [0, 0, 0],
        2 => [0, 1, 1],
        n => [n - 3, n - 2, n - 1],
    };

    BUCKET_LABELS
        .into_iter()
        .zip(indices)
        .map(|(label, index)| {
            let temp_f = sample_or(minutely.temperature.as_ref(), index, current_temp_f);
            let snowfall_in =
                sample_or(minutely.snowfall.as_ref(), index, current_snowfall_in).max(0.0);
            let wind_mph = sample_or(minutely.wind_speed.as_ref(), index, current_wind_mph);
            bucket(label, temp_f, round2(snowfall_in), wind_mph)
        })
        .collect()
}

fn bucket(label: &str, temp_f: f64, snowfall_in: f64, wind_mph: f64) -> ClusterBucket {
    ClusterBucket {
        label: label.to_string(),
        temp_f,
        snowfall_in,
        wind_mph,
        severity: classify_severity(temp_f, snowfall_in, wind_mph),
    }
}

/// Outlook text; first matching rule wins.
fn narrative(temp_f: f64, wind_mph: f64, snowfall24h_in: f64, snowfall72h_in: f64) -> String {
    if snowfall24h_in >= 12.0 {
        "Storm cycle in full swing: over a foot of fresh snow in the last 24 hours."
    } else if snowfall24h_in >= 6.0 {
        "Strong overnight refresh with several inches of new snow."
    } else if snowfall72h_in >= 8.0 {
        "Steady multi-day accumulation is keeping coverage soft."
    } else if snowfall24h_in > 0.0 {
        "A light refresh of new snow over the last 24 hours."
    } else if temp_f <= 10.0 && wind_mph >= 20.0 {
        "Bitterly cold with strong winds; expect wind-scoured exposed terrain."
    } else if temp_f >= 32.0 {
        "Above freezing; expect firm, spring-like snow that softens through the day."
    } else {
        "No new snow recently; groomed runs and packed powder conditions."
    }
    .to_string()
}

/// Fallback snapshot served when the forecast provider is unavailable. The
/// numbers are fixed sample data; only the timestamp varies.
fn stub_snapshot(resort_slug: &str) -> ConditionsSnapshot {
    ConditionsSnapshot {
        resort_slug: resort_slug.to_string(),
        generated_at_iso: now_iso(),
        temp_f: 20.0,
        feels_like_f: 14.0,
        wind_mph: 18.0,
        gust_mph: 28.0,
        visibility_miles: 2.5,
        snowfall24h_in: 6.0,
        snowfall48h_in: 10.0,
        snowfall72h_in: 14.0,
        snow_depth_base_in: 48.0,
        snow_depth_summit_in: 72.0,
        short_text: "Live conditions are unavailable right now; showing sample data.".to_string(),
        cluster_buckets: vec![
            bucket(BUCKET_LABELS[0], 18.0, 0.05, 12.0),
            bucket(BUCKET_LABELS[1], 20.0, 0.08, 18.0),
            bucket(BUCKET_LABELS[2], 21.0, 0.12, 24.0),
        ],
    }
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
