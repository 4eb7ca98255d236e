//! Request-collapsing TTL cache in front of the forecast client
//!
//! Entries are keyed by normalized coordinates only, so one entry serves all
//! conditions needs for a position. For any key at most one upstream fetch is
//! in flight at a time; concurrent callers share its outcome. Only successful
//! responses occupy entries, so a failed fetch is retried on the very next
//! request instead of staying sticky for a TTL window.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use super::ForecastFetcher;
use super::open_meteo::RawForecastResponse;

type SharedFetch = Shared<BoxFuture<'static, Option<Arc<RawForecastResponse>>>>;

/// Cached upstream response; never mutated in place, hits hand out a clone of
/// the `Arc`.
struct CacheEntry {
    value: Arc<RawForecastResponse>,
    expires_at: Instant,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    /// Keys in insertion order, oldest first, for FIFO eviction
    insertion_order: VecDeque<String>,
    in_flight: HashMap<String, SharedFetch>,
}

/// Time-bounded, capacity-bounded forecast cache
pub struct ForecastCache {
    fetcher: Arc<dyn ForecastFetcher>,
    ttl: Duration,
    capacity: usize,
    state: Arc<Mutex<CacheState>>,
}

/// Normalized cache key: latitude/longitude at 4 decimal places (~11 m),
/// elevation to the nearest meter or omitted. Requests for the same resort
/// must land on the same key even with floating-point jitter.
#[must_use]
pub fn cache_key(latitude: f64, longitude: f64, elevation_meters: Option<f64>) -> String {
    match elevation_meters.filter(|e| e.is_finite()) {
        Some(elevation) => format!("{latitude:.4}:{longitude:.4}:{elevation:.0}"),
        None => format!("{latitude:.4}:{longitude:.4}"),
    }
}

impl ForecastCache {
    pub fn new(fetcher: Arc<dyn ForecastFetcher>, ttl: Duration, capacity: usize) -> Self {
        Self {
            fetcher,
            ttl,
            capacity: capacity.max(1),
            state: Arc::new(Mutex::new(CacheState::default())),
        }
    }

    /// Cached response for the coordinate, fetching through the upstream
    /// client on a miss. Concurrent callers for one key collapse onto a
    /// single upstream call and observe its outcome, success or failure.
    pub async fn get_or_fetch(
        &self,
        latitude: f64,
        longitude: f64,
        elevation_meters: Option<f64>,
    ) -> Option<Arc<RawForecastResponse>> {
        let key = cache_key(latitude, longitude, elevation_meters);

        let fetch = {
            let mut state = self.state.lock().await;

            if let Some(entry) = state.entries.get(&key) {
                if entry.expires_at > Instant::now() {
                    debug!("forecast cache hit for {key}");
                    return Some(entry.value.clone());
                }
                // Expired entries count as absent
                state.entries.remove(&key);
            }

            if let Some(fetch) = state.in_flight.get(&key) {
                debug!("joining in-flight forecast fetch for {key}");
                fetch.clone()
            } else {
                debug!("forecast cache miss for {key}");
                let fetch = self.start_fetch(key.clone(), latitude, longitude, elevation_meters);
                state.in_flight.insert(key, fetch.clone());
                fetch
            }
            // The lock drops here; it is never held across the fetch await.
        };

        fetch.await
    }

    fn start_fetch(
        &self,
        key: String,
        latitude: f64,
        longitude: f64,
        elevation_meters: Option<f64>,
    ) -> SharedFetch {
        let fetcher = self.fetcher.clone();
        let state = self.state.clone();
        let ttl = self.ttl;
        let capacity = self.capacity;

        async move {
            let fetched = fetcher
                .fetch_forecast(latitude, longitude, elevation_meters)
                .await
                .map(Arc::new);

            let mut state = state.lock().await;
            // The in-flight record goes away on settle regardless of outcome,
            // so the next caller gets a fresh attempt after a failure.
            state.in_flight.remove(&key);

            if let Some(value) = &fetched {
                store(&mut state, key, value.clone(), ttl, capacity);
            }

            fetched
        }
        .boxed()
        .shared()
    }
}

fn store(
    state: &mut CacheState,
    key: String,
    value: Arc<RawForecastResponse>,
    ttl: Duration,
    capacity: usize,
) {
    let now = Instant::now();
    let CacheState {
        entries,
        insertion_order,
        ..
    } = state;

    // Sweep expired entries before enforcing the capacity bound, and drop any
    // stale queue slot for this key so a re-insert cannot be evicted by its
    // own earlier position.
    entries.retain(|_, entry| entry.expires_at > now);
    insertion_order.retain(|queued| queued != &key && entries.contains_key(queued));

    entries.insert(
        key.clone(),
        CacheEntry {
            value,
            expires_at: now + ttl,
        },
    );
    insertion_order.push_back(key);

    while entries.len() > capacity {
        let Some(oldest) = insertion_order.pop_front() else {
            break;
        };
        debug!("evicting oldest forecast cache entry {oldest}");
        entries.remove(&oldest);
    }
}
