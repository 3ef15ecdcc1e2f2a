use crate::collector::{MintCollector, Result};
use chrono::{DateTime, Duration, Utc};
use helius_client::MintRecord;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

/// Cached collection result. Mutated only by a full replace after a
/// successful collection pass.
#[derive(Debug, Clone, Default)]
pub struct CacheState {
    pub records: Vec<MintRecord>,
    pub last_refresh: Option<DateTime<Utc>>,
}

/// Freshness-windowed cache over the collector.
///
/// The state is FRESH while the last refresh is inside the window and the
/// record list is non-empty; otherwise it is STALE and the next `get`
/// triggers a collection pass. The refresh mutex makes the refresh
/// single-flight: concurrent stale callers queue on it and are satisfied by
/// the re-check instead of starting their own pass. A failed pass leaves the
/// previous records and timestamp untouched.
pub struct MintCache {
    refresh_window: Duration,
    state: RwLock<CacheState>,
    refresh_lock: Mutex<()>,
}

impl MintCache {
    pub fn new(refresh_seconds: u64) -> Self {
        Self {
            refresh_window: Duration::seconds(refresh_seconds as i64),
            state: RwLock::new(CacheState::default()),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Return the cached records, refreshing through the collector first if
    /// the cache is stale. The boolean is true when served from cache.
    pub async fn get(&self, collector: &MintCollector) -> Result<(Vec<MintRecord>, bool)> {
        if let Some(records) = self.fresh_records().await {
            debug!("Serving cached mints");
            return Ok((records, true));
        }

        let _refresh = self.refresh_lock.lock().await;

        // A concurrent caller may have finished a refresh while this one
        // waited for the lock
        if let Some(records) = self.fresh_records().await {
            debug!("Serving mints refreshed by a concurrent request");
            return Ok((records, true));
        }

        info!("Cache stale, fetching new mints");
        let records = collector.collect().await?;

        let mut state = self.state.write().await;
        *state = CacheState {
            records: records.clone(),
            last_refresh: Some(Utc::now()),
        };

        Ok((records, false))
    }

    /// Current cache contents without triggering a refresh
    pub async fn snapshot(&self) -> CacheState {
        self.state.read().await.clone()
    }

    async fn fresh_records(&self) -> Option<Vec<MintRecord>> {
        let state = self.state.read().await;
        let last_refresh = state.last_refresh?;

        if Utc::now() - last_refresh < self.refresh_window && !state.records.is_empty() {
            Some(state.records.clone())
        } else {
            None
        }
    }
}
