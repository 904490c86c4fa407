//! In-memory resolution cache.
//!
//! Stores raw provider payloads keyed by `LookupKey`. Entries expire lazily:
//! an entry older than the TTL is evicted by the read that finds it.
//! No size bound, no persistence.

use super::types::LookupKey;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

/// One year.
pub const DEFAULT_TTL: Duration = Duration::from_secs(365 * 24 * 3600);

/// Millisecond wall clock.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to (for testing).
#[derive(Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self { now: AtomicI64::new(start_millis) }
    }

    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as i64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct CacheEntry {
    value: Value,
    fetched_at: i64,
}

/// The resolution cache. Shared between the lookup path and fetch completions.
pub struct ResolutionCache {
    ttl_ms: i64,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<LookupKey, CacheEntry>>,
}

impl ResolutionCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create a cache driven by a specific clock (for testing).
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl_ms: ttl.as_millis().min(i64::MAX as u128) as i64,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<LookupKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Look up a payload. Returns None if missing or expired.
    pub fn get(&self, key: &LookupKey) -> Option<Value> {
        let now = self.clock.now_millis();
        let mut entries = self.lock();
        let fetched_at = entries.get(key)?.fetched_at;

        if now - fetched_at > self.ttl_ms {
            debug!(%key, "cache entry expired");
            entries.remove(key);
            return None;
        }

        entries.get(key).map(|e| e.value.clone())
    }

    /// Store a payload, overwriting any previous entry.
    pub fn set(&self, key: LookupKey, value: Value) {
        let entry = CacheEntry {
            value,
            fetched_at: self.clock.now_millis(),
        };
        self.lock().insert(key, entry);
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
