//! In-memory cache store for upstream API responses
//!
//! Provides a `Cache` that keeps JSON-encoded values with the time they were
//! stored. Lookups older than the TTL read as absent, but the stale entry stays
//! in the map until the key is written again.

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::clock::{Clock, SystemClock};

/// Default time-to-live for cached responses in seconds (5 minutes)
pub const DEFAULT_TTL_SECS: i64 = 300;

/// A single cached value
#[derive(Debug, Clone)]
struct CacheEntry {
    /// The cached value, stored as JSON so any record type can share the map
    value: Value,
    /// When the value was written
    stored_at: DateTime<Utc>,
}

/// Shared, process-wide response cache
///
/// Cloning is cheap and every clone sees the same entries, so one cache created
/// by the composition root can be handed to each client. There is no capacity
/// limit and no active eviction.
#[derive(Debug, Clone)]
pub struct Cache {
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

impl Cache {
    /// Creates a cache on the system clock with the default 5 minute TTL
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock), Duration::seconds(DEFAULT_TTL_SECS))
    }

    /// Creates a cache with a custom clock and TTL
    ///
    /// Useful for testing expiry without waiting on the wall clock.
    pub fn with_clock(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            clock,
            ttl,
        }
    }

    /// The clock this cache measures freshness with
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// The configured time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Reads a fresh value from the cache
    ///
    /// # Returns
    /// * `Some(T)` if the entry exists, was stored less than one TTL ago and
    ///   decodes as `T`
    /// * `None` otherwise; an expired entry is left in place
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = {
            let entries = self.lock();
            let entry = entries.get(key)?;
            if self.clock.now() - entry.stored_at >= self.ttl {
                tracing::debug!(key, "cache entry stale");
                return None;
            }
            entry.value.clone()
        };

        match serde_json::from_value(value) {
            Ok(data) => {
                tracing::debug!(key, "cache hit");
                Some(data)
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "cached value has unexpected shape");
                None
            }
        }
    }

    /// Writes a value, replacing any previous entry for `key`
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, data: &T) {
        let value = match serde_json::to_value(data) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to encode value for cache");
                return;
            }
        };

        let entry = CacheEntry {
            value,
            stored_at: self.clock.now(),
        };
        self.lock().insert(key.to_string(), entry);
    }

    /// Whether any entry, fresh or stale, occupies `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    /// Number of entries held, including stale ones
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
