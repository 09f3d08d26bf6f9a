//! Time-bounded response cache for conversions.
//!
//! [`ResponseCache`] maps a [`CacheKey`] derived from the input text to the
//! last response stored for it plus the wall-clock millisecond at which it
//! was stored.
//!
//! # Expiry
//!
//! Expiry is lazy. Nothing sweeps the map in the background; a read that
//! finds an entry older than the TTL deletes it and reports a miss. An
//! entry read at exactly `stored_at + ttl` is still served.
//!
//! # Ownership
//!
//! The cache is an explicit dependency, not a process-wide singleton.
//! Whoever composes a [`ConversionService`](crate::ConversionService)
//! creates one (or lets the builder create one) and may share it between
//! services through an `Arc`. Its lifetime is that of its last owner.
//!
//! # Concurrency
//!
//! The map sits behind a `std::sync::Mutex` held only for the map operation
//! itself, never across an await. Concurrent `put`s for one key are
//! last-write-wins. Collapsing duplicate concurrent conversions is the
//! service's job, not the cache's.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::debug;

use super::key::{CacheKey, hash_text};
use crate::clock::{Clock, SystemClock};
use crate::telemetry;
use crate::types::ConversionResponse;

/// Default time-to-live for cached responses: one hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Configuration for the response cache.
///
/// ```rust
/// # use mdmint::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new().ttl(Duration::from_secs(600));
/// assert_eq!(config.ttl, Duration::from_secs(600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Time-to-live for cached entries. Default: 1 hour.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    response: ConversionResponse,
    stored_at_millis: u64,
}

/// In-memory TTL cache of conversion responses.
pub struct ResponseCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    ttl_millis: u64,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    /// Create a cache reading the system clock.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a cache reading an injected clock.
    pub fn with_clock(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl_millis: u64::try_from(config.ttl.as_millis()).unwrap_or(u64::MAX),
            clock,
        }
    }

    /// The configured time-to-live.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_millis)
    }

    /// Look up the response cached for `text`.
    ///
    /// Returns `None` when nothing is stored under the text's key, or when
    /// the stored entry has outlived the TTL (the entry is deleted).
    /// Emits cache hit/miss metrics.
    pub fn get(&self, text: &str) -> Option<ConversionResponse> {
        let key = hash_text(text);
        let now = self.clock.now_millis();
        let mut entries = self.lock();

        let Some(entry) = entries.get(&key) else {
            metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
            return None;
        };

        let age = now.saturating_sub(entry.stored_at_millis);
        if age > self.ttl_millis {
            entries.remove(&key);
            debug!(key = %key, age_ms = age, "evicted expired conversion");
            metrics::counter!(telemetry::CACHE_EXPIRED_TOTAL).increment(1);
            metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
            return None;
        }

        metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
        Some(entry.response.clone())
    }

    /// Fresh response for `text` without evicting or emitting metrics.
    pub fn peek(&self, text: &str) -> Option<ConversionResponse> {
        let now = self.clock.now_millis();
        self.lock()
            .get(&hash_text(text))
            .filter(|entry| now.saturating_sub(entry.stored_at_millis) <= self.ttl_millis)
            .map(|entry| entry.response.clone())
    }

    /// Store `response` for `text`, replacing whatever shared its key.
    pub fn put(&self, text: &str, response: ConversionResponse) {
        let entry = CacheEntry {
            response,
            stored_at_millis: self.clock.now_millis(),
        };
        self.lock().insert(hash_text(text), entry);
    }

    /// Number of entries currently held, stale ones included.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evict all entries.
    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panic while holding the lock cannot leave the map half-updated:
    // every critical section is a single HashMap call.
    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
