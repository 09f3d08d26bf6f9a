//! In-flight conversion tracking.
//!
//! Concurrent callers asking for the same text share one backend call.
//! Entries are keyed by the full input text rather than its
//! [`CacheKey`](crate::cache::CacheKey): two texts that alias in the cache
//! still get their own conversion.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::future::{BoxFuture, Shared};

use crate::types::ConversionResponse;

/// A conversion that any number of callers can await.
pub(crate) type SharedConversion = Shared<BoxFuture<'static, ConversionResponse>>;

#[derive(Default)]
pub(crate) struct InFlight {
    pending: Mutex<HashMap<String, SharedConversion>>,
}

/// Outcome of [`InFlight::join_or_start`].
pub(crate) enum Slot {
    /// A conversion another caller started.
    Joined(SharedConversion),
    /// A conversion this caller started.
    Started(SharedConversion),
    /// The cache was filled after the caller's miss.
    Cached(ConversionResponse),
}

impl InFlight {
    /// Return the conversion already running for `text`, or register the
    /// one produced by `start`.
    ///
    /// `cached` is consulted under the map lock before starting. A
    /// conversion writes the cache before it deregisters, so a caller that
    /// missed the cache just before that write finds the result here
    /// instead of starting a second backend call. `start` runs under the
    /// map lock, so it must not block.
    pub(crate) fn join_or_start(
        &self,
        text: &str,
        cached: impl FnOnce() -> Option<ConversionResponse>,
        start: impl FnOnce() -> SharedConversion,
    ) -> Slot {
        let mut pending = self.lock();
        if let Some(existing) = pending.get(text) {
            return Slot::Joined(existing.clone());
        }
        if let Some(hit) = cached() {
            return Slot::Cached(hit);
        }
        let conversion = start();
        pending.insert(text.to_owned(), conversion.clone());
        Slot::Started(conversion)
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    fn remove(&self, text: &str) {
        self.lock().remove(text);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SharedConversion>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Deregisters a text from the in-flight map when dropped.
///
/// Owned by the backend task, so the entry goes away after the cache write
/// or if the task panics.
pub(crate) struct InFlightGuard {
    inflight: Arc<InFlight>,
    text: String,
}

impl InFlightGuard {
    pub(crate) fn new(inflight: Arc<InFlight>, text: String) -> Self {
        Self { inflight, text }
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.inflight.remove(&self.text);
    }
}
