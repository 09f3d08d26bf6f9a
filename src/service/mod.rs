//! Cached conversion service.
//!
//! [`ConversionService`] is the single conversion entry point. A call
//! consults the [`ResponseCache`] first and returns a hit immediately,
//! without touching the backend or waiting out its latency. On a miss it
//! runs the [`MarkdownConverter`], stores the response according to the
//! [`CachePolicy`], and returns it.
//!
//! # Concurrency
//!
//! Callers for the same text that overlap share one backend call through
//! an in-flight map keyed by the full text. The backend call runs on its
//! own tokio task: once it has started it always completes and writes the
//! cache, even if every caller has gone away. Calls must therefore be made
//! from within a tokio runtime.

mod builder;
mod inflight;

pub use builder::{Mdmint, MdmintBuilder};

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures_util::FutureExt;
use tracing::{debug, instrument, warn};

use self::inflight::{InFlight, InFlightGuard, SharedConversion, Slot};
use crate::cache::ResponseCache;
use crate::providers::MarkdownConverter;
use crate::telemetry;
use crate::traits::ConversionGateway;
use crate::types::{ConversionInput, ConversionResponse};

/// Which responses the service writes to the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CachePolicy {
    /// Cache successful conversions only. Failures are returned but not
    /// stored, so a later call for the same text retries the backend.
    #[default]
    SuccessOnly,
    /// Never write to the cache. Reads still consult it, which matters only
    /// when the cache is shared with another service.
    Disabled,
}

impl CachePolicy {
    pub fn should_cache(self, response: &ConversionResponse) -> bool {
        match self {
            CachePolicy::SuccessOnly => response.success,
            CachePolicy::Disabled => false,
        }
    }
}

/// Cache-fronted conversion service.
///
/// Build one with [`Mdmint::builder()`].
pub struct ConversionService {
    cache: Arc<ResponseCache>,
    converter: Arc<dyn MarkdownConverter>,
    policy: CachePolicy,
    inflight: Arc<InFlight>,
}

impl ConversionService {
    pub(crate) fn new(
        cache: Arc<ResponseCache>,
        converter: Arc<dyn MarkdownConverter>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            cache,
            converter,
            policy,
            inflight: Arc::new(InFlight::default()),
        }
    }

    /// The cache this service reads and writes.
    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn cache_policy(&self) -> CachePolicy {
        self.policy
    }

    /// Name of the backend converter.
    pub fn converter_name(&self) -> &str {
        self.converter.name()
    }

    /// Number of distinct texts with a backend call currently running.
    pub fn in_flight(&self) -> usize {
        self.inflight.len()
    }

    /// Convert `input.text`, serving from cache when possible.
    ///
    /// Never fails: a backend error comes back as a response with
    /// `success == false` and `error` set.
    #[instrument(skip_all, fields(bytes = input.text.len()))]
    pub async fn convert_text(&self, input: &ConversionInput) -> ConversionResponse {
        if let Some(hit) = self.cache.get(&input.text) {
            debug!("cache hit, returning cached conversion");
            return hit;
        }
        debug!("cache miss, performing conversion");

        let slot = self.inflight.join_or_start(
            &input.text,
            || self.cache.peek(&input.text),
            || self.start(input.text.clone()),
        );
        match slot {
            Slot::Joined(conversion) => {
                debug!("joined conversion already in flight");
                metrics::counter!(telemetry::INFLIGHT_JOINED_TOTAL).increment(1);
                conversion.await
            }
            Slot::Started(conversion) => conversion.await,
            Slot::Cached(hit) => {
                debug!("conversion landed after cache miss, returning it");
                hit
            }
        }
    }

    /// Spawn the backend call for `text` and wrap it for sharing.
    fn start(&self, text: String) -> SharedConversion {
        let converter = Arc::clone(&self.converter);
        let cache = Arc::clone(&self.cache);
        let policy = self.policy;
        let guard = InFlightGuard::new(Arc::clone(&self.inflight), text);

        let task = tokio::spawn(async move {
            let response = run_converter(converter.as_ref(), guard.text()).await;
            if policy.should_cache(&response) {
                cache.put(guard.text(), response.clone());
            }
            // Deregister only after the cache write.
            drop(guard);
            response
        });

        async move {
            task.await.unwrap_or_else(|e| {
                warn!(error = %e, "conversion task did not complete");
                ConversionResponse::failure(format!("conversion task failed: {e}"))
            })
        }
        .boxed()
        .shared()
    }
}

#[async_trait]
impl ConversionGateway for ConversionService {
    async fn convert_text(&self, input: &ConversionInput) -> ConversionResponse {
        ConversionService::convert_text(self, input).await
    }
}

/// Invoke the backend once, recording duration and outcome.
async fn run_converter(converter: &dyn MarkdownConverter, text: &str) -> ConversionResponse {
    let name = converter.name().to_owned();
    let start = Instant::now();
    let result = converter.convert(text).await;

    metrics::histogram!(telemetry::CONVERSION_DURATION_SECONDS, "converter" => name.clone())
        .record(start.elapsed().as_secs_f64());

    match result {
        Ok(markdown) => {
            metrics::counter!(telemetry::CONVERSIONS_TOTAL,
                "converter" => name,
                "status" => "ok",
            )
            .increment(1);
            ConversionResponse::success(markdown)
        }
        Err(e) => {
            warn!(converter = %name, error = %e, "conversion failed");
            metrics::counter!(telemetry::CONVERSIONS_TOTAL,
                "converter" => name,
                "status" => "error",
            )
            .increment(1);
            ConversionResponse::failure(e.to_string())
        }
    }
}
