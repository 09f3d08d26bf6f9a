//! Builder for configuring conversion services

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::{CachePolicy, ConversionService};
use crate::cache::{CacheConfig, ResponseCache};
use crate::clock::{Clock, SystemClock};
use crate::providers::{MarkdownConverter, SimulatedConverter};
use crate::{MdmintError, Result};

/// Main entry point for creating conversion services.
pub struct Mdmint;

impl Mdmint {
    /// Create a new builder for configuring the service.
    pub fn builder() -> MdmintBuilder {
        MdmintBuilder::new()
    }
}

/// Builder for configuring conversion services.
///
/// ```rust
/// # use mdmint::{CacheConfig, Mdmint};
/// # use std::time::Duration;
/// let service = Mdmint::builder()
///     .cache(CacheConfig::new().ttl(Duration::from_secs(600)))
///     .latency(Duration::from_millis(100))
///     .build()?;
/// assert_eq!(service.converter_name(), "simulated");
/// # Ok::<(), mdmint::MdmintError>(())
/// ```
pub struct MdmintBuilder {
    cache_config: CacheConfig,
    shared_cache: Option<Arc<ResponseCache>>,
    clock: Option<Arc<dyn Clock>>,
    converter: Option<Arc<dyn MarkdownConverter>>,
    latency: Option<Duration>,
    cache_policy: CachePolicy,
}

impl MdmintBuilder {
    pub fn new() -> Self {
        Self {
            cache_config: CacheConfig::default(),
            shared_cache: None,
            clock: None,
            converter: None,
            latency: None,
            cache_policy: CachePolicy::default(),
        }
    }

    /// Configure the cache the builder creates.
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Use an existing cache instead of creating one.
    ///
    /// Lets several services (or a service and its embedder) share entries.
    /// Incompatible with [`clock`](Self::clock): the shared cache already
    /// has its own.
    pub fn shared_cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.shared_cache = Some(cache);
        self
    }

    /// Set the clock used for cache timestamps (default: system clock).
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the simulated backend latency (default: 500 ms).
    ///
    /// Only applies to the built-in [`SimulatedConverter`].
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Replace the simulated backend with a custom converter.
    pub fn converter(mut self, converter: impl MarkdownConverter + 'static) -> Self {
        self.converter = Some(Arc::new(converter));
        self
    }

    /// Set which responses are written to the cache.
    ///
    /// - [`CachePolicy::SuccessOnly`]: cache successes, never failures (default)
    /// - [`CachePolicy::Disabled`]: never write
    pub fn cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    /// Build the service.
    pub fn build(self) -> Result<ConversionService> {
        let cache = match self.shared_cache {
            Some(_) if self.clock.is_some() => {
                return Err(MdmintError::Configuration(
                    "clock cannot be set together with a shared cache".to_string(),
                ));
            }
            Some(cache) => cache,
            None => {
                if self.cache_config.ttl.is_zero() {
                    return Err(MdmintError::Configuration(
                        "cache ttl must be greater than zero".to_string(),
                    ));
                }
                let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
                Arc::new(ResponseCache::with_clock(&self.cache_config, clock))
            }
        };

        let converter: Arc<dyn MarkdownConverter> = match (self.converter, self.latency) {
            (Some(_), Some(_)) => {
                return Err(MdmintError::Configuration(
                    "latency only applies to the simulated converter".to_string(),
                ));
            }
            (Some(converter), None) => converter,
            (None, Some(latency)) => Arc::new(SimulatedConverter::with_latency(latency)),
            (None, None) => Arc::new(SimulatedConverter::new()),
        };

        debug!(
            converter = converter.name(),
            ttl_ms = cache.ttl().as_millis() as u64,
            policy = ?self.cache_policy,
            "built conversion service"
        );

        Ok(ConversionService::new(cache, converter, self.cache_policy))
    }
}

impl Default for MdmintBuilder {
    fn default() -> Self {
        Self::new()
    }
}
