//! Telemetry metric name constants.
//!
//! Centralised metric names for mdmint operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `mdmint_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `converter`: backend name (e.g. "simulated")
//! - `status`: outcome: "ok" or "error"

/// Total backend conversions (cache hits are not counted).
///
/// Labels: `converter`, `status` ("ok" | "error").
pub const CONVERSIONS_TOTAL: &str = "mdmint_conversions_total";

/// Backend conversion duration in seconds, simulated latency included.
///
/// Labels: `converter`.
pub const CONVERSION_DURATION_SECONDS: &str = "mdmint_conversion_duration_seconds";

/// Total response cache hits.
pub const CACHE_HITS_TOTAL: &str = "mdmint_cache_hits_total";

/// Total response cache misses, expired entries included.
pub const CACHE_MISSES_TOTAL: &str = "mdmint_cache_misses_total";

/// Total entries evicted on read because their TTL had elapsed.
pub const CACHE_EXPIRED_TOTAL: &str = "mdmint_cache_expired_total";

/// Total calls that joined a conversion already in flight for the same text.
pub const INFLIGHT_JOINED_TOTAL: &str = "mdmint_inflight_joined_total";
