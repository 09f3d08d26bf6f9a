//! Tests for metrics integration.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};

use mdmint::cache::DEFAULT_TTL;
use mdmint::{
    ConversionInput, ManualClock, MarkdownConverter, Mdmint, MdmintError, Result, telemetry,
};

// ============================================================================
// Mock converters
// ============================================================================

struct FailingConverter;

#[async_trait]
impl MarkdownConverter for FailingConverter {
    fn name(&self) -> &str {
        "failing"
    }

    async fn convert(&self, _text: &str) -> Result<String> {
        Err(MdmintError::Conversion("backend unavailable".into()))
    }
}

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Runs `f` on a fresh current-thread runtime inside a local recorder scope.
///
/// The service emits backend metrics from a spawned task; a current-thread
/// runtime keeps that task on the thread the local recorder is bound to.
fn record<F, Fut>(f: F) -> SnapshotVec
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ()>,
{
    let recorder = DebuggingRecorder::new();
    let snapshotter: Snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap()
            .block_on(f())
    });

    snapshotter.snapshot().into_vec()
}

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Sum counter values for `name` carrying the label `label=value`.
fn counter_with_label(snapshot: &SnapshotVec, name: &str, label: &str, value: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| {
            key.kind() == MetricKind::Counter
                && key.key().name() == name
                && key
                    .key()
                    .labels()
                    .any(|l| l.key() == label && l.value() == value)
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Check if any histogram entries exist for a given metric name.
fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn miss_then_hit_records_cache_and_conversion_metrics() {
    let snapshot = record(|| async {
        let service = Mdmint::builder().latency(Duration::ZERO).build().unwrap();
        let input = ConversionInput::new("hello");
        service.convert_text(&input).await;
        service.convert_text(&input).await;
    });

    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL), 1);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::CONVERSIONS_TOTAL, "status", "ok"),
        1
    );
    assert_eq!(
        counter_with_label(
            &snapshot,
            telemetry::CONVERSIONS_TOTAL,
            "converter",
            "simulated"
        ),
        1
    );
    assert!(
        has_histogram(&snapshot, telemetry::CONVERSION_DURATION_SECONDS),
        "expected a duration histogram entry"
    );
}

#[test]
fn failed_conversion_records_error_status() {
    let snapshot = record(|| async {
        let service = Mdmint::builder()
            .converter(FailingConverter)
            .build()
            .unwrap();
        let response = service.convert_text(&ConversionInput::new("x")).await;
        assert!(!response.success);
    });

    assert_eq!(
        counter_with_label(&snapshot, telemetry::CONVERSIONS_TOTAL, "status", "error"),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::CONVERSIONS_TOTAL, "status", "ok"),
        0
    );
    assert!(has_histogram(
        &snapshot,
        telemetry::CONVERSION_DURATION_SECONDS
    ));
}

#[test]
fn expired_entry_is_counted() {
    let snapshot = record(|| async {
        let clock = Arc::new(ManualClock::new(0));
        let service = Mdmint::builder()
            .clock(clock.clone())
            .latency(Duration::ZERO)
            .build()
            .unwrap();
        let input = ConversionInput::new("stale");
        service.convert_text(&input).await;
        clock.advance(DEFAULT_TTL + Duration::from_millis(1));
        service.convert_text(&input).await;
    });

    assert_eq!(counter_total(&snapshot, telemetry::CACHE_EXPIRED_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 2);
    assert_eq!(counter_total(&snapshot, telemetry::CONVERSIONS_TOTAL), 2);
}

#[test]
fn joined_conversion_is_counted() {
    let snapshot = record(|| async {
        let service = Mdmint::builder()
            .latency(Duration::from_millis(20))
            .build()
            .unwrap();
        let input = ConversionInput::new("shared");
        tokio::join!(service.convert_text(&input), service.convert_text(&input));
    });

    assert_eq!(
        counter_total(&snapshot, telemetry::INFLIGHT_JOINED_TOTAL),
        1
    );
    assert_eq!(counter_total(&snapshot, telemetry::CONVERSIONS_TOTAL), 1);
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let service = Mdmint::builder().latency(Duration::ZERO).build().unwrap();
    let response = service.convert_text(&ConversionInput::new("hello")).await;
    assert!(response.success);
}
