//! Simulated converter backend.
//!
//! Stands in for a remote model call: waits a fixed latency, then renders
//! the text locally with [`to_markdown`]. The wait is a placeholder for
//! network time, not a retry or backoff.

use std::time::Duration;

use async_trait::async_trait;

use super::MarkdownConverter;
use crate::Result;
use crate::convert::to_markdown;

/// Default simulated round-trip latency.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

/// Converter that sleeps for a fixed latency and never fails.
#[derive(Debug, Clone)]
pub struct SimulatedConverter {
    latency: Duration,
}

impl SimulatedConverter {
    pub fn new() -> Self {
        Self::with_latency(DEFAULT_LATENCY)
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

impl Default for SimulatedConverter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarkdownConverter for SimulatedConverter {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn convert(&self, text: &str) -> Result<String> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(to_markdown(text))
    }
}
