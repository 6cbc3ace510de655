//! Query options accepted by every resource endpoint.

use serde::Deserialize;
use std::time::Duration;

/// `?delay=N&logging=true`
///
/// Unknown parameters (such as a query-string token) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceOptions {
    /// Seconds to wait before handling, to simulate a slow backend.
    #[serde(default)]
    pub delay: Option<u64>,

    /// Append an audit row after a create or update.
    #[serde(default)]
    pub logging: bool,
}

impl ResourceOptions {
    /// Requested delay capped at `max_seconds`. Zero means no delay.
    pub fn effective_delay(&self, max_seconds: u64) -> Option<Duration> {
        self.delay
            .map(|seconds| seconds.min(max_seconds))
            .filter(|seconds| *seconds > 0)
            .map(Duration::from_secs)
    }

    pub async fn apply_delay(&self, max_seconds: u64) {
        if let Some(delay) = self.effective_delay(max_seconds) {
            tracing::debug!(
                target: "bs.handlers",
                delay_secs = delay.as_secs(),
                "Delaying response"
            );
            tokio::time::sleep(delay).await;
        }
    }
}
