//! Metrics definitions for the Bookshelf service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `bs_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `method`: HTTP methods
//! - `endpoint`: parameterized paths (ids replaced by `{id}`)
//! - `outcome`: 5 values (authorized, missing_token, malformed_token,
//!   invalid_credentials, lookup_failure)
//! - `source`: 3 values (none, cache, verifier)

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Install the global Prometheus recorder.
///
/// Fails if a recorder is already installed in this process.
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("bs_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 2.500, 5.000, 10.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion
///
/// Metric: `bs_http_requests_total`, `bs_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status_code`
pub fn record_http_request(method: &str, path: &str, status_code: u16, duration: Duration) {
    let endpoint = normalize_endpoint(path);

    histogram!("bs_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => endpoint.clone()
    )
    .record(duration.as_secs_f64());

    counter!("bs_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Replace numeric path segments with `{id}`.
///
/// Paths outside the API and the operational endpoints collapse to `/other`.
pub(crate) fn normalize_endpoint(path: &str) -> String {
    match path {
        "/health" | "/ready" | "/metrics" => return path.to_string(),
        _ if !path.starts_with("/api/v1/") => return "/other".to_string(),
        _ => {}
    }

    path.split('/')
        .map(|segment| {
            if !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()) {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

// ============================================================================
// Authentication Metrics
// ============================================================================

/// Record one authorization decision.
///
/// Metric: `bs_auth_decisions_total`
/// Labels: `outcome`, `source`
pub fn record_auth_decision(outcome: &str, source: &str) {
    counter!("bs_auth_decisions_total",
        "outcome" => outcome.to_string(),
        "source" => source.to_string()
    )
    .increment(1);
}

// ============================================================================
// Token Cache Metrics
// ============================================================================

/// Record a sweep of the token cache.
///
/// Metric: `bs_token_cache_purged_total`, `bs_token_cache_entries`
pub fn record_token_cache_sweep(purged: usize, live_entries: usize) {
    counter!("bs_token_cache_purged_total").increment(purged as u64);
    gauge!("bs_token_cache_entries").set(live_entries as f64);
}
