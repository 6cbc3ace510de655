//! Token cache sweeper background task.
//!
//! Expired tokens are already invisible to readers; this task only bounds
//! memory by physically removing them at a fixed interval.
//!
//! # Graceful Shutdown
//!
//! The task exits when its cancellation token is cancelled. A sweep in
//! progress is finished first.

use crate::auth::TokenCache;
use crate::observability::metrics::record_token_cache_sweep;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Start the token cache sweeper.
///
/// Runs `purge_expired` every `interval` until `cancel_token` fires.
#[instrument(skip_all, name = "bs.task.token_sweeper")]
pub async fn start_token_cache_sweeper(
    cache: Arc<TokenCache>,
    interval: Duration,
    cancel_token: CancellationToken,
) {
    info!(
        target: "bs.task.token_sweeper",
        interval_secs = interval.as_secs(),
        ttl_secs = cache.ttl().as_secs(),
        "Starting token cache sweeper"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                run_sweep(&cache).await;
            }
            _ = cancel_token.cancelled() => {
                info!(
                    target: "bs.task.token_sweeper",
                    "Token cache sweeper received shutdown signal, exiting"
                );
                break;
            }
        }
    }

    info!(target: "bs.task.token_sweeper", "Token cache sweeper stopped");
}

/// Run a single sweep. Returns the number of entries removed.
pub(crate) async fn run_sweep(cache: &TokenCache) -> usize {
    let purged = cache.purge_expired().await;
    let live = cache.len().await;

    if purged > 0 {
        debug!(
            target: "bs.task.token_sweeper",
            purged,
            live,
            "Purged expired tokens"
        );
    }
    record_token_cache_sweep(purged, live);

    purged
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::auth::{Principal, Role};

    fn principal(id: i32) -> Principal {
        Principal::new(id, format!("user{}", id), Role::User)
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_sweep_removes_only_expired() {
        let cache = TokenCache::new(Duration::from_secs(20));
        cache.put("old", principal(1)).await;
        tokio::time::advance(Duration::from_secs(15)).await;
        cache.put("fresh", principal(2)).await;
        tokio::time::advance(Duration::from_secs(6)).await;

        assert_eq!(run_sweep(&cache).await, 1);
        assert!(cache.contains("fresh").await);
        assert_eq!(run_sweep(&cache).await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_purges_on_interval() {
        let cache = Arc::new(TokenCache::new(Duration::from_secs(5)));
        cache.put("a", principal(1)).await;
        cache.put("b", principal(2)).await;

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(start_token_cache_sweeper(
            cache.clone(),
            Duration::from_secs(10),
            cancel_token.clone(),
        ));

        // The tick at t=10 fires while this sleep is pending.
        tokio::time::sleep(Duration::from_secs(11)).await;

        assert_eq!(cache.purge_expired().await, 0, "sweeper should have purged");

        cancel_token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_stops_on_cancel() {
        let cache = Arc::new(TokenCache::default());
        let cancel_token = CancellationToken::new();

        let handle = tokio::spawn(start_token_cache_sweeper(
            cache,
            Duration::from_secs(60),
            cancel_token.clone(),
        ));

        cancel_token.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper should exit promptly")
            .unwrap();
    }
}
