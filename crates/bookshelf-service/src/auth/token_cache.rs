//! Time-bounded cache of authenticated tokens.
//!
//! Maps an authentication token to the [`Principal`] it resolved to. Each
//! entry lives for a fixed TTL counted from its last `put`; reads never
//! extend it. Expired entries are invisible to every read even before they
//! are physically removed, which happens lazily on `put` once the map grows
//! past a purge watermark, or when `purge_expired` is called (see the
//! sweeper task).
//!
//! Time is read from the tokio clock, so a paused test runtime controls
//! expiry.

use super::Principal;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Default entry time-to-live in seconds.
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 20;

/// Lowest map size at which `put` also drops expired entries.
const PURGE_ON_PUT_THRESHOLD: usize = 1024;

struct CacheEntry {
    principal: Principal,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

struct CacheState {
    entries: HashMap<String, CacheEntry>,
    /// Map size that triggers the next purge on `put`. Doubles past the
    /// surviving entry count so a map of live tokens is not rescanned on
    /// every insert.
    next_purge_at: usize,
}

impl CacheState {
    fn retain_live(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now));
        self.next_purge_at = PURGE_ON_PUT_THRESHOLD.max(self.entries.len().saturating_mul(2));
        before - self.entries.len()
    }
}

/// Concurrent token → principal cache with passive expiry.
///
/// Reads share the lock; `put`, `remove` and `purge_expired` take it
/// exclusively. Callers never hold the lock across an await point outside
/// this type, so a slow credential lookup cannot block the cache.
pub struct TokenCache {
    state: RwLock<CacheState>,
    ttl: Duration,
}

impl TokenCache {
    /// Create an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            state: RwLock::new(CacheState {
                entries: HashMap::new(),
                next_purge_at: PURGE_ON_PUT_THRESHOLD,
            }),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// True iff `token` has an entry that has not expired.
    pub async fn contains(&self, token: &str) -> bool {
        let now = Instant::now();
        let state = self.state.read().await;
        state.entries.get(token).is_some_and(|entry| entry.is_live(now))
    }

    /// The principal cached for `token`, if the entry has not expired.
    pub async fn get(&self, token: &str) -> Option<Principal> {
        let now = Instant::now();
        let state = self.state.read().await;
        state
            .entries
            .get(token)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.principal.clone())
    }

    /// Insert or overwrite the entry for `token`, expiring `ttl` from now.
    pub async fn put(&self, token: impl Into<String>, principal: Principal) {
        let now = Instant::now();
        let mut state = self.state.write().await;

        if state.entries.len() >= state.next_purge_at {
            let purged = state.retain_live(now);
            tracing::debug!(
                target: "bs.auth.cache",
                purged = purged,
                remaining = state.entries.len(),
                next_purge_at = state.next_purge_at,
                "Purged expired tokens on insert"
            );
        }

        state.entries.insert(
            token.into(),
            CacheEntry {
                principal,
                expires_at: now + self.ttl,
            },
        );
    }

    /// Drop the entry for `token`. Returns the principal if it was live.
    pub async fn remove(&self, token: &str) -> Option<Principal> {
        let now = Instant::now();
        let mut state = self.state.write().await;
        state
            .entries
            .remove(token)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.principal)
    }

    /// Physically remove every expired entry. Returns how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut state = self.state.write().await;
        state.retain_live(now)
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let state = self.state.read().await;
        state.entries.values().filter(|entry| entry.is_live(now)).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TOKEN_TTL_SECONDS))
    }
}
