//! In-memory user store for tests.

use crate::fixtures::*;
use async_trait::async_trait;
use bookshelf_service::auth::UserLookup;
use bookshelf_service::errors::BsError;
use bookshelf_service::models::UserRecord;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// `UserLookup` over a fixed set of users.
///
/// Counts every lookup so tests can assert how often the gate reached the
/// store. Can be switched into a failing mode to simulate an outage.
#[derive(Default)]
pub struct InMemoryUserLookup {
    users: HashMap<(String, String), UserRecord>,
    lookups: AtomicUsize,
    failing: AtomicBool,
    latency: Option<Duration>,
}

impl InMemoryUserLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// alice (`user`), bob (`user`) and root (`admin`).
    pub fn with_test_users() -> Self {
        Self::new()
            .with_user(ALICE_ID, ALICE_NAME, ALICE_PASSWORD, ROLE_USER)
            .with_user(BOB_ID, BOB_NAME, BOB_PASSWORD, ROLE_USER)
            .with_user(ROOT_ID, ROOT_NAME, ROOT_PASSWORD, ROLE_ADMIN)
    }

    pub fn with_user(mut self, id: i32, name: &str, password: &str, role: &str) -> Self {
        self.users.insert(
            (name.to_string(), password.to_string()),
            UserRecord {
                id,
                name: name.to_string(),
                role: role.to_string(),
            },
        );
        self
    }

    /// Delay every lookup, to widen race windows in concurrency tests.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every subsequent lookup fail with a database error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of lookups performed so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserLookup for InMemoryUserLookup {
    async fn lookup(&self, username: &str, password: &str) -> Result<Option<UserRecord>, BsError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(BsError::Database("simulated outage".to_string()));
        }

        Ok(self
            .users
            .get(&(username.to_string(), password.to_string()))
            .cloned())
    }
}
