//! # Bookshelf Test Utilities
//!
//! Shared test utilities for the Bookshelf service.
//!
//! This crate provides:
//! - Basic-auth token fixtures and fixed test users
//! - An in-memory `UserLookup` that counts store round trips
//! - Server test harness (`TestBookshelfServer` for E2E tests)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bs_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> anyhow::Result<()> {
//!     let users = Arc::new(InMemoryUserLookup::with_test_users());
//!     let server = TestBookshelfServer::spawn(users.clone()).await?;
//!
//!     let response = server
//!         .client()
//!         .get(format!("{}/api/v1/me", server.url()))
//!         .header("Authorization", basic_header(ALICE_NAME, ALICE_PASSWORD))
//!         .send()
//!         .await?;
//!
//!     assert_eq!(response.status(), 200);
//!     assert_eq!(users.lookup_count(), 1);
//!     Ok(())
//! }
//! ```

pub mod fixtures;
pub mod mock_user_lookup;
pub mod server_harness;

// Re-export commonly used items
pub use fixtures::*;
pub use mock_user_lookup::*;
pub use server_harness::*;
