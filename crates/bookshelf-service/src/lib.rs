//! Bookshelf Service Library
//!
//! A small HTTP API over authors and books, protected by HTTP Basic
//! authentication with a short-lived token cache in front of the user
//! store:
//!
//! - Author and book CRUD under `/api/v1`
//! - Role-based access (`user`, `admin`) per resource
//! - A TTL cache so repeated requests with the same credentials skip the
//!   database lookup
//!
//! # Architecture
//!
//! ```text
//! routes/mod.rs -> middleware/auth.rs -> handlers/*.rs -> repositories/*.rs
//!                         |
//!                    auth/gate.rs -> auth/token_cache.rs
//!                                 -> auth/verifier.rs -> UserLookup
//! ```
//!
//! # Modules
//!
//! - `auth` - Token cache, credential verifier, authorization gate
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - Authentication, role checks, request logging, metrics
//! - `models` - Data models
//! - `observability` - Prometheus metrics and log fingerprints
//! - `repositories` - Database access
//! - `routes` - Axum router setup
//! - `tasks` - Background tasks

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod tasks;

/// Schema migrations embedded from `migrations/`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();
