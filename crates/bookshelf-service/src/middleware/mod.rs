//! Middleware for the Bookshelf service.

pub mod auth;
pub mod http_metrics;
pub mod request_logging;

pub use auth::{require_auth, require_roles, AllowedRoles, AuthState};
pub use http_metrics::http_metrics_middleware;
pub use request_logging::request_logging_middleware;
