//! HTTP request handlers for the Bookshelf service.

pub mod authors;
pub mod books;
pub mod health;
pub mod me;
pub mod metrics;
pub mod options;

pub use health::{health_check, readiness_check};
pub use me::get_me;
pub use metrics::metrics_handler;
pub use options::ResourceOptions;
