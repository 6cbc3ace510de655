//! Database access layer.
//!
//! Free functions over a `PgPool`, one module per table family.

pub mod authors;
pub mod books;
pub mod users;

pub use users::PgUserLookup;
