//! Data models for the Bookshelf service.
//!
//! Authors and books travel over the wire as camelCase JSON, matching the
//! column-to-field mapping used by existing clients.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User row returned by a credential lookup (maps to `users`).
///
/// The password column is matched in SQL and never loaded.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserRecord {
    pub id: i32,
    pub name: String,
    pub role: String,
}

/// Author entity (maps to `authors`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    /// Assigned by the database; ignored on create, overridden by the path on update.
    #[serde(default)]
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub age: i32,
    #[serde(default)]
    pub salary: f64,
}

/// Book entity (maps to `books`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(default)]
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub year: i32,
    pub author_id: i32,
}

/// Readiness check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}
