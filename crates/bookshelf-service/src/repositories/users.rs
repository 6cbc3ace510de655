//! User repository: credential lookup for the authorization gate.

use crate::auth::UserLookup;
use crate::errors::BsError;
use crate::models::UserRecord;
use async_trait::async_trait;
use sqlx::PgPool;

/// Find the user whose name and password both match exactly.
///
/// Passwords are stored and compared as-is.
pub async fn find_by_credentials(
    pool: &PgPool,
    name: &str,
    password: &str,
) -> Result<Option<UserRecord>, BsError> {
    let user = sqlx::query_as::<_, UserRecord>(
        r#"
        SELECT id, name, role
        FROM users
        WHERE name = $1 AND password = $2
        "#,
    )
    .bind(name)
    .bind(password)
    .fetch_optional(pool)
    .await
    .map_err(|e| BsError::Database(format!("Failed to look up user: {}", e)))?;

    Ok(user)
}

/// [`UserLookup`] backed by the `users` table.
#[derive(Clone)]
pub struct PgUserLookup {
    pool: PgPool,
}

impl PgUserLookup {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserLookup for PgUserLookup {
    async fn lookup(&self, username: &str, password: &str) -> Result<Option<UserRecord>, BsError> {
        find_by_credentials(&self.pool, username, password).await
    }
}
