//! Author repository.

use crate::errors::BsError;
use crate::models::Author;
use sqlx::PgPool;

pub async fn list_all(pool: &PgPool) -> Result<Vec<Author>, BsError> {
    sqlx::query_as::<_, Author>(
        r#"
        SELECT id, first_name, last_name, age, salary
        FROM authors
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| BsError::Database(format!("Failed to load authors: {}", e)))
}

pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<Option<Author>, BsError> {
    sqlx::query_as::<_, Author>(
        r#"
        SELECT id, first_name, last_name, age, salary
        FROM authors
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| BsError::Database(format!("Failed to load author with id={}: {}", id, e)))
}

/// Insert a new author. The `id` on `author` is ignored.
pub async fn create(pool: &PgPool, author: &Author) -> Result<Author, BsError> {
    sqlx::query_as::<_, Author>(
        r#"
        INSERT INTO authors (first_name, last_name, age, salary)
        VALUES ($1, $2, $3, $4)
        RETURNING id, first_name, last_name, age, salary
        "#,
    )
    .bind(&author.first_name)
    .bind(&author.last_name)
    .bind(author.age)
    .bind(author.salary)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        BsError::Database(format!(
            "Failed to save author with last_name={}: {}",
            author.last_name, e
        ))
    })
}

/// Overwrite author `id`. Returns `None` if no such author exists.
pub async fn update(pool: &PgPool, id: i32, author: &Author) -> Result<Option<Author>, BsError> {
    sqlx::query_as::<_, Author>(
        r#"
        UPDATE authors
        SET first_name = $1, last_name = $2, age = $3, salary = $4
        WHERE id = $5
        RETURNING id, first_name, last_name, age, salary
        "#,
    )
    .bind(&author.first_name)
    .bind(&author.last_name)
    .bind(author.age)
    .bind(author.salary)
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| BsError::Database(format!("Failed to update author with id={}: {}", id, e)))
}

/// Delete author `id`. Returns the number of rows removed.
pub async fn delete(pool: &PgPool, id: i32) -> Result<u64, BsError> {
    let result = sqlx::query("DELETE FROM authors WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| BsError::Database(format!("Failed to delete author with id={}: {}", id, e)))?;

    Ok(result.rows_affected())
}

pub async fn delete_all(pool: &PgPool) -> Result<u64, BsError> {
    let result = sqlx::query("DELETE FROM authors")
        .execute(pool)
        .await
        .map_err(|e| BsError::Database(format!("Failed to delete authors: {}", e)))?;

    Ok(result.rows_affected())
}

/// Append an audit row for a saved or updated author.
pub async fn save_log(pool: &PgPool, author: &Author) -> Result<(), BsError> {
    sqlx::query(
        r#"
        INSERT INTO author_logs (author_id, first_name, last_name)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(author.id)
    .bind(&author.first_name)
    .bind(&author.last_name)
    .execute(pool)
    .await
    .map_err(|e| {
        BsError::Database(format!(
            "Failed to save author log for author id={}: {}",
            author.id, e
        ))
    })?;

    Ok(())
}
