//! Book repository.

use crate::errors::BsError;
use crate::models::Book;
use sqlx::PgPool;

pub async fn list_all(pool: &PgPool) -> Result<Vec<Book>, BsError> {
    sqlx::query_as::<_, Book>(
        r#"
        SELECT id, name, year, author_id
        FROM books
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| BsError::Database(format!("Failed to load books: {}", e)))
}

pub async fn list_by_author(pool: &PgPool, author_id: i32) -> Result<Vec<Book>, BsError> {
    sqlx::query_as::<_, Book>(
        r#"
        SELECT id, name, year, author_id
        FROM books
        WHERE author_id = $1
        ORDER BY id
        "#,
    )
    .bind(author_id)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        BsError::Database(format!(
            "Failed to load books for author id={}: {}",
            author_id, e
        ))
    })
}

pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<Option<Book>, BsError> {
    sqlx::query_as::<_, Book>(
        r#"
        SELECT id, name, year, author_id
        FROM books
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| BsError::Database(format!("Failed to load book with id={}: {}", id, e)))
}

/// Insert a new book. The `id` on `book` is ignored.
pub async fn create(pool: &PgPool, book: &Book) -> Result<Book, BsError> {
    sqlx::query_as::<_, Book>(
        r#"
        INSERT INTO books (name, year, author_id)
        VALUES ($1, $2, $3)
        RETURNING id, name, year, author_id
        "#,
    )
    .bind(&book.name)
    .bind(book.year)
    .bind(book.author_id)
    .fetch_one(pool)
    .await
    .map_err(|e| write_error(format!("Failed to save book with name={}", book.name), e))
}

/// Overwrite book `id`. Returns `None` if no such book exists.
pub async fn update(pool: &PgPool, id: i32, book: &Book) -> Result<Option<Book>, BsError> {
    sqlx::query_as::<_, Book>(
        r#"
        UPDATE books
        SET name = $1, year = $2, author_id = $3
        WHERE id = $4
        RETURNING id, name, year, author_id
        "#,
    )
    .bind(&book.name)
    .bind(book.year)
    .bind(book.author_id)
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| write_error(format!("Failed to update book with id={}", id), e))
}

/// A book must reference an existing author; anything else is a database fault.
fn write_error(context: String, err: sqlx::Error) -> BsError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            BsError::BadRequest("Referenced author does not exist".to_string())
        }
        _ => BsError::Database(format!("{}: {}", context, err)),
    }
}

/// Delete book `id`. Returns the number of rows removed.
pub async fn delete(pool: &PgPool, id: i32) -> Result<u64, BsError> {
    let result = sqlx::query("DELETE FROM books WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| BsError::Database(format!("Failed to delete book with id={}: {}", id, e)))?;

    Ok(result.rows_affected())
}

pub async fn delete_all(pool: &PgPool) -> Result<u64, BsError> {
    let result = sqlx::query("DELETE FROM books")
        .execute(pool)
        .await
        .map_err(|e| BsError::Database(format!("Failed to delete books: {}", e)))?;

    Ok(result.rows_affected())
}

/// Append an audit row for a saved or updated book.
pub async fn save_log(pool: &PgPool, book: &Book) -> Result<(), BsError> {
    sqlx::query(
        r#"
        INSERT INTO book_logs (book_id, name)
        VALUES ($1, $2)
        "#,
    )
    .bind(book.id)
    .bind(&book.name)
    .execute(pool)
    .await
    .map_err(|e| BsError::Database(format!("Failed to save book log for book id={}: {}", book.id, e)))?;

    Ok(())
}
