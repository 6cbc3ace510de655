//! Book resource handlers.
//!
//! Open to the `user` and `admin` roles.

use crate::errors::BsError;
use crate::handlers::options::ResourceOptions;
use crate::models::Book;
use crate::repositories::books;
use crate::routes::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::instrument;

/// Handler for GET /api/v1/books
#[instrument(skip_all, name = "bs.handlers.list_books")]
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    Query(options): Query<ResourceOptions>,
) -> Result<Json<Vec<Book>>, BsError> {
    options
        .apply_delay(state.config.max_response_delay_seconds)
        .await;

    let books = books::list_all(&state.pool).await?;
    tracing::debug!(target: "bs.handlers.books", count = books.len(), "Loaded books");

    Ok(Json(books))
}

/// Handler for GET /api/v1/books/:id
#[instrument(skip_all, name = "bs.handlers.get_book", fields(book_id = id))]
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Query(options): Query<ResourceOptions>,
) -> Result<Json<Book>, BsError> {
    options
        .apply_delay(state.config.max_response_delay_seconds)
        .await;

    books::get_by_id(&state.pool, id)
        .await?
        .map(Json)
        .ok_or_else(|| BsError::NotFound(format!("Book {} not found", id)))
}

/// Handler for POST /api/v1/books
///
/// 400 if `authorId` does not name an existing author.
#[instrument(skip_all, name = "bs.handlers.create_book")]
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    Query(options): Query<ResourceOptions>,
    Json(book): Json<Book>,
) -> Result<Json<Book>, BsError> {
    options
        .apply_delay(state.config.max_response_delay_seconds)
        .await;

    let created = books::create(&state.pool, &book).await?;
    if options.logging {
        books::save_log(&state.pool, &created).await?;
    }

    tracing::info!(
        target: "bs.handlers.books",
        book_id = created.id,
        author_id = created.author_id,
        "Book created"
    );

    Ok(Json(created))
}

/// Handler for POST /api/v1/books/:id
///
/// Responds 204 with no body.
#[instrument(skip_all, name = "bs.handlers.update_book", fields(book_id = id))]
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Query(options): Query<ResourceOptions>,
    Json(book): Json<Book>,
) -> Result<StatusCode, BsError> {
    options
        .apply_delay(state.config.max_response_delay_seconds)
        .await;

    let updated = books::update(&state.pool, id, &book)
        .await?
        .ok_or_else(|| BsError::NotFound(format!("Book {} not found", id)))?;
    if options.logging {
        books::save_log(&state.pool, &updated).await?;
    }

    tracing::info!(target: "bs.handlers.books", book_id = id, "Book updated");

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for DELETE /api/v1/books/:id
#[instrument(skip_all, name = "bs.handlers.delete_book", fields(book_id = id))]
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Query(options): Query<ResourceOptions>,
) -> Result<StatusCode, BsError> {
    options
        .apply_delay(state.config.max_response_delay_seconds)
        .await;

    let removed = books::delete(&state.pool, id).await?;
    tracing::info!(target: "bs.handlers.books", book_id = id, removed, "Book deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for DELETE /api/v1/books
#[instrument(skip_all, name = "bs.handlers.delete_all_books")]
pub async fn delete_all_books(
    State(state): State<Arc<AppState>>,
    Query(options): Query<ResourceOptions>,
) -> Result<StatusCode, BsError> {
    options
        .apply_delay(state.config.max_response_delay_seconds)
        .await;

    let removed = books::delete_all(&state.pool).await?;
    tracing::warn!(target: "bs.handlers.books", removed, "All books deleted");

    Ok(StatusCode::NO_CONTENT)
}
