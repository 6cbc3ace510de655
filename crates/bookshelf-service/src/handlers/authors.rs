//! Author resource handlers.
//!
//! All routes here require the `user` role.

use crate::errors::BsError;
use crate::handlers::options::ResourceOptions;
use crate::models::{Author, Book};
use crate::repositories::{authors, books};
use crate::routes::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::instrument;

/// Handler for GET /api/v1/authors
#[instrument(skip_all, name = "bs.handlers.list_authors")]
pub async fn list_authors(
    State(state): State<Arc<AppState>>,
    Query(options): Query<ResourceOptions>,
) -> Result<Json<Vec<Author>>, BsError> {
    options
        .apply_delay(state.config.max_response_delay_seconds)
        .await;

    let authors = authors::list_all(&state.pool).await?;
    tracing::debug!(target: "bs.handlers.authors", count = authors.len(), "Loaded authors");

    Ok(Json(authors))
}

/// Handler for GET /api/v1/authors/:id
#[instrument(skip_all, name = "bs.handlers.get_author", fields(author_id = id))]
pub async fn get_author(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Query(options): Query<ResourceOptions>,
) -> Result<Json<Author>, BsError> {
    options
        .apply_delay(state.config.max_response_delay_seconds)
        .await;

    authors::get_by_id(&state.pool, id)
        .await?
        .map(Json)
        .ok_or_else(|| BsError::NotFound(format!("Author {} not found", id)))
}

/// Handler for GET /api/v1/authors/:id/books
#[instrument(skip_all, name = "bs.handlers.list_author_books", fields(author_id = id))]
pub async fn list_author_books(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Query(options): Query<ResourceOptions>,
) -> Result<Json<Vec<Book>>, BsError> {
    options
        .apply_delay(state.config.max_response_delay_seconds)
        .await;

    Ok(Json(books::list_by_author(&state.pool, id).await?))
}

/// Handler for POST /api/v1/authors
///
/// Returns the stored author including its assigned id.
#[instrument(skip_all, name = "bs.handlers.create_author")]
pub async fn create_author(
    State(state): State<Arc<AppState>>,
    Query(options): Query<ResourceOptions>,
    Json(author): Json<Author>,
) -> Result<Json<Author>, BsError> {
    options
        .apply_delay(state.config.max_response_delay_seconds)
        .await;

    let created = authors::create(&state.pool, &author).await?;
    if options.logging {
        authors::save_log(&state.pool, &created).await?;
    }

    tracing::info!(target: "bs.handlers.authors", author_id = created.id, "Author created");

    Ok(Json(created))
}

/// Handler for POST /api/v1/authors/:id
///
/// The path id wins over any id in the body.
#[instrument(skip_all, name = "bs.handlers.update_author", fields(author_id = id))]
pub async fn update_author(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Query(options): Query<ResourceOptions>,
    Json(author): Json<Author>,
) -> Result<Json<Author>, BsError> {
    options
        .apply_delay(state.config.max_response_delay_seconds)
        .await;

    let updated = authors::update(&state.pool, id, &author)
        .await?
        .ok_or_else(|| BsError::NotFound(format!("Author {} not found", id)))?;
    if options.logging {
        authors::save_log(&state.pool, &updated).await?;
    }

    tracing::info!(target: "bs.handlers.authors", author_id = id, "Author updated");

    Ok(Json(updated))
}

/// Handler for DELETE /api/v1/authors/:id
///
/// Idempotent: deleting a missing author is still 204. Books by the author
/// are removed with it.
#[instrument(skip_all, name = "bs.handlers.delete_author", fields(author_id = id))]
pub async fn delete_author(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Query(options): Query<ResourceOptions>,
) -> Result<StatusCode, BsError> {
    options
        .apply_delay(state.config.max_response_delay_seconds)
        .await;

    let removed = authors::delete(&state.pool, id).await?;
    tracing::info!(target: "bs.handlers.authors", author_id = id, removed, "Author deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for DELETE /api/v1/authors
#[instrument(skip_all, name = "bs.handlers.delete_all_authors")]
pub async fn delete_all_authors(
    State(state): State<Arc<AppState>>,
    Query(options): Query<ResourceOptions>,
) -> Result<StatusCode, BsError> {
    options
        .apply_delay(state.config.max_response_delay_seconds)
        .await;

    let removed = authors::delete_all(&state.pool).await?;
    tracing::warn!(target: "bs.handlers.authors", removed, "All authors deleted");

    Ok(StatusCode::NO_CONTENT)
}
