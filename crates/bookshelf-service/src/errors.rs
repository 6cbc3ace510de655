//! Bookshelf service error types.
//!
//! All errors map to HTTP status codes via the `IntoResponse` impl.
//! Messages returned to clients are generic; the underlying cause is logged
//! server-side.

use crate::auth::AuthError;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Client-facing message for every authentication failure.
pub const UNAUTHORIZED_MESSAGE: &str = "User cannot access the resource.";

/// Challenge sent with every 401 response.
const WWW_AUTHENTICATE_CHALLENGE: &str = "Basic realm=\"bookshelf\"";

/// Bookshelf service error type.
///
/// Maps to HTTP status codes:
/// - Database, Internal: 500 Internal Server Error
/// - Unauthorized: 401 Unauthorized
/// - Forbidden: 403 Forbidden
/// - NotFound: 404 Not Found
/// - BadRequest: 400 Bad Request
#[derive(Debug, Error)]
pub enum BsError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal,
}

impl BsError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            BsError::Database(_) | BsError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            BsError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            BsError::Forbidden(_) => StatusCode::FORBIDDEN,
            BsError::NotFound(_) => StatusCode::NOT_FOUND,
            BsError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for BsError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (code, message) = match &self {
            BsError::Database(err) => {
                tracing::error!(target: "bs.database", error = %err, "Database operation failed");
                (
                    "DATABASE_ERROR",
                    "An internal database error occurred".to_string(),
                )
            }
            BsError::Unauthorized(reason) => {
                tracing::debug!(target: "bs.auth", reason = %reason, "Request rejected as unauthorized");
                (reason.code(), UNAUTHORIZED_MESSAGE.to_string())
            }
            BsError::Forbidden(reason) => ("FORBIDDEN", reason.clone()),
            BsError::NotFound(resource) => ("NOT_FOUND", resource.clone()),
            BsError::BadRequest(reason) => ("BAD_REQUEST", reason.clone()),
            BsError::Internal => ("INTERNAL_ERROR", "An internal error occurred".to_string()),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        let mut response = (status, Json(error_response)).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(WWW_AUTHENTICATE_CHALLENGE),
            );
        }

        response
    }
}

impl From<sqlx::Error> for BsError {
    fn from(err: sqlx::Error) -> Self {
        BsError::Database(err.to_string())
    }
}
