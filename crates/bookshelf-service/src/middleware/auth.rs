//! Authentication and role middleware for protected routes.
//!
//! `require_auth` runs the authorization gate and stores the resulting
//! [`SecurityContext`] in request extensions. `require_roles` then checks
//! the context against the roles a route group allows.

use crate::auth::{AuthorizationGate, Role, SecurityContext};
use crate::errors::BsError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::instrument;

/// State for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    /// Cache-then-verify gate shared by every protected route.
    pub gate: Arc<AuthorizationGate>,
}

/// Authentication middleware.
///
/// The token is read from the configured header, or from the configured
/// query parameter when the header is absent:
///
/// ```text
/// Authorization: Basic <base64(name:password)>
/// GET /api/v1/books?Authorization=Basic%20<base64(name:password)>
/// ```
///
/// # Response
///
/// - Returns 401 Unauthorized with WWW-Authenticate header if the token is
///   missing, malformed, or does not match a user
/// - Continues to next handler with the security context in extensions
#[instrument(skip_all, name = "bs.middleware.auth")]
pub async fn require_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, BsError> {
    let context = state
        .gate
        .authorize_request(req.headers(), req.uri())
        .await
        .inspect_err(|e| {
            tracing::debug!(target: "bs.middleware.auth", error = %e, "Request not authenticated");
        })?;

    req.extensions_mut().insert(context);

    Ok(next.run(req).await)
}

/// Roles admitted to a route group.
#[derive(Debug, Clone, Copy)]
pub struct AllowedRoles(pub &'static [Role]);

/// Role middleware. Must be layered inside [`require_auth`].
///
/// Returns 403 Forbidden when the authenticated principal holds none of the
/// allowed roles.
#[instrument(skip_all, name = "bs.middleware.roles")]
pub async fn require_roles(
    State(allowed): State<AllowedRoles>,
    req: Request,
    next: Next,
) -> Result<impl IntoResponse, BsError> {
    let Some(context) = req.extensions().get::<SecurityContext>() else {
        tracing::error!(
            target: "bs.middleware.auth",
            "Role check reached without a security context"
        );
        return Err(BsError::Internal);
    };

    if !context.has_any_role(allowed.0) {
        tracing::debug!(
            target: "bs.middleware.auth",
            user_id = context.principal().id(),
            role = %context.principal().role(),
            "Principal lacks a required role"
        );
        return Err(BsError::Forbidden(
            "User is not allowed to access this resource".to_string(),
        ));
    }

    Ok(next.run(req).await)
}
