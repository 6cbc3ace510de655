//! Current user handler.

use crate::auth::{Role, SecurityContext};
use axum::{Extension, Json};
use serde::Serialize;
use tracing::instrument;

/// Response for `/api/v1/me`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: i32,
    pub name: String,
    pub role: Role,
    pub authentication_scheme: String,
}

impl From<&SecurityContext> for MeResponse {
    fn from(ctx: &SecurityContext) -> Self {
        let principal = ctx.principal();
        Self {
            id: principal.id(),
            name: principal.name().to_string(),
            role: principal.role(),
            authentication_scheme: ctx.authentication_scheme().to_string(),
        }
    }
}

/// Handler for GET /api/v1/me
///
/// ```json
/// { "id": 1, "name": "Alice", "role": "user", "authenticationScheme": "BASIC" }
/// ```
#[instrument(skip_all, name = "bs.handlers.me")]
pub async fn get_me(Extension(ctx): Extension<SecurityContext>) -> Json<MeResponse> {
    tracing::debug!(target: "bs.handlers.me", user_id = ctx.principal().id(), "Returning principal");
    Json(MeResponse::from(&ctx))
}
