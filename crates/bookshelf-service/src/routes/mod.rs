//! HTTP routes for the Bookshelf service.
//!
//! Defines the Axum router and application state.

use crate::auth::{AuthorizationGate, CredentialVerifier, Role, TokenCache, UserLookup};
use crate::config::{Config, REQUEST_TIMEOUT_SECONDS};
use crate::handlers::{self, authors, books};
use crate::middleware::{
    http_metrics_middleware, request_logging_middleware, require_auth, require_roles,
    AllowedRoles, AuthState,
};
use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Roles admitted to `/api/v1/authors`.
pub const AUTHOR_ROLES: &[Role] = &[Role::User];

/// Roles admitted to `/api/v1/books`.
pub const BOOK_ROLES: &[Role] = &[Role::User, Role::Admin];

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: PgPool,

    /// Service configuration.
    pub config: Config,

    /// Authorization gate, owning the process-wide token cache.
    pub gate: Arc<AuthorizationGate>,
}

impl AppState {
    /// Wire a fresh token cache and verifier over `users`.
    pub fn new(pool: PgPool, config: Config, users: Arc<dyn UserLookup>) -> Self {
        let cache = Arc::new(TokenCache::new(config.token_ttl()));
        let gate = AuthorizationGate::new(
            cache,
            CredentialVerifier::new(users),
            config.token_settings(),
        );

        Self {
            pool,
            config,
            gate: Arc::new(gate),
        }
    }

    pub fn token_cache(&self) -> &Arc<TokenCache> {
        self.gate.cache()
    }
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/health` - Liveness check (simple "OK") - public
/// - `/ready` - Readiness check (checks DB) - public
/// - `/metrics` - Prometheus metrics endpoint - public
/// - `/api/v1/me` - Current principal - authenticated, any role
/// - `/api/v1/authors[/:id[/books]]` - authenticated, role `user`
/// - `/api/v1/books[/:id]` - authenticated, role `user` or `admin`
/// - Request logging, TraceLayer, 30 second timeout, HTTP metrics
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let auth_state = Arc::new(AuthState {
        gate: state.gate.clone(),
    });

    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .with_state(state.clone());

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    let author_routes = Router::new()
        .route(
            "/api/v1/authors",
            get(authors::list_authors)
                .post(authors::create_author)
                .delete(authors::delete_all_authors),
        )
        .route(
            "/api/v1/authors/:id",
            get(authors::get_author)
                .post(authors::update_author)
                .delete(authors::delete_author),
        )
        .route(
            "/api/v1/authors/:id/books",
            get(authors::list_author_books),
        )
        .route_layer(middleware::from_fn_with_state(
            AllowedRoles(AUTHOR_ROLES),
            require_roles,
        ));

    let book_routes = Router::new()
        .route(
            "/api/v1/books",
            get(books::list_books)
                .post(books::create_book)
                .delete(books::delete_all_books),
        )
        .route(
            "/api/v1/books/:id",
            get(books::get_book)
                .post(books::update_book)
                .delete(books::delete_book),
        )
        .route_layer(middleware::from_fn_with_state(
            AllowedRoles(BOOK_ROLES),
            require_roles,
        ));

    // Role checks are layered inside authentication.
    let protected_routes = Router::new()
        .route("/api/v1/me", get(handlers::get_me))
        .merge(author_routes)
        .merge(book_routes)
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(state);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer (innermost)
    // 2. TraceLayer
    // 3. request_logging_middleware
    // 4. http_metrics_middleware (outermost)
    public_routes
        .merge(metrics_routes)
        .merge(protected_routes)
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECONDS)))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(middleware::from_fn(http_metrics_middleware))
}
