//! Bookshelf Service
//!
//! Entry point for the authors and books API.

use bookshelf_service::config::Config;
use bookshelf_service::observability::metrics::init_metrics_recorder;
use bookshelf_service::repositories::PgUserLookup;
use bookshelf_service::routes::{self, AppState};
use bookshelf_service::tasks::start_token_cache_sweeper;
use bookshelf_service::MIGRATOR;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookshelf_service=debug,bookshelf=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Bookshelf service");

    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        bind_address = %config.bind_address,
        token_ttl_seconds = config.token_ttl_seconds,
        cache_sweep_interval_seconds = config.cache_sweep_interval_seconds,
        "Configuration loaded successfully"
    );

    let metrics_handle = init_metrics_recorder().map_err(|e| {
        error!("Failed to install metrics recorder: {}", e);
        e
    })?;

    info!("Connecting to database...");
    let db_url_with_timeout = add_query_timeout(&config.database_url, 5);
    let db_pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&db_url_with_timeout)
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {}", e);
            e
        })?;

    MIGRATOR.run(&db_pool).await.map_err(|e| {
        error!("Failed to apply database migrations: {}", e);
        e
    })?;

    info!("Database connection established");

    let bind_address = config.bind_address.clone();
    let sweep_interval = Duration::from_secs(config.cache_sweep_interval_seconds);

    let users = Arc::new(PgUserLookup::new(db_pool.clone()));
    let state = Arc::new(AppState::new(db_pool, config, users));

    let cancel_token = CancellationToken::new();
    let sweeper_handle = if sweep_interval.is_zero() {
        info!("Token cache sweeper disabled (AUTH_CACHE_SWEEP_INTERVAL_SECONDS=0)");
        None
    } else {
        Some(tokio::spawn(start_token_cache_sweeper(
            state.token_cache().clone(),
            sweep_interval,
            cancel_token.clone(),
        )))
    };

    let app = routes::build_routes(state, metrics_handle);

    let addr: SocketAddr = bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("Bookshelf service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    cancel_token.cancel();
    if let Some(handle) = sweeper_handle {
        if let Err(e) = handle.await {
            error!("Token cache sweeper task failed: {}", e);
        }
    }

    info!("Bookshelf service shutdown complete");

    Ok(())
}

/// Listens for shutdown signals (SIGTERM, SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// Adds statement_timeout to the database URL.
fn add_query_timeout(url: &str, timeout_secs: u32) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!(
        "{}{}options=-c%20statement_timeout%3D{}s",
        url, separator, timeout_secs
    )
}
