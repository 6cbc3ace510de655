//! Access log middleware.
//!
//! Logs the client address, method and path of every request. Headers and
//! bodies are never logged since they carry credentials.

use axum::{
    extract::{ConnectInfo, Request},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Best-effort client address: `X-Forwarded-For` first, then the peer.
pub fn client_address(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_address(request.headers(), peer);

    tracing::info!(
        target: "bs.middleware.request",
        client = %client,
        method = %request.method(),
        path = %request.uri().path(),
        "Request received"
    );

    next.run(request).await
}
