//! Authorization gate: token sourcing plus the cache-then-verify decision.
//!
//! # Token sourcing
//!
//! 1. The token header (`Authorization` by default).
//! 2. If the header is absent, the token query parameter (first value).
//! 3. If both are absent the request is rejected without verification.
//!
//! A leading `"<scheme> "` (`"Basic "` by default) is stripped.
//!
//! # Decision
//!
//! A live cache entry authorizes immediately. Otherwise the token is
//! verified against the user store and cached on success. Two concurrent
//! first requests with the same token may both verify; the later `put`
//! simply overwrites the earlier one.

use super::{AuthError, CredentialVerifier, SecurityContext, TokenCache};
use crate::observability::{fingerprint, metrics::record_auth_decision};
use axum::extract::Query;
use axum::http::{HeaderMap, Uri};
use std::sync::Arc;
use tracing::instrument;

/// Default token header name.
pub const DEFAULT_TOKEN_HEADER: &str = "Authorization";

/// Default token query parameter name.
pub const DEFAULT_TOKEN_QUERY_PARAM: &str = "Authorization";

/// Default authentication scheme literal.
pub const DEFAULT_AUTH_SCHEME: &str = "Basic";

/// Where tokens are read from and which scheme prefix is stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSettings {
    pub header_name: String,
    pub query_param: String,
    pub scheme: String,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            header_name: DEFAULT_TOKEN_HEADER.to_string(),
            query_param: DEFAULT_TOKEN_QUERY_PARAM.to_string(),
            scheme: DEFAULT_AUTH_SCHEME.to_string(),
        }
    }
}

impl TokenSettings {
    /// Pull the raw token out of a request, header first, then query.
    pub fn extract_token(&self, headers: &HeaderMap, uri: &Uri) -> Result<String, AuthError> {
        let raw = match headers.get(self.header_name.as_str()) {
            Some(value) => value
                .to_str()
                .map_err(|_| {
                    AuthError::MalformedToken("token header is not valid text".to_string())
                })?
                .to_string(),
            None => self.token_from_query(uri).ok_or(AuthError::MissingToken)?,
        };

        Ok(self.strip_scheme(&raw).to_string())
    }

    fn token_from_query(&self, uri: &Uri) -> Option<String> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri).ok()?;
        pairs
            .into_iter()
            .find(|(name, _)| *name == self.query_param)
            .map(|(_, value)| value)
    }

    fn strip_scheme<'a>(&self, raw: &'a str) -> &'a str {
        raw.strip_prefix(self.scheme.as_str())
            .and_then(|rest| rest.strip_prefix(' '))
            .unwrap_or(raw)
    }
}

/// Decides whether a request is authenticated and resolves its principal.
pub struct AuthorizationGate {
    cache: Arc<TokenCache>,
    verifier: CredentialVerifier,
    settings: TokenSettings,
}

impl AuthorizationGate {
    pub fn new(cache: Arc<TokenCache>, verifier: CredentialVerifier, settings: TokenSettings) -> Self {
        Self {
            cache,
            verifier,
            settings,
        }
    }

    pub fn cache(&self) -> &Arc<TokenCache> {
        &self.cache
    }

    pub fn settings(&self) -> &TokenSettings {
        &self.settings
    }

    /// Source the token from the request and authorize it.
    pub async fn authorize_request(
        &self,
        headers: &HeaderMap,
        uri: &Uri,
    ) -> Result<SecurityContext, AuthError> {
        let token = self.settings.extract_token(headers, uri).inspect_err(|e| {
            tracing::debug!(target: "bs.auth.gate", error = %e, "No usable token on request");
            record_auth_decision(e.outcome_label(), "none");
        })?;

        self.authorize(&token).await
    }

    /// Authorize an already-extracted token.
    #[instrument(skip_all, name = "bs.auth.authorize", fields(token = %fingerprint(token)))]
    pub async fn authorize(&self, token: &str) -> Result<SecurityContext, AuthError> {
        if let Some(principal) = self.cache.get(token).await {
            tracing::debug!(
                target: "bs.auth.gate",
                user_id = principal.id(),
                "Token cache hit"
            );
            record_auth_decision("authorized", "cache");
            return Ok(SecurityContext::new(principal));
        }

        match self.verifier.verify(token).await {
            Ok(principal) => {
                self.cache.put(token, principal.clone()).await;
                tracing::info!(
                    target: "bs.auth.gate",
                    user_id = principal.id(),
                    role = %principal.role(),
                    "User authenticated and token cached"
                );
                record_auth_decision("authorized", "verifier");
                Ok(SecurityContext::new(principal))
            }
            Err(e) => {
                tracing::info!(target: "bs.auth.gate", error = %e, "User not authenticated");
                record_auth_decision(e.outcome_label(), "verifier");
                Err(e)
            }
        }
    }
}
