//! Basic-auth authentication for the Bookshelf API.
//!
//! A request token is the Basic-auth credential string itself,
//! `base64(username:password)`. The [`AuthorizationGate`] first consults the
//! [`TokenCache`] and only falls back to the [`CredentialVerifier`] (and the
//! user store behind it) on a miss. Successful verifications are cached for
//! a fixed TTL so repeated requests skip the database round trip.
//!
//! ```text
//! request -> gate.extract_token -> cache.get ──hit──> SecurityContext
//!                                      │
//!                                     miss
//!                                      v
//!                              verifier.verify -> cache.put -> SecurityContext
//! ```

pub mod gate;
pub mod principal;
pub mod security_context;
pub mod token_cache;
pub mod verifier;

pub use gate::{AuthorizationGate, TokenSettings};
pub use principal::{Principal, Role};
pub use security_context::SecurityContext;
pub use token_cache::TokenCache;
pub use verifier::{CredentialVerifier, Credentials, UserLookup};

use thiserror::Error;

/// Reasons a request fails authentication.
///
/// Every variant is surfaced to the client as 401 Unauthorized with the same
/// message. None of them is retried and none of them touches the cache.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Neither the token header nor the token query parameter was present.
    #[error("No authentication token presented")]
    MissingToken,

    /// The token is not base64, not UTF-8, or has no `:` separator.
    #[error("Malformed authentication token: {0}")]
    MalformedToken(String),

    /// The user store has no user with these credentials.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The user store could not be queried.
    ///
    /// Reported to clients exactly like invalid credentials.
    #[error("User lookup failed: {0}")]
    LookupFailure(String),
}

impl AuthError {
    /// Error code for the JSON error body.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "MISSING_TOKEN",
            AuthError::MalformedToken(_) => "MALFORMED_TOKEN",
            AuthError::InvalidCredentials | AuthError::LookupFailure(_) => "INVALID_CREDENTIALS",
        }
    }

    /// Bounded label for the `bs_auth_decisions_total` metric.
    pub fn outcome_label(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::MalformedToken(_) => "malformed_token",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::LookupFailure(_) => "lookup_failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_failure_uses_invalid_credentials_code() {
        assert_eq!(
            AuthError::LookupFailure("timeout".to_string()).code(),
            AuthError::InvalidCredentials.code()
        );
    }

    #[test]
    fn test_outcome_labels_are_distinct() {
        let labels = [
            AuthError::MissingToken.outcome_label(),
            AuthError::MalformedToken(String::new()).outcome_label(),
            AuthError::InvalidCredentials.outcome_label(),
            AuthError::LookupFailure(String::new()).outcome_label(),
        ];
        let unique: std::collections::HashSet<_> = labels.iter().collect();
        assert_eq!(unique.len(), labels.len());
    }
}
