//! Credential verification against the user store.
//!
//! The verifier is stateless: it decodes a token into credentials and asks a
//! [`UserLookup`] for a matching user. It never reads or writes the token
//! cache; caching is the gate's job.

use super::{AuthError, Principal};
use crate::errors::BsError;
use crate::models::UserRecord;
use crate::observability::fingerprint;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::instrument;

/// Exact-match credential check against a user store.
///
/// Returns `Ok(None)` when no user matches. Store failures are returned as
/// errors so the verifier can tell them apart in logs and metrics, even
/// though both end in the same 401 for the client.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn lookup(&self, username: &str, password: &str) -> Result<Option<UserRecord>, BsError>;
}

/// Username and password decoded from a Basic-auth token.
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    /// Decode `base64(username:password)`.
    ///
    /// Splits on the first `:` only, so a password may itself contain `:`.
    pub fn decode(token: &str) -> Result<Self, AuthError> {
        let decoded = general_purpose::STANDARD
            .decode(token)
            .map_err(|_| AuthError::MalformedToken("token is not valid base64".to_string()))?;

        let text = String::from_utf8(decoded)
            .map_err(|_| AuthError::MalformedToken("token is not valid UTF-8".to_string()))?;

        let (username, password) = text.split_once(':').ok_or_else(|| {
            AuthError::MalformedToken("token has no username:password separator".to_string())
        })?;

        Ok(Self {
            username: username.to_string(),
            password: SecretString::from(password.to_string()),
        })
    }
}

/// Resolves tokens to principals via a [`UserLookup`].
#[derive(Clone)]
pub struct CredentialVerifier {
    users: Arc<dyn UserLookup>,
}

impl CredentialVerifier {
    pub fn new(users: Arc<dyn UserLookup>) -> Self {
        Self { users }
    }

    /// Verify `token` against the user store.
    ///
    /// Malformed tokens are rejected before the store is consulted.
    #[instrument(skip_all, name = "bs.auth.verify", fields(token = %fingerprint(token)))]
    pub async fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        let credentials = Credentials::decode(token).inspect_err(|e| {
            tracing::debug!(target: "bs.auth.verifier", error = %e, "Rejected malformed token");
        })?;

        let record = self
            .users
            .lookup(&credentials.username, credentials.password.expose_secret())
            .await
            .map_err(|e| {
                tracing::warn!(target: "bs.auth.verifier", error = %e, "User lookup failed");
                AuthError::LookupFailure(e.to_string())
            })?
            .ok_or_else(|| {
                tracing::debug!(target: "bs.auth.verifier", "No user matches credentials");
                AuthError::InvalidCredentials
            })?;

        Principal::try_from(record).map_err(|e| {
            tracing::warn!(target: "bs.auth.verifier", error = %e, "User has an unrecognised role");
            AuthError::InvalidCredentials
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Store holding a single user; records every lookup.
    struct OneUserStore {
        user: Option<(String, String, UserRecord)>,
        fail: bool,
        calls: AtomicUsize,
        last_lookup: Mutex<Option<(String, String)>>,
    }

    impl OneUserStore {
        fn with_user(name: &str, password: &str, role: &str) -> Self {
            Self {
                user: Some((
                    name.to_string(),
                    password.to_string(),
                    UserRecord {
                        id: 1,
                        name: name.to_string(),
                        role: role.to_string(),
                    },
                )),
                fail: false,
                calls: AtomicUsize::new(0),
                last_lookup: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                user: None,
                fail: true,
                calls: AtomicUsize::new(0),
                last_lookup: Mutex::new(None),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UserLookup for OneUserStore {
        async fn lookup(
            &self,
            username: &str,
            password: &str,
        ) -> Result<Option<UserRecord>, BsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_lookup.lock().unwrap() = Some((username.to_string(), password.to_string()));

            if self.fail {
                return Err(BsError::Database("connection refused".to_string()));
            }

            Ok(self.user.as_ref().and_then(|(name, pass, record)| {
                (name == username && pass == password).then(|| record.clone())
            }))
        }
    }

    fn encode(raw: &str) -> String {
        general_purpose::STANDARD.encode(raw)
    }

    fn verifier_for(store: &Arc<OneUserStore>) -> CredentialVerifier {
        CredentialVerifier::new(store.clone() as Arc<dyn UserLookup>)
    }

    #[test]
    fn test_decode_credentials() {
        let credentials = Credentials::decode("QWxpY2U6c2VjcmV0").unwrap();
        assert_eq!(credentials.username, "Alice");
        assert_eq!(credentials.password.expose_secret(), "secret");
    }

    #[test]
    fn test_decode_splits_on_first_colon_only() {
        let credentials = Credentials::decode(&encode("bob:pa:ss:word")).unwrap();
        assert_eq!(credentials.username, "bob");
        assert_eq!(credentials.password.expose_secret(), "pa:ss:word");
    }

    #[test]
    fn test_decode_allows_empty_password() {
        let credentials = Credentials::decode(&encode("bob:")).unwrap();
        assert_eq!(credentials.username, "bob");
        assert_eq!(credentials.password.expose_secret(), "");
    }

    #[test]
    fn test_decode_without_separator_is_malformed() {
        let result = Credentials::decode(&encode("no-separator"));
        assert!(matches!(result, Err(AuthError::MalformedToken(_))));
    }

    #[test]
    fn test_decode_invalid_base64_is_malformed() {
        let result = Credentials::decode("not base64 !!");
        assert!(matches!(result, Err(AuthError::MalformedToken(_))));
    }

    #[test]
    fn test_decode_non_utf8_is_malformed() {
        let token = general_purpose::STANDARD.encode([0xff, 0xfe, b':', b'x']);
        let result = Credentials::decode(&token);
        assert!(matches!(result, Err(AuthError::MalformedToken(_))));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials::decode("QWxpY2U6c2VjcmV0").unwrap();
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("Alice"));
        assert!(!debug.contains("secret\""), "password must not appear in Debug output");
    }

    #[tokio::test]
    async fn test_verify_success_returns_principal() {
        let store = Arc::new(OneUserStore::with_user("Alice", "secret", "user"));
        let verifier = verifier_for(&store);

        let principal = verifier.verify("QWxpY2U6c2VjcmV0").await.unwrap();

        assert_eq!(principal.name(), "Alice");
        assert_eq!(principal.role(), Role::User);
        assert_eq!(store.calls(), 1);
        assert_eq!(
            *store.last_lookup.lock().unwrap(),
            Some(("Alice".to_string(), "secret".to_string()))
        );
    }

    #[tokio::test]
    async fn test_verify_wrong_password_is_invalid_credentials() {
        let store = Arc::new(OneUserStore::with_user("Alice", "secret", "user"));
        let verifier = verifier_for(&store);

        let result = verifier.verify(&encode("Alice:guess")).await;

        assert_eq!(result, Err(AuthError::InvalidCredentials));
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn test_verify_malformed_token_skips_lookup() {
        let store = Arc::new(OneUserStore::with_user("Alice", "secret", "user"));
        let verifier = verifier_for(&store);

        let result = verifier.verify("%%%not-base64%%%").await;

        assert!(matches!(result, Err(AuthError::MalformedToken(_))));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_verify_missing_separator_skips_lookup() {
        let store = Arc::new(OneUserStore::with_user("Alice", "secret", "user"));
        let verifier = verifier_for(&store);

        let result = verifier.verify(&encode("Alicesecret")).await;

        assert!(matches!(result, Err(AuthError::MalformedToken(_))));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_verify_store_error_is_lookup_failure() {
        let store = Arc::new(OneUserStore::failing());
        let verifier = verifier_for(&store);

        let result = verifier.verify("QWxpY2U6c2VjcmV0").await;

        assert!(matches!(result, Err(AuthError::LookupFailure(_))));
    }

    #[tokio::test]
    async fn test_verify_unknown_role_is_invalid_credentials() {
        let store = Arc::new(OneUserStore::with_user("Alice", "secret", "root"));
        let verifier = verifier_for(&store);

        let result = verifier.verify("QWxpY2U6c2VjcmV0").await;

        assert_eq!(result, Err(AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_verify_is_repeatable_for_unchanged_store() {
        let store = Arc::new(OneUserStore::with_user("Alice", "secret", "user"));
        let verifier = verifier_for(&store);

        let first = verifier.verify("QWxpY2U6c2VjcmV0").await;
        let second = verifier.verify("QWxpY2U6c2VjcmV0").await;

        assert_eq!(first, second);
        assert_eq!(store.calls(), 2);
    }
}
