//! Observability for the Bookshelf service.
//!
//! # Privacy
//!
//! Authentication tokens carry the user's password in reversible form, so
//! they are never logged. Log fields that need to correlate requests made
//! with the same token use [`fingerprint`] instead.

pub mod metrics;

use sha2::{Digest, Sha256};

/// Short, one-way fingerprint of a token for log correlation.
///
/// First 8 hex chars of the SHA-256 digest: enough to tell tokens apart in
/// logs, not enough to be worth brute forcing.
pub fn fingerprint(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    hex::encode(digest.iter().take(4).copied().collect::<Vec<u8>>())
}
