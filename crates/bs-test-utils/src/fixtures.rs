//! Fixed test users and Basic-auth token builders.
//!
//! All fixtures are deterministic so test failures are reproducible.

use base64::{engine::general_purpose::STANDARD, Engine};

// Users
pub const ALICE_ID: i32 = 1;
pub const ALICE_NAME: &str = "alice";
pub const ALICE_PASSWORD: &str = "alice-password";

pub const BOB_ID: i32 = 2;
pub const BOB_NAME: &str = "bob";
pub const BOB_PASSWORD: &str = "bob-password";

pub const ROOT_ID: i32 = 3;
pub const ROOT_NAME: &str = "root";
pub const ROOT_PASSWORD: &str = "root-password";

// Roles as stored in the users table
pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

/// `base64(name:password)`, the bare token.
pub fn basic_token(name: &str, password: &str) -> String {
    STANDARD.encode(format!("{}:{}", name, password))
}

/// `Basic base64(name:password)`, the Authorization header value.
pub fn basic_header(name: &str, password: &str) -> String {
    format!("Basic {}", basic_token(name, password))
}

/// Query string fragment carrying the token, percent-encoded.
pub fn basic_query(name: &str, password: &str) -> String {
    let token = basic_token(name, password)
        .replace('+', "%2B")
        .replace('/', "%2F")
        .replace('=', "%3D");
    format!("Authorization=Basic%20{}", token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_token_encoding() {
        assert_eq!(basic_token("Alice", "secret"), "QWxpY2U6c2VjcmV0");
        assert_eq!(basic_header("Alice", "secret"), "Basic QWxpY2U6c2VjcmV0");
    }

    #[test]
    fn test_basic_query_escapes_padding() {
        // base64("bob:pw") = "Ym9iOnB3"; base64("ab:c") = "YWI6Yw=="
        assert_eq!(basic_query("bob", "pw"), "Authorization=Basic%20Ym9iOnB3");
        assert_eq!(basic_query("ab", "c"), "Authorization=Basic%20YWI6Yw%3D%3D");
    }
}
