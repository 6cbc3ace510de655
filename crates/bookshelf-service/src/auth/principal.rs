//! Authenticated user identity.

use crate::models::UserRecord;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Authorization roles a user can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored role string outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Resolved identity of an authenticated user.
///
/// Immutable once built; the token cache hands out clones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    id: i32,
    name: String,
    role: Role,
}

impl Principal {
    pub fn new(id: i32, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            role,
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

impl TryFrom<UserRecord> for Principal {
    type Error = UnknownRole;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        let role = record.role.parse()?;
        Ok(Self {
            id: record.id,
            name: record.name,
            role,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in [Role::User, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_role_parse_is_case_sensitive() {
        assert_eq!(
            "Admin".parse::<Role>(),
            Err(UnknownRole("Admin".to_string()))
        );
    }

    #[test]
    fn test_principal_from_user_record() {
        let record = UserRecord {
            id: 3,
            name: "Alice".to_string(),
            role: "admin".to_string(),
        };

        let principal = Principal::try_from(record).unwrap();

        assert_eq!(principal.id(), 3);
        assert_eq!(principal.name(), "Alice");
        assert_eq!(principal.role(), Role::Admin);
    }

    #[test]
    fn test_principal_from_record_with_unknown_role_fails() {
        let record = UserRecord {
            id: 4,
            name: "Mallory".to_string(),
            role: "superuser".to_string(),
        };

        assert!(Principal::try_from(record).is_err());
    }

    #[test]
    fn test_principal_serializes_role_lowercase() {
        let json = serde_json::to_value(Principal::new(1, "Bob", Role::User)).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "Bob");
        assert_eq!(json["role"], "user");
    }
}
