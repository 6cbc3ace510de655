//! Per-request security context.

use super::{Principal, Role};

/// Authentication scheme reported for every context.
pub const BASIC_AUTH: &str = "BASIC";

/// The authenticated principal attached to a request.
///
/// Inserted into request extensions by the auth middleware; handlers read it
/// with `Extension<SecurityContext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityContext {
    principal: Principal,
}

impl SecurityContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Exact, case-sensitive comparison against the principal's role.
    /// Roles do not imply each other.
    pub fn is_user_in_role(&self, role: &str) -> bool {
        self.principal.role().as_str() == role
    }

    /// True if the principal holds any of `roles`.
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.is_user_in_role(role.as_str()))
    }

    pub fn authentication_scheme(&self) -> &'static str {
        BASIC_AUTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(role: Role) -> SecurityContext {
        SecurityContext::new(Principal::new(9, "Carol", role))
    }

    #[test]
    fn test_is_user_in_role_exact_match() {
        let ctx = context(Role::User);
        assert!(ctx.is_user_in_role("user"));
        assert!(!ctx.is_user_in_role("admin"));
        assert!(!ctx.is_user_in_role("User"));
        assert!(!ctx.is_user_in_role(""));
    }

    #[test]
    fn test_admin_does_not_imply_user() {
        let ctx = context(Role::Admin);
        assert!(ctx.is_user_in_role("admin"));
        assert!(!ctx.is_user_in_role("user"));
    }

    #[test]
    fn test_has_any_role() {
        let ctx = context(Role::Admin);
        assert!(ctx.has_any_role(&[Role::User, Role::Admin]));
        assert!(!ctx.has_any_role(&[Role::User]));
        assert!(!ctx.has_any_role(&[]));
    }

    #[test]
    fn test_exposes_principal_and_scheme() {
        let ctx = context(Role::User);
        assert_eq!(ctx.principal().name(), "Carol");
        assert_eq!(ctx.principal().id(), 9);
        assert_eq!(ctx.authentication_scheme(), "BASIC");
    }
}
