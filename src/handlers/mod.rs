//! Request Handlers
//!
//! The request boundary: every handler takes the caller's identity,
//! checks the required capability first, runs the service operation, and
//! transposes labels on the way out for external roles. Handlers return
//! the uniform response envelope; raw service errors never leak past
//! this layer.

pub mod autofill;
pub mod mapping;
pub mod market_study;
pub mod strategy;

use crate::services::role::{Capability, Role, RoleResolver};
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

/// The authenticated caller of a request
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub role: Role,
}

impl Identity {
    /// Resolve an identity from the raw session values
    pub fn resolve(resolver: &RoleResolver, user_id: impl Into<String>, raw_role: &str) -> Self {
        Self {
            user_id: user_id.into(),
            role: resolver.normalize(raw_role),
        }
    }
}

/// Capability gate, checked before any service call
pub(crate) fn require(state: &AppState, identity: &Identity, cap: Capability) -> AppResult<()> {
    if state.roles.has_capability(&identity.role, cap) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "role '{}' lacks the required permission",
            identity.role
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::role::UnknownRolePolicy;

    #[test]
    fn test_identity_resolution_normalizes_role() {
        let resolver = RoleResolver::default();
        let identity = Identity::resolve(&resolver, "u1", "user");
        assert_eq!(identity.role, Role::Operator);
        assert_eq!(identity.user_id, "u1");
    }

    #[test]
    fn test_unknown_role_under_deny_all() {
        let resolver = RoleResolver::new(UnknownRolePolicy::DenyAll);
        let identity = Identity::resolve(&resolver, "u1", "mystery");
        assert!(resolver.capabilities(&identity.role).is_empty());
    }
}
