//! Role Resolution
//!
//! Derives a normalized role and a capability set from the raw role string
//! carried by the session. Pure and deterministic: usable from both
//! request handling and service code without a live session. Roles are
//! recomputed on every request and never cached beyond request scope.

use serde::{Deserialize, Serialize};

/// Normalized platform role
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Operator,
    Freelance,
    ClientRetainer,
    ClientStatic,
    /// Unrecognized raw value, carried as-is
    Other(String),
}

/// What to do with role strings that match no known value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownRolePolicy {
    /// Keep the raw value and grant the client-static (read-only) set.
    /// Matches legacy behavior.
    #[default]
    PassThrough,
    /// Fail closed: unknown roles get no capabilities.
    DenyAll,
}

/// Capabilities a role grants at the request boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Create/edit strategies and interview data
    ManageStrategies,
    /// Advance or skip pipeline phases
    AdvancePhase,
    /// Run AI auto-fill and free-text mapping
    AutoFill,
    /// See internal (non-transposed) labels
    ViewInternalLabels,
    /// Administrative phase reset and archival
    AdminReset,
}

const ADMIN_CAPS: &[Capability] = &[
    Capability::ManageStrategies,
    Capability::AdvancePhase,
    Capability::AutoFill,
    Capability::ViewInternalLabels,
    Capability::AdminReset,
];

const OPERATOR_CAPS: &[Capability] = &[
    Capability::ManageStrategies,
    Capability::AdvancePhase,
    Capability::AutoFill,
    Capability::ViewInternalLabels,
];

const FREELANCE_CAPS: &[Capability] = &[
    Capability::ManageStrategies,
    Capability::AdvancePhase,
    Capability::AutoFill,
];

const CLIENT_RETAINER_CAPS: &[Capability] = &[Capability::ManageStrategies, Capability::AutoFill];

const CLIENT_STATIC_CAPS: &[Capability] = &[];

impl Role {
    /// Canonical string form
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Operator => "operator",
            Self::Freelance => "freelance",
            Self::ClientRetainer => "client_retainer",
            Self::ClientStatic => "client_static",
            Self::Other(raw) => raw,
        }
    }

    /// True only for roles that see internal terminology
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Admin | Self::Operator)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves raw session role strings into normalized roles + capabilities
#[derive(Debug, Clone, Default)]
pub struct RoleResolver {
    policy: UnknownRolePolicy,
}

impl RoleResolver {
    /// Create a resolver with the given unknown-role policy
    pub fn new(policy: UnknownRolePolicy) -> Self {
        Self { policy }
    }

    /// The configured unknown-role policy
    pub fn policy(&self) -> UnknownRolePolicy {
        self.policy
    }

    /// Normalize a raw role string.
    ///
    /// Legacy values map to their canonical role ("user" predates the
    /// operator rename). Canonical values pass through. Unknown values are
    /// kept as `Role::Other`; their capability set depends on the policy.
    pub fn normalize(&self, raw: &str) -> Role {
        match raw {
            "admin" => Role::Admin,
            // Legacy value from before the operator rename
            "user" | "operator" => Role::Operator,
            "freelance" => Role::Freelance,
            "client_retainer" => Role::ClientRetainer,
            "client_static" => Role::ClientStatic,
            other => Role::Other(other.to_string()),
        }
    }

    /// Capability set for a role under this resolver's policy
    pub fn capabilities(&self, role: &Role) -> &'static [Capability] {
        match role {
            Role::Admin => ADMIN_CAPS,
            Role::Operator => OPERATOR_CAPS,
            Role::Freelance => FREELANCE_CAPS,
            Role::ClientRetainer => CLIENT_RETAINER_CAPS,
            Role::ClientStatic => CLIENT_STATIC_CAPS,
            Role::Other(_) => match self.policy {
                UnknownRolePolicy::PassThrough => CLIENT_STATIC_CAPS,
                UnknownRolePolicy::DenyAll => &[],
            },
        }
    }

    /// Whether the role holds a capability
    pub fn has_capability(&self, role: &Role, cap: Capability) -> bool {
        self.capabilities(role).contains(&cap)
    }
}

/// Membership check against an explicit allow-list
pub fn is_role_allowed(role: &Role, allowed: &[Role]) -> bool {
    allowed.contains(role)
}
