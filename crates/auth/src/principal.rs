use serde::{Deserialize, Serialize};

use atlaserp_core::{TenantId, UserId};

use crate::{Permission, Role};

/// User account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// User is active and can authenticate/transact.
    #[default]
    Active,
    /// User is suspended and cannot authenticate.
    Suspended,
}

impl core::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Suspended => write!(f, "suspended"),
        }
    }
}

/// A user's single role together with the permissions it grants.
///
/// Exactly one role per user; the permission list is flattened out of the
/// role's many-to-many relation at lookup time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleBinding {
    pub name: Role,
    pub permissions: Vec<Permission>,
}

/// A fully resolved principal for authorization decisions.
///
/// Built fresh per request from the token subject by [`crate::IdentityResolver`];
/// never mutated, never cached across requests, discarded at request end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub email: String,
    /// The tenant this principal is homed in. `None` only for misconfigured
    /// accounts; tenant resolution fails closed on it.
    pub home_tenant_id: Option<TenantId>,
    pub role: RoleBinding,
    pub status: UserStatus,
}

impl Principal {
    pub fn is_superadmin(&self) -> bool {
        self.role.name.is_superadmin()
    }

    /// Whether this principal holds `required`, via the wildcard or directly.
    pub fn has_permission(&self, required: &Permission) -> bool {
        self.role
            .permissions
            .iter()
            .any(|p| p.is_wildcard() || p == required)
    }
}
