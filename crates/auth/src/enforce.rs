//! Admission checks run between tenant resolution and handler execution.
//!
//! Three independent enforcers — tenant access, roles, permissions — plus
//! [`authorize_operation`], the ordered chain the API layer calls. Each
//! enforcer is a pure function: no IO, no panics, admit or deny-with-reason.

use atlaserp_core::TenantId;

use crate::error::AuthzError;
use crate::permissions::Permission;
use crate::principal::Principal;
use crate::roles::Role;
use crate::tenancy::ActiveTenant;

/// Per-operation authorization requirements.
///
/// Declared as a const next to each route so the requirements are data, not
/// code scattered through handlers. `required_permissions` is OR-combined:
/// holding any one listed permission admits. `allowed_roles` is a coarse
/// allow-list; empty means no role restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationPolicy {
    pub required_permissions: &'static [Permission],
    pub allowed_roles: &'static [Role],
}

impl OperationPolicy {
    /// Authentication only; no further requirement.
    pub const OPEN: Self = Self {
        required_permissions: &[],
        allowed_roles: &[],
    };

    pub const fn require(permissions: &'static [Permission]) -> Self {
        Self {
            required_permissions: permissions,
            allowed_roles: &[],
        }
    }

    pub const fn restrict_to(roles: &'static [Role]) -> Self {
        Self {
            required_permissions: &[],
            allowed_roles: roles,
        }
    }
}

/// Tenant Access Enforcer.
///
/// Admit iff the principal is superadmin (unconditionally) or is homed in
/// the active tenant. The resolver already pins non-superadmins to their home
/// tenant; this check still runs on every operation so a handler reached
/// through any other path cannot cross tenants.
pub fn enforce_tenant_access(
    principal: &Principal,
    active: ActiveTenant,
) -> Result<(), AuthzError> {
    if principal.is_superadmin() {
        return Ok(());
    }
    match principal.home_tenant_id {
        None => Err(AuthzError::MissingTenant),
        Some(home) if home == active.tenant_id() => Ok(()),
        Some(_) => Err(AuthzError::TenantAccessDenied),
    }
}

/// Role Enforcer: admit iff the allow-list is empty or names the principal's role.
pub fn enforce_roles(principal: &Principal, allowed: &[Role]) -> Result<(), AuthzError> {
    if allowed.is_empty() || allowed.contains(&principal.role.name) {
        return Ok(());
    }
    Err(AuthzError::Forbidden(format!(
        "role '{}' is not allowed to perform this operation",
        principal.role.name
    )))
}

/// Permission Enforcer: admit iff the requirement set is empty or intersects
/// the principal's permission set on at least one element (OR semantics).
pub fn enforce_permissions(
    principal: &Principal,
    required: &[Permission],
) -> Result<(), AuthzError> {
    if required.is_empty() {
        return Ok(());
    }
    if required.iter().any(|p| principal.has_permission(p)) {
        return Ok(());
    }
    let wanted: Vec<&str> = required.iter().map(Permission::as_str).collect();
    Err(AuthzError::Forbidden(format!(
        "requires one of: {}",
        wanted.join(", ")
    )))
}

/// The ordered admission chain: tenant access, then roles, then permissions.
/// Short-circuits on the first denial; the order is part of the contract
/// (tenant confinement is checked before any finer-grained requirement).
pub fn authorize_operation(
    principal: &Principal,
    active: ActiveTenant,
    policy: &OperationPolicy,
) -> Result<(), AuthzError> {
    enforce_tenant_access(principal, active)?;
    enforce_roles(principal, policy.allowed_roles)?;
    enforce_permissions(principal, policy.required_permissions)?;
    Ok(())
}

/// Convenience for audit logs: the tenant pair behind a denial.
pub fn tenant_pair(principal: &Principal, active: ActiveTenant) -> (Option<TenantId>, TenantId) {
    (principal.home_tenant_id, active.tenant_id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::principal::{RoleBinding, UserStatus};
    use crate::SUPERADMIN;
    use atlaserp_core::UserId;

    fn principal(role: Role, home: Option<TenantId>, perms: Vec<Permission>) -> Principal {
        Principal {
            user_id: UserId::new(),
            email: "lee@example.com".to_string(),
            home_tenant_id: home,
            role: RoleBinding {
                name: role,
                permissions: perms,
            },
            status: UserStatus::Active,
        }
    }

    #[test]
    fn home_tenant_is_admitted() {
        let home = TenantId::new();
        let p = principal(Role::new("admin"), Some(home), vec![]);
        assert!(enforce_tenant_access(&p, ActiveTenant::new(home)).is_ok());
    }

    #[test]
    fn foreign_tenant_is_denied() {
        let p = principal(Role::new("admin"), Some(TenantId::new()), vec![]);
        assert_eq!(
            enforce_tenant_access(&p, ActiveTenant::new(TenantId::new())),
            Err(AuthzError::TenantAccessDenied)
        );
    }

    #[test]
    fn superadmin_crosses_tenants() {
        let p = principal(SUPERADMIN, Some(TenantId::new()), vec![]);
        assert!(enforce_tenant_access(&p, ActiveTenant::new(TenantId::new())).is_ok());
    }

    #[test]
    fn missing_home_tenant_is_denied() {
        let p = principal(Role::new("admin"), None, vec![]);
        assert_eq!(
            enforce_tenant_access(&p, ActiveTenant::new(TenantId::new())),
            Err(AuthzError::MissingTenant)
        );
    }

    #[test]
    fn empty_role_list_admits_everyone() {
        let p = principal(Role::new("clerk"), Some(TenantId::new()), vec![]);
        assert!(enforce_roles(&p, &[]).is_ok());
    }

    #[test]
    fn role_allow_list_admits_member() {
        let p = principal(Role::new("accountant"), Some(TenantId::new()), vec![]);
        assert!(enforce_roles(&p, &[Role::from_static("accountant")]).is_ok());
        assert!(matches!(
            enforce_roles(&p, &[Role::from_static("warehouse")]),
            Err(AuthzError::Forbidden(_))
        ));
    }

    #[test]
    fn empty_permission_requirement_admits() {
        let p = principal(Role::new("clerk"), Some(TenantId::new()), vec![]);
        assert!(enforce_permissions(&p, &[]).is_ok());
    }

    #[test]
    fn any_one_required_permission_suffices() {
        let p = principal(
            Role::new("clerk"),
            Some(TenantId::new()),
            vec![Permission::new("b")],
        );
        let required = [Permission::from_static("a"), Permission::from_static("b")];
        assert!(enforce_permissions(&p, &required).is_ok());
    }

    #[test]
    fn disjoint_permissions_are_denied() {
        let p = principal(
            Role::new("clerk"),
            Some(TenantId::new()),
            vec![Permission::new("c")],
        );
        let required = [Permission::from_static("a"), Permission::from_static("b")];
        assert!(matches!(
            enforce_permissions(&p, &required),
            Err(AuthzError::Forbidden(_))
        ));
    }

    #[test]
    fn chain_checks_tenant_before_permissions() {
        // Holder of the right permission, wrong tenant: the denial must be
        // tenant access, not a permission failure.
        let p = principal(
            Role::new("clerk"),
            Some(TenantId::new()),
            vec![Permission::new("partners.manage")],
        );
        static POLICY_PERMS: [Permission; 1] = [Permission::from_static("partners.manage")];
        const POLICY: OperationPolicy = OperationPolicy::require(&POLICY_PERMS);
        assert_eq!(
            authorize_operation(&p, ActiveTenant::new(TenantId::new()), &POLICY),
            Err(AuthzError::TenantAccessDenied)
        );
    }

    #[test]
    fn chain_admits_when_all_pass() {
        let home = TenantId::new();
        let p = principal(
            Role::new("sales"),
            Some(home),
            vec![Permission::new("partners.manage")],
        );
        const POLICY: OperationPolicy = OperationPolicy {
            required_permissions: &[Permission::from_static("partners.manage")],
            allowed_roles: &[Role::from_static("sales"), Role::from_static("admin")],
        };
        assert!(authorize_operation(&p, ActiveTenant::new(home), &POLICY).is_ok());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: a principal is admitted by the permission enforcer
            /// iff the requirement is empty, they hold the wildcard, or the
            /// two sets intersect.
            #[test]
            fn or_semantics_hold(
                held in proptest::collection::vec("[a-d]\\.[a-d]", 0..5),
                required in proptest::collection::vec("[a-d]\\.[a-d]", 0..5),
                wildcard in any::<bool>(),
            ) {
                let mut perms: Vec<Permission> = held.iter().cloned().map(Permission::new).collect();
                if wildcard {
                    perms.push(Permission::new("*"));
                }
                let home = TenantId::new();
                let p = principal(Role::new("clerk"), Some(home), perms);

                let required_perms: Vec<Permission> =
                    required.iter().cloned().map(Permission::new).collect();
                let admitted = enforce_permissions(&p, &required_perms).is_ok();

                let expected = required.is_empty()
                    || wildcard
                    || required.iter().any(|r| held.contains(r));
                prop_assert_eq!(admitted, expected);
            }

            /// Property: the role enforcer never consults permissions and the
            /// permission enforcer never consults the role name.
            #[test]
            fn enforcers_are_independent(
                role in "[a-z]{3,8}",
                allowed in proptest::collection::vec("[a-z]{3,8}", 0..4),
            ) {
                let home = TenantId::new();
                let with_perms = principal(
                    Role::new(role.clone()),
                    Some(home),
                    vec![Permission::new("*")],
                );
                let without_perms = principal(Role::new(role.clone()), Some(home), vec![]);

                let allowed_roles: Vec<Role> = allowed.iter().cloned().map(Role::new).collect();
                prop_assert_eq!(
                    enforce_roles(&with_perms, &allowed_roles).is_ok(),
                    enforce_roles(&without_perms, &allowed_roles).is_ok()
                );
            }
        }
    }
}
