//! Company/user/role directories backing identity and tenant resolution.
//!
//! Users and roles are tenant-scoped rows; the single exception is the
//! `superadmin` role, whose row carries no tenant. Companies are the tenants
//! themselves and are therefore not tenant-keyed.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atlaserp_auth::{
    Permission, Principal, PrincipalSource, Role, RoleBinding, TenantDirectory, UserStatus,
};
use atlaserp_core::{DomainError, DomainResult, TenantId, UserId};

/// Tenant-scoped settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySettings {
    /// ISO 4217 currency code.
    pub currency: String,
    /// VAT rate in basis points (e.g. 1900 = 19%).
    pub vat_rate_bps: u32,
    /// Feature flag: asset tracking module.
    pub asset_tracking_enabled: bool,
}

impl Default for CompanySettings {
    fn default() -> Self {
        Self {
            currency: "EUR".to_string(),
            vat_rate_bps: 1900,
            asset_tracking_enabled: false,
        }
    }
}

/// A company row — the isolation boundary itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub id: TenantId,
    pub name: String,
    pub settings: CompanySettings,
    pub created_at: DateTime<Utc>,
}

impl CompanyRecord {
    pub fn new(name: impl Into<String>, settings: CompanySettings) -> Self {
        Self {
            id: TenantId::new(),
            name: name.into(),
            settings,
            created_at: Utc::now(),
        }
    }
}

/// A role row: named permission bundle, tenant-scoped unless superadmin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    pub name: Role,
    /// `None` only for the distinguished superadmin role.
    pub tenant_id: Option<TenantId>,
    pub permissions: Vec<Permission>,
}

/// A user row. Exactly one role per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub tenant_id: Option<TenantId>,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

/// In-memory directory for dev/tests.
///
/// Interior mutability with short-lived `RwLock` guards; nothing is held
/// across an await point (all methods are sync).
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    companies: RwLock<HashMap<TenantId, CompanyRecord>>,
    users: RwLock<HashMap<UserId, UserRecord>>,
    roles: RwLock<HashMap<(Option<TenantId>, String), RoleRecord>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    // ── companies ────────────────────────────────────────────────────────

    pub fn insert_company(&self, company: CompanyRecord) -> TenantId {
        let id = company.id;
        self.companies.write().unwrap().insert(id, company);
        id
    }

    pub fn get_company(&self, id: TenantId) -> Option<CompanyRecord> {
        self.companies.read().unwrap().get(&id).cloned()
    }

    pub fn list_companies(&self) -> Vec<CompanyRecord> {
        let mut all: Vec<CompanyRecord> =
            self.companies.read().unwrap().values().cloned().collect();
        all.sort_by_key(|c| (c.created_at, *c.id.as_uuid()));
        all
    }

    // ── roles ────────────────────────────────────────────────────────────

    /// Insert a role definition. Tenant-scoped roles may reuse names across
    /// tenants; a tenant-less role is only valid for superadmin.
    pub fn insert_role(&self, role: RoleRecord) -> DomainResult<()> {
        if role.tenant_id.is_none() && !role.name.is_superadmin() {
            return Err(DomainError::invariant(
                "only the superadmin role may exist without a tenant",
            ));
        }
        let key = (role.tenant_id, role.name.as_str().to_string());
        self.roles.write().unwrap().insert(key, role);
        Ok(())
    }

    pub fn get_role(&self, tenant_id: Option<TenantId>, name: &Role) -> Option<RoleRecord> {
        self.roles
            .read()
            .unwrap()
            .get(&(tenant_id, name.as_str().to_string()))
            .cloned()
    }

    /// Resolve the role row a user's binding points at: the tenant-scoped
    /// row first, falling back to the global superadmin row.
    fn resolve_role(&self, tenant_id: Option<TenantId>, name: &Role) -> Option<RoleRecord> {
        self.get_role(tenant_id, name)
            .or_else(|| self.get_role(None, name).filter(|r| r.name.is_superadmin()))
    }

    // ── users ────────────────────────────────────────────────────────────

    pub fn insert_user(&self, user: UserRecord) -> UserId {
        let id = user.id;
        self.users.write().unwrap().insert(id, user);
        id
    }

    pub fn get_user(&self, id: UserId) -> Option<UserRecord> {
        self.users.read().unwrap().get(&id).cloned()
    }

    /// Fetch a user filtered by id AND tenant — the combined filter the
    /// scoped-accessor contract mandates for every mutation target.
    pub fn user_in_tenant(&self, tenant_id: TenantId, id: UserId) -> Option<UserRecord> {
        self.get_user(id).filter(|u| u.tenant_id == Some(tenant_id))
    }

    pub fn users_in_tenant(&self, tenant_id: TenantId) -> Vec<UserRecord> {
        let mut users: Vec<UserRecord> = self
            .users
            .read()
            .unwrap()
            .values()
            .filter(|u| u.tenant_id == Some(tenant_id))
            .cloned()
            .collect();
        users.sort_by_key(|u| (u.created_at, *u.id.as_uuid()));
        users
    }

    pub fn set_user_status(
        &self,
        tenant_id: TenantId,
        id: UserId,
        status: UserStatus,
    ) -> DomainResult<UserRecord> {
        let mut users = self.users.write().unwrap();
        let user = users
            .get_mut(&id)
            .filter(|u| u.tenant_id == Some(tenant_id))
            .ok_or(DomainError::NotFound)?;
        user.status = status;
        Ok(user.clone())
    }
}

impl PrincipalSource for InMemoryDirectory {
    fn load_principal(&self, user_id: UserId) -> Option<Principal> {
        let user = self.get_user(user_id)?;
        // A user whose role row vanished resolves to nothing: fail closed.
        let role = self.resolve_role(user.tenant_id, &user.role)?;
        Some(Principal {
            user_id: user.id,
            email: user.email,
            home_tenant_id: user.tenant_id,
            role: RoleBinding {
                name: role.name,
                permissions: role.permissions,
            },
            status: user.status,
        })
    }
}

impl TenantDirectory for InMemoryDirectory {
    fn tenant_exists(&self, tenant_id: TenantId) -> bool {
        self.companies.read().unwrap().contains_key(&tenant_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlaserp_auth::SUPERADMIN;

    fn company(dir: &InMemoryDirectory, name: &str) -> TenantId {
        dir.insert_company(CompanyRecord::new(name, CompanySettings::default()))
    }

    fn role(dir: &InMemoryDirectory, tenant: Option<TenantId>, name: Role, perms: &[&str]) {
        dir.insert_role(RoleRecord {
            name,
            tenant_id: tenant,
            permissions: perms.iter().map(|p| Permission::new(p.to_string())).collect(),
        })
        .unwrap();
    }

    fn user(dir: &InMemoryDirectory, tenant: Option<TenantId>, role_name: &str) -> UserId {
        dir.insert_user(UserRecord {
            id: UserId::new(),
            email: "person@example.com".to_string(),
            tenant_id: tenant,
            role: Role::new(role_name.to_string()),
            status: UserStatus::Active,
            created_at: Utc::now(),
        })
    }

    #[test]
    fn load_principal_joins_user_role_and_permissions() {
        let dir = InMemoryDirectory::new();
        let t1 = company(&dir, "Acme");
        role(&dir, Some(t1), Role::new("sales"), &["partners.manage"]);
        let uid = user(&dir, Some(t1), "sales");

        let principal = dir.load_principal(uid).unwrap();
        assert_eq!(principal.home_tenant_id, Some(t1));
        assert_eq!(principal.role.name.as_str(), "sales");
        assert!(principal.has_permission(&Permission::new("partners.manage")));
    }

    #[test]
    fn load_principal_fails_closed_without_role_row() {
        let dir = InMemoryDirectory::new();
        let t1 = company(&dir, "Acme");
        let uid = user(&dir, Some(t1), "ghost-role");

        assert!(dir.load_principal(uid).is_none());
    }

    #[test]
    fn role_names_do_not_collide_across_tenants() {
        let dir = InMemoryDirectory::new();
        let t1 = company(&dir, "Acme");
        let t2 = company(&dir, "Globex");
        role(&dir, Some(t1), Role::new("admin"), &["*"]);
        role(&dir, Some(t2), Role::new("admin"), &["partners.read"]);

        let u1 = user(&dir, Some(t1), "admin");
        let u2 = user(&dir, Some(t2), "admin");

        assert!(dir
            .load_principal(u1)
            .unwrap()
            .has_permission(&Permission::new("anything")));
        assert!(!dir
            .load_principal(u2)
            .unwrap()
            .has_permission(&Permission::new("anything")));
    }

    #[test]
    fn superadmin_role_is_global() {
        let dir = InMemoryDirectory::new();
        let t1 = company(&dir, "Acme");
        role(&dir, None, SUPERADMIN, &["*"]);
        let uid = user(&dir, Some(t1), "superadmin");

        let principal = dir.load_principal(uid).unwrap();
        assert!(principal.is_superadmin());
    }

    #[test]
    fn only_superadmin_may_be_tenantless() {
        let dir = InMemoryDirectory::new();
        let err = dir
            .insert_role(RoleRecord {
                name: Role::new("admin"),
                tenant_id: None,
                permissions: vec![],
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn user_in_tenant_misses_on_foreign_tenant() {
        let dir = InMemoryDirectory::new();
        let t1 = company(&dir, "Acme");
        let t2 = company(&dir, "Globex");
        role(&dir, Some(t1), Role::new("admin"), &["*"]);
        let uid = user(&dir, Some(t1), "admin");

        assert!(dir.user_in_tenant(t1, uid).is_some());
        assert!(dir.user_in_tenant(t2, uid).is_none());
    }

    #[test]
    fn tenant_exists_only_for_inserted_companies() {
        let dir = InMemoryDirectory::new();
        let t1 = company(&dir, "Acme");
        assert!(dir.tenant_exists(t1));
        assert!(!dir.tenant_exists(TenantId::new()));
    }
}
