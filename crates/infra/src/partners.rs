//! Partner repository: the scoped-data-accessor contract applied to partners.
//!
//! Every read filters by the active tenant, every create stamps the active
//! tenant (whatever the caller's payload claimed), and every mutation
//! re-fetches by `(tenant_id, id)` first. A row owned by another tenant is
//! reported as plain `NotFound` — indistinguishable from a row that was never
//! created, so existence cannot be probed across tenants.

use chrono::Utc;

use atlaserp_auth::ActiveTenant;
use atlaserp_core::{DomainError, DomainResult, PartnerId, TenantId, TenantOwned};
use atlaserp_parties::{NewPartner, Partner, PartnerUpdate};

use crate::store::TenantStore;

/// Tenant-scoped partner repository over any [`TenantStore`] backend.
pub struct PartnerRepository<S> {
    store: S,
}

impl<S> PartnerRepository<S>
where
    S: TenantStore<PartnerId, Partner>,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Register a partner under the active tenant.
    ///
    /// The tenant id is taken from the request context only. The tax id must
    /// be unique within that tenant; the duplicate check is itself
    /// tenant-filtered, so the same tax id may exist under other tenants.
    pub fn create(&self, active: ActiveTenant, new: NewPartner) -> DomainResult<Partner> {
        let tenant_id = active.tenant_id();
        let partner = Partner::create(tenant_id, new, Utc::now())?;

        if self.tax_id_taken(tenant_id, partner.tax_id(), None) {
            return Err(duplicate_tax_id(partner.tax_id()));
        }

        self.store.upsert(tenant_id, partner.id(), partner.clone());
        tracing::debug!(tenant_id = %tenant_id, partner_id = %partner.id(), "partner registered");
        Ok(partner)
    }

    pub fn get(&self, active: ActiveTenant, id: PartnerId) -> DomainResult<Partner> {
        self.store
            .get(active.tenant_id(), &id)
            .ok_or(DomainError::NotFound)
    }

    pub fn list(&self, active: ActiveTenant) -> Vec<Partner> {
        let mut partners = self.store.list(active.tenant_id());
        // UUIDv7 ids break timestamp ties deterministically.
        partners.sort_by_key(|p| (p.created_at(), *p.id().as_uuid()));
        partners
    }

    /// Update a partner within the active tenant.
    ///
    /// The target is re-fetched filtered by id AND tenant id; a miss on the
    /// combined filter is `NotFound`, whether the row is absent or foreign.
    pub fn update(
        &self,
        active: ActiveTenant,
        id: PartnerId,
        update: PartnerUpdate,
    ) -> DomainResult<Partner> {
        let tenant_id = active.tenant_id();
        let mut partner = self.get(active, id)?;

        if let Some(tax_id) = &update.tax_id {
            let normalized = tax_id.trim().to_uppercase();
            if normalized != partner.tax_id()
                && self.tax_id_taken(tenant_id, &normalized, Some(id))
            {
                return Err(duplicate_tax_id(&normalized));
            }
        }

        partner.apply_update(update)?;
        self.store.upsert(tenant_id, id, partner.clone());
        Ok(partner)
    }

    /// Delete a partner within the active tenant.
    pub fn remove(&self, active: ActiveTenant, id: PartnerId) -> DomainResult<()> {
        self.store
            .remove(active.tenant_id(), &id)
            .map(|_| ())
            .ok_or(DomainError::NotFound)
    }

    fn tax_id_taken(&self, tenant_id: TenantId, tax_id: &str, excluding: Option<PartnerId>) -> bool {
        self.store
            .list(tenant_id)
            .iter()
            .filter(|p| Some(p.id()) != excluding)
            .any(|p| p.tax_id() == tax_id && p.tenant_id() == tenant_id)
    }
}

/// Conflict message names the business key only — never the other record's
/// id or tenant.
fn duplicate_tax_id(tax_id: &str) -> DomainError {
    DomainError::conflict(format!("a partner with tax id '{tax_id}' already exists"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryTenantStore;
    use atlaserp_parties::{ContactInfo, PartnerKind};
    use std::sync::Arc;

    fn repo() -> PartnerRepository<Arc<InMemoryTenantStore<PartnerId, Partner>>> {
        PartnerRepository::new(Arc::new(InMemoryTenantStore::new()))
    }

    fn new_partner(tax_id: &str) -> NewPartner {
        NewPartner {
            kind: PartnerKind::Customer,
            name: "Initech Ltd".to_string(),
            tax_id: tax_id.to_string(),
            contact: ContactInfo::default(),
        }
    }

    #[test]
    fn create_stamps_the_active_tenant() {
        let repo = repo();
        let tenant = ActiveTenant::new(TenantId::new());

        let partner = repo.create(tenant, new_partner("FR-77")).unwrap();
        assert_eq!(partner.tenant_id(), tenant.tenant_id());
    }

    #[test]
    fn tax_id_is_unique_per_tenant_not_globally() {
        let repo = repo();
        let t1 = ActiveTenant::new(TenantId::new());
        let t2 = ActiveTenant::new(TenantId::new());

        repo.create(t1, new_partner("K-1")).unwrap();
        // Same key under another tenant is fine.
        repo.create(t2, new_partner("K-1")).unwrap();

        // Second under the same tenant conflicts.
        let err = repo.create(t1, new_partner("K-1")).unwrap_err();
        match err {
            DomainError::Conflict(msg) => {
                assert!(msg.contains("K-1"));
                assert!(!msg.contains(&t2.tenant_id().to_string()));
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn cross_tenant_get_is_a_plain_not_found() {
        let repo = repo();
        let t1 = ActiveTenant::new(TenantId::new());
        let t2 = ActiveTenant::new(TenantId::new());

        let partner = repo.create(t1, new_partner("K-2")).unwrap();

        assert_eq!(repo.get(t2, partner.id()), Err(DomainError::NotFound));
        // Identical to a genuinely absent id.
        assert_eq!(repo.get(t2, PartnerId::new()), Err(DomainError::NotFound));
    }

    #[test]
    fn cross_tenant_update_and_delete_miss() {
        let repo = repo();
        let t1 = ActiveTenant::new(TenantId::new());
        let t2 = ActiveTenant::new(TenantId::new());

        let partner = repo.create(t1, new_partner("K-3")).unwrap();

        let err = repo
            .update(t2, partner.id(), PartnerUpdate::default())
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);

        assert_eq!(repo.remove(t2, partner.id()), Err(DomainError::NotFound));
        // The row survived both attempts.
        assert!(repo.get(t1, partner.id()).is_ok());
    }

    #[test]
    fn update_recheck_allows_keeping_own_tax_id() {
        let repo = repo();
        let t1 = ActiveTenant::new(TenantId::new());
        let partner = repo.create(t1, new_partner("K-4")).unwrap();

        // Re-submitting the same tax id is not a conflict with itself.
        let updated = repo
            .update(
                t1,
                partner.id(),
                PartnerUpdate {
                    tax_id: Some("k-4".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.tax_id(), "K-4");
    }

    #[test]
    fn update_recheck_blocks_stealing_a_tax_id() {
        let repo = repo();
        let t1 = ActiveTenant::new(TenantId::new());
        repo.create(t1, new_partner("K-5")).unwrap();
        let second = repo.create(t1, new_partner("K-6")).unwrap();

        let err = repo
            .update(
                t1,
                second.id(),
                PartnerUpdate {
                    tax_id: Some("K-5".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn list_is_tenant_scoped_and_creation_ordered() {
        let repo = repo();
        let t1 = ActiveTenant::new(TenantId::new());
        let t2 = ActiveTenant::new(TenantId::new());

        let a = repo.create(t1, new_partner("A-1")).unwrap();
        let b = repo.create(t1, new_partner("A-2")).unwrap();
        repo.create(t2, new_partner("B-1")).unwrap();

        let listed = repo.list(t1);
        assert_eq!(
            listed.iter().map(|p| p.id()).collect::<Vec<_>>(),
            vec![a.id(), b.id()]
        );
    }
}
