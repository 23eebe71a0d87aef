use atlaserp_core::TenantId;

use crate::error::AuthzError;
use crate::principal::Principal;

/// Header a superadmin uses to act on behalf of another company.
pub const COMPANY_HEADER: &str = "x-company-id";

/// The tenant id the current request is authorized to operate against.
///
/// Computed once per request, after identity resolution and before any
/// enforcer or handler runs; attached to the request as an immutable value
/// and discarded at request end. Every tenant-scoped read/write must filter
/// or stamp with this id.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ActiveTenant(TenantId);

impl ActiveTenant {
    pub fn new(tenant_id: TenantId) -> Self {
        Self(tenant_id)
    }

    pub fn tenant_id(&self) -> TenantId {
        self.0
    }
}

impl core::fmt::Display for ActiveTenant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Storage-side collaborator answering "does this tenant exist".
pub trait TenantDirectory: Send + Sync {
    fn tenant_exists(&self, tenant_id: TenantId) -> bool;
}

/// Compute the active tenant for a request.
///
/// One unified algorithm for every principal:
///
/// 1. a principal with no home tenant fails with [`AuthzError::MissingTenant`];
/// 2. a superadmin carrying a non-empty `X-Company-ID` header operates
///    against that company — the id must parse and the company must exist,
///    otherwise [`AuthzError::UnknownTenant`];
/// 3. everyone else (including a superadmin without the header) operates
///    against their home tenant.
///
/// An empty or whitespace-only header value is treated exactly like an
/// absent header: it falls back to the home tenant and is never an override.
pub fn resolve_active_tenant(
    principal: &Principal,
    header: Option<&str>,
    companies: &dyn TenantDirectory,
) -> Result<ActiveTenant, AuthzError> {
    let home = principal.home_tenant_id.ok_or(AuthzError::MissingTenant)?;

    if principal.is_superadmin() {
        let header = header.map(str::trim).filter(|v| !v.is_empty());
        if let Some(raw) = header {
            let requested: TenantId = raw.parse().map_err(|_| {
                tracing::warn!(header = raw, "unparsable tenant override header");
                AuthzError::UnknownTenant
            })?;
            if !companies.tenant_exists(requested) {
                tracing::warn!(tenant_id = %requested, "tenant override names a company that does not exist");
                return Err(AuthzError::UnknownTenant);
            }
            return Ok(ActiveTenant::new(requested));
        }
    }

    Ok(ActiveTenant::new(home))
}
