//! API-side admission guard.
//!
//! Thin wrapper over [`atlaserp_auth::authorize_operation`] that adds the
//! request-level audit log. Handlers call this before touching any store.

use atlaserp_auth::{ActiveTenant, AuthzError, OperationPolicy, authorize_operation, enforce};

use crate::context::PrincipalContext;

/// Run the ordered admission chain for one operation.
pub fn guard(
    principal: &PrincipalContext,
    active: ActiveTenant,
    policy: &OperationPolicy,
) -> Result<(), AuthzError> {
    let p = principal.principal();
    match authorize_operation(p, active, policy) {
        Ok(()) => {
            tracing::debug!(
                user_id = %p.user_id,
                role = %p.role.name,
                active_tenant = %active,
                "operation admitted"
            );
            Ok(())
        }
        Err(e) => {
            let (home, active_id) = enforce::tenant_pair(p, active);
            tracing::warn!(
                user_id = %p.user_id,
                role = %p.role.name,
                home_tenant = ?home,
                active_tenant = %active_id,
                error = %e,
                "operation denied"
            );
            Err(e)
        }
    }
}
