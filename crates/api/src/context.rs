use std::sync::Arc;

use atlaserp_auth::Principal;

/// Principal context for a request (authenticated identity + role binding).
///
/// Wraps the resolved principal in an `Arc` so the extension clones cheaply;
/// the principal itself is immutable for the request's lifetime. The active
/// tenant travels separately as [`atlaserp_auth::ActiveTenant`] (`Copy`).
#[derive(Debug, Clone)]
pub struct PrincipalContext(Arc<Principal>);

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self(Arc::new(principal))
    }

    pub fn principal(&self) -> &Principal {
        &self.0
    }
}
