use thiserror::Error;

/// Authorization pipeline error taxonomy.
///
/// Every variant is terminal for the request: it propagates unmodified to the
/// transport boundary, which maps it to a fixed status class. No enforcer
/// downgrades a failure, and authorization failures are never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// Missing/invalid/expired credential, or a credential whose subject no
    /// longer resolves to an active user. Surfaced identically in all cases
    /// so callers cannot probe which accounts exist.
    #[error("unauthenticated")]
    Unauthenticated,

    /// The principal has no resolvable home tenant, so no active tenant can
    /// be computed for the request.
    #[error("no tenant context could be resolved for this request")]
    MissingTenant,

    /// A tenant-override header named a tenant that does not exist.
    #[error("the requested company does not exist")]
    UnknownTenant,

    /// Authenticated, tenant resolved, but the principal is homed in a
    /// different tenant and is not superadmin.
    #[error("access to the requested company is denied")]
    TenantAccessDenied,

    /// Tenant-authorized, but the operation's permission or role requirement
    /// is unmet.
    #[error("forbidden: {0}")]
    Forbidden(String),
}
