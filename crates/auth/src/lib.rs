//! `atlaserp-auth` — pure authentication/authorization boundary (zero-trust).
//!
//! This crate is intentionally decoupled from HTTP and storage. The API layer
//! feeds it a bearer token and the tenant-override header value; storage is
//! reached only through the narrow [`PrincipalSource`] and [`TenantDirectory`]
//! collaborator traits.

pub mod claims;
pub mod enforce;
pub mod error;
pub mod identity;
pub mod permissions;
pub mod principal;
pub mod roles;
pub mod tenancy;
pub mod token;

pub use claims::{Claims, TokenValidationError, validate_window};
pub use enforce::{
    OperationPolicy, authorize_operation, enforce_permissions, enforce_roles,
    enforce_tenant_access,
};
pub use error::AuthzError;
pub use identity::{IdentityResolver, PrincipalSource};
pub use permissions::Permission;
pub use principal::{Principal, RoleBinding, UserStatus};
pub use roles::{Role, SUPERADMIN};
pub use tenancy::{ActiveTenant, COMPANY_HEADER, TenantDirectory, resolve_active_tenant};
pub use token::{Hs256TokenVerifier, TokenVerifier};
