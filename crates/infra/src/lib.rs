//! Infrastructure layer: tenant-isolated storage and the identity/tenant
//! directories backing the auth collaborator traits.
//!
//! Everything here is in-memory. The store traits are the seam a persistent
//! backend would implement; the contract (tenant-keyed reads, stamped writes,
//! combined id+tenant re-fetch on mutation) does not change with the backend.

pub mod directory;
pub mod partners;
pub mod store;

pub use directory::{CompanyRecord, CompanySettings, InMemoryDirectory, RoleRecord, UserRecord};
pub use partners::PartnerRepository;
pub use store::{InMemoryTenantStore, TenantStore};
