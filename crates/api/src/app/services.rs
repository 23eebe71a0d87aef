use std::sync::Arc;

use atlaserp_core::PartnerId;
use atlaserp_infra::{InMemoryDirectory, InMemoryTenantStore, PartnerRepository};
use atlaserp_parties::Partner;

/// Service registry shared by all handlers.
///
/// Everything is explicitly constructed and injected — no ambient globals.
/// The in-memory backends satisfy the same store traits a persistent
/// deployment would implement.
pub struct AppServices {
    pub directory: Arc<InMemoryDirectory>,
    pub partners: PartnerRepository<Arc<InMemoryTenantStore<PartnerId, Partner>>>,
}

impl AppServices {
    pub fn in_memory() -> Self {
        Self {
            directory: Arc::new(InMemoryDirectory::new()),
            partners: PartnerRepository::new(Arc::new(InMemoryTenantStore::new())),
        }
    }
}
