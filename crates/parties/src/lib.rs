//! `atlaserp-parties` — business partners (customers and suppliers).
//!
//! Tenant-owned records with a per-tenant unique tax id. Persistence and
//! authorization live elsewhere; this crate only models the record and its
//! deterministic validation rules.

pub mod partner;

pub use partner::{
    ContactInfo, NewPartner, Partner, PartnerKind, PartnerStatus, PartnerUpdate,
};
