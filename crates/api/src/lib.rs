//! HTTP API: server, routing, and request/response mapping.
//!
//! The per-request pipeline is fixed: authenticate (bearer token →
//! [`atlaserp_auth::Principal`]) → resolve the active tenant (honoring the
//! superadmin override header) → per-operation admission chain → handler.
//! Handlers receive the principal and active tenant as immutable request
//! extensions and must route every data access through them.

pub mod app;
pub mod authz;
pub mod context;
pub mod middleware;
