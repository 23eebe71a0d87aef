//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: infrastructure wiring (directories, repositories)
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use atlaserp_auth::{Hs256TokenVerifier, IdentityResolver};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Runtime configuration for the API process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: AppConfig) -> Router {
    let services = Arc::new(AppServices::in_memory());
    router(&config.jwt_secret, services)
}

/// Build the router over externally constructed services.
///
/// Tests use this to keep a handle on the directories for seeding.
pub fn router(jwt_secret: &str, services: Arc<AppServices>) -> Router {
    let verifier = Arc::new(Hs256TokenVerifier::new(jwt_secret.as_bytes()));
    let identity = Arc::new(IdentityResolver::new(verifier, services.directory.clone()));
    let auth_state = middleware::AuthState {
        identity,
        companies: services.directory.clone(),
    };

    // Guarded routes: authentication + tenant context on every request.
    let guarded = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    // Public routes are the ones composed outside the auth layer.
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(guarded)
        .layer(ServiceBuilder::new())
}
