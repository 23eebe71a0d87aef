use axum::{Router, routing::get};

pub mod companies;
pub mod partners;
pub mod system;
pub mod users;

/// Router for all authenticated (tenant-scoped) endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/companies", companies::router())
        .nest("/users", users::router())
        .nest("/partners", partners::router())
}
