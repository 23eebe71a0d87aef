use axum::{Extension, Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

use atlaserp_auth::{ActiveTenant, OperationPolicy};

use crate::app::errors;
use crate::authz;
use crate::context::PrincipalContext;

/// GET /health — public liveness probe.
pub async fn health() -> axum::response::Response {
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}

/// GET /whoami — echo the resolved principal and active tenant.
///
/// Requires authentication only; useful for clients to discover which
/// company a given token (plus optional override header) lands on.
pub async fn whoami(
    Extension(principal): Extension<PrincipalContext>,
    Extension(active): Extension<ActiveTenant>,
) -> axum::response::Response {
    if let Err(e) = authz::guard(&principal, active, &OperationPolicy::OPEN) {
        return errors::authz_error_response(&e);
    }

    let p = principal.principal();
    (
        StatusCode::OK,
        Json(json!({
            "user_id": p.user_id,
            "email": p.email,
            "role": p.role.name,
            "permissions": p.role.permissions,
            "home_tenant_id": p.home_tenant_id,
            "active_tenant_id": active.tenant_id(),
        })),
    )
        .into_response()
}
