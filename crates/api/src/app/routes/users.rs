//! Tenant user administration.
//!
//! All lookups run through the active tenant: a user id from another company
//! is a plain 404 here, exactly like an id that never existed.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use atlaserp_auth::{ActiveTenant, OperationPolicy, Permission, Role, UserStatus};
use atlaserp_core::UserId;
use atlaserp_infra::UserRecord;

use crate::app::{AppServices, dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

/// Reading is open to both the dedicated read permission and managers.
static READ_PERMS: [Permission; 2] = [
    Permission::from_static("users.read"),
    Permission::from_static("users.manage"),
];
const READ: OperationPolicy = OperationPolicy::require(&READ_PERMS);

static MANAGE_PERMS: [Permission; 1] = [Permission::from_static("users.manage")];
const MANAGE: OperationPolicy = OperationPolicy::require(&MANAGE_PERMS);

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user))
        .route("/:id/suspend", post(suspend_user))
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(active): Extension<ActiveTenant>,
) -> axum::response::Response {
    if let Err(e) = authz::guard(&principal, active, &READ) {
        return errors::authz_error_response(&e);
    }

    let items: Vec<_> = services
        .directory
        .users_in_tenant(active.tenant_id())
        .iter()
        .map(dto::user_to_json)
        .collect();
    (
        StatusCode::OK,
        Json(serde_json::json!({ "items": items })),
    )
        .into_response()
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(active): Extension<ActiveTenant>,
    Json(body): Json<dto::CreateUserRequest>,
) -> axum::response::Response {
    if let Err(e) = authz::guard(&principal, active, &MANAGE) {
        return errors::authz_error_response(&e);
    }

    let email = body.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "invalid email format",
        );
    }

    // The role must be defined within the active tenant; tenant-less roles
    // (superadmin) are not assignable through this surface.
    let role = Role::new(body.role.clone());
    if services
        .directory
        .get_role(Some(active.tenant_id()), &role)
        .is_none()
    {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            format!("role '{}' is not defined for this company", role),
        );
    }

    let user = UserRecord {
        id: UserId::new(),
        email,
        // Stamped from the request context, never from the payload.
        tenant_id: Some(active.tenant_id()),
        role,
        status: UserStatus::Active,
        created_at: Utc::now(),
    };
    services.directory.insert_user(user.clone());
    tracing::info!(user_id = %user.id, tenant_id = %active, "user created");

    (StatusCode::CREATED, Json(dto::user_to_json(&user))).into_response()
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(active): Extension<ActiveTenant>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::guard(&principal, active, &READ) {
        return errors::authz_error_response(&e);
    }

    let id: UserId = match id.parse() {
        Ok(id) => id,
        Err(e) => return errors::domain_error_response(e),
    };

    match services.directory.user_in_tenant(active.tenant_id(), id) {
        Some(user) => (StatusCode::OK, Json(dto::user_to_json(&user))).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
    }
}

pub async fn suspend_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(active): Extension<ActiveTenant>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::guard(&principal, active, &MANAGE) {
        return errors::authz_error_response(&e);
    }

    let id: UserId = match id.parse() {
        Ok(id) => id,
        Err(e) => return errors::domain_error_response(e),
    };

    match services
        .directory
        .set_user_status(active.tenant_id(), id, UserStatus::Suspended)
    {
        Ok(user) => (StatusCode::OK, Json(dto::user_to_json(&user))).into_response(),
        Err(e) => errors::domain_error_response(e),
    }
}
