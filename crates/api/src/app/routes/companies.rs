//! Company (tenant) management. Superadmin only: companies are the isolation
//! boundaries themselves, so they are not reachable through tenant-scoped
//! permissions.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use atlaserp_auth::{ActiveTenant, OperationPolicy, Role, SUPERADMIN};
use atlaserp_core::TenantId;
use atlaserp_infra::CompanyRecord;

use crate::app::{AppServices, dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

static MANAGE_ROLES: [Role; 1] = [SUPERADMIN];
const MANAGE: OperationPolicy = OperationPolicy::restrict_to(&MANAGE_ROLES);

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_companies).post(create_company))
        .route("/:id", get(get_company))
}

pub async fn create_company(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(active): Extension<ActiveTenant>,
    Json(body): Json<dto::CreateCompanyRequest>,
) -> axum::response::Response {
    if let Err(e) = authz::guard(&principal, active, &MANAGE) {
        return errors::authz_error_response(&e);
    }

    let name = body.name.trim().to_string();
    if name.is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "company name cannot be empty",
        );
    }

    let company = CompanyRecord::new(name, body.settings());
    services.directory.insert_company(company.clone());
    tracing::info!(tenant_id = %company.id, "company created");

    (StatusCode::CREATED, Json(dto::company_to_json(&company))).into_response()
}

pub async fn list_companies(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(active): Extension<ActiveTenant>,
) -> axum::response::Response {
    if let Err(e) = authz::guard(&principal, active, &MANAGE) {
        return errors::authz_error_response(&e);
    }

    let items: Vec<_> = services
        .directory
        .list_companies()
        .iter()
        .map(dto::company_to_json)
        .collect();
    (
        StatusCode::OK,
        Json(serde_json::json!({ "items": items })),
    )
        .into_response()
}

pub async fn get_company(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(active): Extension<ActiveTenant>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::guard(&principal, active, &MANAGE) {
        return errors::authz_error_response(&e);
    }

    let id: TenantId = match id.parse() {
        Ok(id) => id,
        Err(e) => return errors::domain_error_response(e),
    };

    match services.directory.get_company(id) {
        Some(company) => {
            (StatusCode::OK, Json(dto::company_to_json(&company))).into_response()
        }
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
    }
}
