//! Business partner routes (customers and suppliers).

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use atlaserp_auth::{ActiveTenant, OperationPolicy, Permission};
use atlaserp_core::PartnerId;
use atlaserp_parties::{ContactInfo, NewPartner, PartnerUpdate};

use crate::app::{AppServices, dto, errors};
use crate::authz;
use crate::context::PrincipalContext;

/// Readable with the dedicated read permission or the manage permission.
static READ_PERMS: [Permission; 2] = [
    Permission::from_static("partners.read"),
    Permission::from_static("partners.manage"),
];
const READ: OperationPolicy = OperationPolicy::require(&READ_PERMS);

static MANAGE_PERMS: [Permission; 1] = [Permission::from_static("partners.manage")];
const MANAGE: OperationPolicy = OperationPolicy::require(&MANAGE_PERMS);

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_partners).post(create_partner))
        .route(
            "/:id",
            get(get_partner).patch(update_partner).delete(delete_partner),
        )
}

pub async fn create_partner(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(active): Extension<ActiveTenant>,
    Json(body): Json<dto::CreatePartnerRequest>,
) -> axum::response::Response {
    if let Err(e) = authz::guard(&principal, active, &MANAGE) {
        return errors::authz_error_response(&e);
    }

    // body.tenant_id is intentionally not consulted: the repository stamps
    // the active tenant on every create.
    let new = NewPartner {
        kind: body.kind,
        name: body.name,
        tax_id: body.tax_id,
        contact: body.contact.unwrap_or_else(ContactInfo::default),
    };

    match services.partners.create(active, new) {
        Ok(partner) => {
            (StatusCode::CREATED, Json(dto::partner_to_json(&partner))).into_response()
        }
        Err(e) => errors::domain_error_response(e),
    }
}

pub async fn list_partners(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(active): Extension<ActiveTenant>,
) -> axum::response::Response {
    if let Err(e) = authz::guard(&principal, active, &READ) {
        return errors::authz_error_response(&e);
    }

    let items: Vec<_> = services
        .partners
        .list(active)
        .iter()
        .map(dto::partner_to_json)
        .collect();
    (
        StatusCode::OK,
        Json(serde_json::json!({ "items": items })),
    )
        .into_response()
}

pub async fn get_partner(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(active): Extension<ActiveTenant>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::guard(&principal, active, &READ) {
        return errors::authz_error_response(&e);
    }

    let id: PartnerId = match id.parse() {
        Ok(id) => id,
        Err(e) => return errors::domain_error_response(e),
    };

    match services.partners.get(active, id) {
        Ok(partner) => (StatusCode::OK, Json(dto::partner_to_json(&partner))).into_response(),
        Err(e) => errors::domain_error_response(e),
    }
}

pub async fn update_partner(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(active): Extension<ActiveTenant>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdatePartnerRequest>,
) -> axum::response::Response {
    if let Err(e) = authz::guard(&principal, active, &MANAGE) {
        return errors::authz_error_response(&e);
    }

    let id: PartnerId = match id.parse() {
        Ok(id) => id,
        Err(e) => return errors::domain_error_response(e),
    };

    let update = PartnerUpdate {
        name: body.name,
        tax_id: body.tax_id,
        contact: body.contact,
    };

    match services.partners.update(active, id, update) {
        Ok(partner) => (StatusCode::OK, Json(dto::partner_to_json(&partner))).into_response(),
        Err(e) => errors::domain_error_response(e),
    }
}

pub async fn delete_partner(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(active): Extension<ActiveTenant>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::guard(&principal, active, &MANAGE) {
        return errors::authz_error_response(&e);
    }

    let id: PartnerId = match id.parse() {
        Ok(id) => id,
        Err(e) => return errors::domain_error_response(e),
    };

    match services.partners.remove(active, id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_response(e),
    }
}
