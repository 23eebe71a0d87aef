use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use atlaserp_auth::AuthzError;
use atlaserp_core::DomainError;

/// Map an authorization failure to its fixed status class.
///
/// Everything except a missing/invalid credential is a 403: the caller is
/// known, the operation is simply not allowed. Tenant-related failures do
/// not reveal whether the tenant in question exists beyond what the error
/// class itself implies.
pub fn authz_error_response(err: &AuthzError) -> axum::response::Response {
    match err {
        AuthzError::Unauthenticated => {
            json_error(StatusCode::UNAUTHORIZED, "unauthenticated", err.to_string())
        }
        AuthzError::MissingTenant => {
            json_error(StatusCode::FORBIDDEN, "missing_tenant", err.to_string())
        }
        AuthzError::UnknownTenant => {
            json_error(StatusCode::FORBIDDEN, "unknown_tenant", err.to_string())
        }
        AuthzError::TenantAccessDenied => json_error(
            StatusCode::FORBIDDEN,
            "tenant_access_denied",
            err.to_string(),
        ),
        AuthzError::Forbidden(_) => {
            json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string())
        }
    }
}

/// Map a domain failure to its fixed status class.
///
/// `NotFound` stays a bare 404 by design: rows owned by another tenant and
/// rows that never existed produce byte-identical responses.
pub fn domain_error_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::Unauthorized => json_error(StatusCode::FORBIDDEN, "unauthorized", "unauthorized"),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
