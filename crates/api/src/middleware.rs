use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use atlaserp_auth::{
    AuthzError, COMPANY_HEADER, IdentityResolver, TenantDirectory, resolve_active_tenant,
};

use crate::app::errors;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub identity: Arc<IdentityResolver>,
    pub companies: Arc<dyn TenantDirectory>,
}

/// Authentication + tenant-resolution middleware for all guarded routes.
///
/// Contexts are attached only after the whole resolution succeeds; a request
/// aborted midway leaves no partial tenant context behind.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = match extract_bearer(req.headers()) {
        Ok(token) => token,
        Err(e) => return errors::authz_error_response(&e),
    };

    let principal = match state.identity.resolve(token, Utc::now()) {
        Ok(principal) => principal,
        Err(e) => return errors::authz_error_response(&e),
    };

    let override_header = req
        .headers()
        .get(COMPANY_HEADER)
        .and_then(|v| v.to_str().ok());

    let active = match resolve_active_tenant(&principal, override_header, state.companies.as_ref())
    {
        Ok(active) => active,
        Err(e) => return errors::authz_error_response(&e),
    };

    req.extensions_mut().insert(active);
    req.extensions_mut().insert(PrincipalContext::new(principal));

    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthzError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(AuthzError::Unauthenticated)?;

    let header = header.to_str().map_err(|_| AuthzError::Unauthenticated)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(AuthzError::Unauthenticated)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(AuthzError::Unauthenticated);
    }

    Ok(token)
}
