use std::sync::Arc;

use chrono::{DateTime, Utc};

use atlaserp_core::UserId;

use crate::error::AuthzError;
use crate::principal::{Principal, UserStatus};
use crate::token::TokenVerifier;

/// Storage-side collaborator: joins a stored user with its role and the
/// role's permissions into a [`Principal`].
///
/// Returning `None` means the subject does not resolve to a user any more;
/// the resolver fails closed on it.
pub trait PrincipalSource: Send + Sync {
    fn load_principal(&self, user_id: UserId) -> Option<Principal>;
}

/// Resolves a bearer credential into a request-scoped [`Principal`].
///
/// - No caching: the principal is rebuilt per request so role/permission
///   changes and suspensions apply immediately.
/// - Read-only: resolution never writes.
pub struct IdentityResolver {
    verifier: Arc<dyn TokenVerifier>,
    users: Arc<dyn PrincipalSource>,
}

impl IdentityResolver {
    pub fn new(verifier: Arc<dyn TokenVerifier>, users: Arc<dyn PrincipalSource>) -> Self {
        Self { verifier, users }
    }

    pub fn resolve(&self, token: &str, now: DateTime<Utc>) -> Result<Principal, AuthzError> {
        let claims = self.verifier.verify(token, now).map_err(|e| {
            tracing::warn!(error = %e, "bearer token rejected");
            AuthzError::Unauthenticated
        })?;

        let principal = self.users.load_principal(claims.sub).ok_or_else(|| {
            // Subject existed when the token was minted but is gone now.
            tracing::warn!(subject = %claims.sub, "token subject no longer resolves to a user");
            AuthzError::Unauthenticated
        })?;

        if principal.status == UserStatus::Suspended {
            tracing::warn!(subject = %claims.sub, "suspended user presented a valid token");
            return Err(AuthzError::Unauthenticated);
        }

        Ok(principal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::{Claims, TokenValidationError};
    use crate::principal::RoleBinding;
    use crate::{Permission, Role};
    use atlaserp_core::TenantId;
    use chrono::Duration;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct StaticVerifier {
        subject: UserId,
    }

    impl TokenVerifier for StaticVerifier {
        fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenValidationError> {
            if token != "good" {
                return Err(TokenValidationError::Invalid);
            }
            Ok(Claims {
                sub: self.subject,
                issued_at: now - Duration::minutes(1),
                expires_at: now + Duration::minutes(1),
            })
        }
    }

    struct MapSource {
        users: Mutex<HashMap<UserId, Principal>>,
    }

    impl PrincipalSource for MapSource {
        fn load_principal(&self, user_id: UserId) -> Option<Principal> {
            self.users.lock().unwrap().get(&user_id).cloned()
        }
    }

    fn principal(user_id: UserId, status: UserStatus) -> Principal {
        Principal {
            user_id,
            email: "kim@example.com".to_string(),
            home_tenant_id: Some(TenantId::new()),
            role: RoleBinding {
                name: Role::new("admin"),
                permissions: vec![Permission::new("*")],
            },
            status,
        }
    }

    fn resolver(subject: UserId, stored: Option<Principal>) -> IdentityResolver {
        let mut users = HashMap::new();
        if let Some(p) = stored {
            users.insert(subject, p);
        }
        IdentityResolver::new(
            Arc::new(StaticVerifier { subject }),
            Arc::new(MapSource {
                users: Mutex::new(users),
            }),
        )
    }

    #[test]
    fn resolves_active_user() {
        let subject = UserId::new();
        let r = resolver(subject, Some(principal(subject, UserStatus::Active)));
        let p = r.resolve("good", Utc::now()).unwrap();
        assert_eq!(p.user_id, subject);
    }

    #[test]
    fn invalid_token_is_unauthenticated() {
        let subject = UserId::new();
        let r = resolver(subject, Some(principal(subject, UserStatus::Active)));
        assert_eq!(
            r.resolve("bad", Utc::now()),
            Err(AuthzError::Unauthenticated)
        );
    }

    #[test]
    fn vanished_subject_fails_closed() {
        let subject = UserId::new();
        let r = resolver(subject, None);
        assert_eq!(
            r.resolve("good", Utc::now()),
            Err(AuthzError::Unauthenticated)
        );
    }

    #[test]
    fn suspended_user_is_unauthenticated() {
        let subject = UserId::new();
        let r = resolver(subject, Some(principal(subject, UserStatus::Suspended)));
        assert_eq!(
            r.resolve("good", Utc::now()),
            Err(AuthzError::Unauthenticated)
        );
    }
}
