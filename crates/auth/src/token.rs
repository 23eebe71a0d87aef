use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use crate::claims::{Claims, TokenValidationError, validate_window};

/// Verifies an opaque bearer token and yields its claims.
///
/// Implementations check the cryptographic signature; the validity window is
/// checked deterministically against the `now` the caller supplies.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenValidationError>;
}

/// HS256 (shared-secret) verifier.
///
/// Time validation is disabled in the decode step and performed by
/// [`validate_window`] instead, so verification stays deterministic.
pub struct Hs256TokenVerifier {
    key: DecodingKey,
}

impl Hs256TokenVerifier {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_ref()),
        }
    }
}

impl TokenVerifier for Hs256TokenVerifier {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<Claims>(token, &self.key, &validation)
            .map_err(|_| TokenValidationError::Invalid)?;

        validate_window(&data.claims, now)?;
        Ok(data.claims)
    }
}
