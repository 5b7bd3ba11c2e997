/// Access Token Issuance and Validation
///
/// Short-lived HS256 JWTs. Nothing is persisted: validity is recomputed from
/// signature, issuer and expiry on every call.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::auth::secret::SigningSecret;
use crate::error::AccessTokenError;

/// `iss` claim stamped on every token this service issues
pub const ISSUER: &str = "postgate";

/// Issue a signed access token for `identity`, valid for `ttl`
///
/// Tokens are opaque to everything except [`validate_access_token`]. Two
/// tokens must never be compared to decide who someone is.
///
/// # Errors
/// - `InvalidInput` if `secret` is empty or `ttl` overflows the time range
/// - `Signing` if encoding fails
pub fn generate_access_token(
    identity: Uuid,
    secret: &SigningSecret,
    ttl: Duration,
) -> Result<String, AccessTokenError> {
    if secret.is_empty() {
        return Err(AccessTokenError::InvalidInput("signing secret cannot be empty"));
    }

    let claims = Claims::new(identity, ISSUER, Utc::now(), ttl)?;

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.expose()),
    )
    .map_err(|e| AccessTokenError::Signing(e.to_string()))
}

/// Validate an access token and return the identity it was issued for
///
/// # Errors
/// - `SignatureInvalid` on MAC mismatch, tampering, a wrong secret or an undecodable token
/// - `WrongIssuer` if `iss` is not [`ISSUER`]
/// - `Expired` once now >= `exp`
/// - `MalformedSubject` if `sub` is not a UUID
pub fn validate_access_token(token: &str, secret: &SigningSecret) -> Result<Uuid, AccessTokenError> {
    if secret.is_empty() {
        return Err(AccessTokenError::InvalidInput("signing secret cannot be empty"));
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    // Expiry is checked below with a strict, leeway-free comparison
    validation.validate_exp = false;
    validation.leeway = 0;

    let claims = decode::<Claims>(token, &DecodingKey::from_secret(secret.expose()), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidIssuer => AccessTokenError::WrongIssuer,
            _ => {
                tracing::debug!("Access token rejected: {}", e);
                AccessTokenError::SignatureInvalid
            }
        })?;

    if claims.is_expired_at(Utc::now()) {
        return Err(AccessTokenError::Expired);
    }

    claims.identity()
}
