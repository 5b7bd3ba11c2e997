/// Session flows
///
/// Login, access token refresh and logout, composed from the hasher, the
/// header extractor, the access token codec and the refresh token manager.
/// User lookup stays with the caller: login receives the stored hash.

use actix_web::http::header::HeaderMap;
use chrono::Duration;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::header::bearer_token;
use crate::auth::jwt::generate_access_token;
use crate::auth::password::{verify_password, Credential};
use crate::auth::refresh_token::RefreshTokenManager;
use crate::auth::secret::SigningSecret;
use crate::error::AppError;

/// Tokens handed out at login
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

/// Verify `credential` against `stored_hash`, then mint both tokens
///
/// # Errors
/// - `InvalidCredentials` if the password does not match
/// - password, signing and store failures otherwise
pub async fn login(
    identity: Uuid,
    credential: &Credential,
    stored_hash: &str,
    secret: &SigningSecret,
    access_ttl: Duration,
    refresh_tokens: &RefreshTokenManager,
) -> Result<TokenPair, AppError> {
    if !verify_password(&credential.secret, stored_hash)? {
        tracing::warn!(user_id = %identity, "Password mismatch at login");
        return Err(AppError::InvalidCredentials);
    }

    let token = generate_access_token(identity, secret, access_ttl)?;
    let refresh_token = refresh_tokens.issue(identity).await?;

    tracing::info!(user_id = %identity, "User logged in successfully");
    Ok(TokenPair {
        token,
        refresh_token,
    })
}

/// Exchange the Bearer refresh token in `headers` for a fresh access token
pub async fn refresh_access_token(
    headers: &HeaderMap,
    secret: &SigningSecret,
    access_ttl: Duration,
    refresh_tokens: &RefreshTokenManager,
) -> Result<String, AppError> {
    let refresh_token = bearer_token(headers)?;
    let identity = refresh_tokens.exchange(&refresh_token).await?;
    let token = generate_access_token(identity, secret, access_ttl)?;

    tracing::info!(user_id = %identity, "Access token refreshed");
    Ok(token)
}

/// Revoke the Bearer refresh token in `headers`
pub async fn revoke_refresh_token(
    headers: &HeaderMap,
    refresh_tokens: &RefreshTokenManager,
) -> Result<(), AppError> {
    let refresh_token = bearer_token(headers)?;
    refresh_tokens.revoke(&refresh_token).await?;
    Ok(())
}
