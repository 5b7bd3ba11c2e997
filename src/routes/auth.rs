/// Token Routes
///
/// Thin HTTP wrappers over the session flows. Every authentication failure
/// leaves as the same generic 401 (see `AppError`).

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{self, refresh_access_token, revoke_refresh_token, Credential, RefreshTokenManager};
use crate::configuration::AuthSettings;
use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::store::UserStore;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Fresh access token
#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub id: Uuid,
}

/// POST /api/login
///
/// Answers `{"token", "refresh_token"}`.
///
/// # Errors
/// - 401: unknown email, empty or wrong password
pub async fn login(
    form: web::Json<LoginRequest>,
    settings: web::Data<AuthSettings>,
    users: web::Data<dyn UserStore>,
    refresh_tokens: web::Data<RefreshTokenManager>,
) -> Result<HttpResponse, AppError> {
    let LoginRequest { email, password } = form.into_inner();
    let credential = Credential {
        identity: email.trim().to_string(),
        secret: password,
    };
    if credential.identity.is_empty() || credential.secret.is_empty() {
        return Err(AppError::InvalidCredentials);
    }

    let user = users
        .find_by_email(&credential.identity)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let pair = auth::login(
        user.id,
        &credential,
        &user.password_hash,
        &settings.signing_secret,
        settings.access_token_ttl()?,
        refresh_tokens.get_ref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(pair))
}

/// POST /api/refresh
///
/// Requires `Authorization: Bearer <refresh_token>`. The refresh token stays
/// valid afterwards; there is no rotation.
///
/// # Errors
/// - 401: missing/malformed header, or unknown, expired or revoked token
pub async fn refresh(
    req: HttpRequest,
    settings: web::Data<AuthSettings>,
    refresh_tokens: web::Data<RefreshTokenManager>,
) -> Result<HttpResponse, AppError> {
    let token = refresh_access_token(
        req.headers(),
        &settings.signing_secret,
        settings.access_token_ttl()?,
        refresh_tokens.get_ref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// POST /api/revoke
///
/// Requires `Authorization: Bearer <refresh_token>`. Revoking an unknown or
/// already revoked token still answers 204.
pub async fn revoke(
    req: HttpRequest,
    refresh_tokens: web::Data<RefreshTokenManager>,
) -> Result<HttpResponse, AppError> {
    revoke_refresh_token(req.headers(), refresh_tokens.get_ref()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/me, behind `AccessTokenGuard`
pub async fn me(user: web::ReqData<AuthenticatedUser>) -> HttpResponse {
    HttpResponse::Ok().json(MeResponse { id: user.0 })
}
