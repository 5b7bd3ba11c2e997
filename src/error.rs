/// Error Handling Module
///
/// Every component owns a small error enum carrying its part of the
/// credential/token taxonomy. `AppError` unifies them for the HTTP boundary,
/// where all header and token validity failures collapse into a single
/// generic unauthorized response. The distinct reason is only logged.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

// ============================================================================
// 1. COMPONENT ERROR TYPES
// ============================================================================

/// Password hashing and verification failures
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Empty secret or empty hash handed in by the caller
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// The stored hash is not a PHC-encoded argon2 string
    #[error("malformed password hash: {0}")]
    MalformedHash(String),
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// `Authorization` header parsing failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    #[error("missing authorization header")]
    MissingHeader,
    #[error("malformed authorization header")]
    Malformed,
    #[error("authorization scheme mismatch: expected {expected}")]
    SchemeMismatch { expected: &'static str },
}

/// Access token issuance and validation failures
#[derive(Debug, thiserror::Error)]
pub enum AccessTokenError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// MAC mismatch, tampering, wrong secret or an undecodable token
    #[error("token signature is invalid")]
    SignatureInvalid,
    #[error("token was issued by another service")]
    WrongIssuer,
    #[error("token has expired")]
    Expired,
    #[error("token subject is not a valid identity")]
    MalformedSubject,
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Refresh token lifecycle failures
#[derive(Debug, thiserror::Error)]
pub enum RefreshTokenError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("refresh token not found")]
    NotFound,
    #[error("refresh token has expired")]
    Expired,
    #[error("refresh token has been revoked")]
    Revoked,
    /// The OS randomness source failed. Fatal, never retried.
    #[error("secure randomness unavailable: {0}")]
    EntropyUnavailable(String),
    #[error(transparent)]
    Store(StoreError),
}

/// Persistence collaborator failures
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Database(other.to_string()),
        }
    }
}

impl From<StoreError> for RefreshTokenError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => RefreshTokenError::NotFound,
            other => RefreshTokenError::Store(other),
        }
    }
}

// ============================================================================
// 2. UNIFIED APPLICATION ERROR TYPE
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Header(#[from] HeaderError),
    #[error(transparent)]
    AccessToken(#[from] AccessTokenError),
    #[error(transparent)]
    RefreshToken(#[from] RefreshTokenError),
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Unknown user, or password did not match the stored hash
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// True for failures that mean "the caller is not authenticated".
    pub fn is_unauthorized(&self) -> bool {
        match self {
            AppError::Header(_) | AppError::InvalidCredentials => true,
            AppError::AccessToken(e) => !matches!(
                e,
                AccessTokenError::InvalidInput(_) | AccessTokenError::Signing(_)
            ),
            AppError::RefreshToken(e) => matches!(
                e,
                RefreshTokenError::NotFound
                    | RefreshTokenError::Expired
                    | RefreshTokenError::Revoked
            ),
            AppError::Password(_) | AppError::Store(_) | AppError::Config(_) => false,
        }
    }
}

// ============================================================================
// 3. HTTP RESPONSE MAPPING
// ============================================================================

/// Error response structure for HTTP responses
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    /// Unique error ID correlating the response with the server log line
    pub error_id: String,
    pub message: String,
    /// Error code for client-side handling
    pub code: String,
    pub status: u16,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_id: String, message: String, code: String, status: u16) -> Self {
        Self {
            error_id,
            message,
            code,
            status,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl AppError {
    fn public_parts(&self) -> (StatusCode, &'static str, &'static str) {
        if self.is_unauthorized() {
            return (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Unauthorized");
        }
        match self {
            AppError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                "Server configuration error",
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error",
            ),
        }
    }

    /// Log the precise reason under `error_id`; the client never sees it.
    pub fn log_error(&self, error_id: &str) {
        if self.is_unauthorized() {
            tracing::warn!(error_id = error_id, error = %self, "Authentication failed");
        } else {
            tracing::error!(error_id = error_id, error = %self, "Request failed");
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let error_id = uuid::Uuid::new_v4().to_string();
        self.log_error(&error_id);

        let (status, code, message) = self.public_parts();
        HttpResponse::build(status).json(ErrorResponse::new(
            error_id,
            message.to_string(),
            code.to_string(),
            status.as_u16(),
        ))
    }

    fn status_code(&self) -> StatusCode {
        self.public_parts().0
    }
}
