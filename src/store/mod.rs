/// Refresh token and user credential persistence
///
/// The lifecycle manager only talks to [`RefreshTokenStore`]. Records are keyed
/// by token fingerprint; implementations never see plaintext tokens.
/// The login route reads stored password hashes through [`UserStore`].

mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StoreError;

pub use memory::{InMemoryRefreshTokenStore, InMemoryUserStore};
pub use postgres::{PgRefreshTokenStore, PgUserStore};

/// Server-side state of one refresh token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub identity: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Keyed store for refresh token records
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Insert a new record issued now
    async fn put_refresh_token(
        &self,
        fingerprint: &str,
        identity: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Fails with `StoreError::NotFound` if absent
    async fn get_refresh_token_record(&self, fingerprint: &str) -> Result<RefreshTokenRecord, StoreError>;

    /// Set `revoked_at` if unset. Unknown fingerprints are not an error.
    async fn mark_revoked(&self, fingerprint: &str) -> Result<(), StoreError>;

    /// Revoke every unrevoked record of `identity`, returning the count
    async fn mark_all_revoked(&self, identity: Uuid) -> Result<u64, StoreError>;
}

/// Stored login material of one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredentials {
    pub id: Uuid,
    /// PHC-encoded argon2 hash
    pub password_hash: String,
}

/// Read-only lookup of users by login email
#[async_trait]
pub trait UserStore: Send + Sync {
    /// `None` when no user has this email
    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, StoreError>;
}
