/// Refresh Token Management
///
/// Refresh tokens are:
/// - 256 bits from the OS CSPRNG, hex-encoded (64 lowercase characters)
/// - Stored server-side by SHA-256 fingerprint only
/// - Valid until a fixed horizon; expiry is computed when the token is read
/// - Revocable, and revocation is final
///
/// Exchanging a token never rotates or revokes it. A revocation racing an
/// exchange of the same token may lose; the store's per-record atomicity is
/// the only serialization point.

use chrono::{Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::RefreshTokenError;
use crate::store::RefreshTokenStore;

/// Refresh token size in bytes
const TOKEN_BYTES: usize = 32;

/// Default lifetime of a refresh token
pub const DEFAULT_HORIZON_DAYS: i64 = 60;

/// Generate a new refresh token
///
/// # Errors
/// `EntropyUnavailable` if the OS randomness source fails. Callers must treat
/// this as fatal and never retry silently.
pub fn generate_refresh_token() -> Result<String, RefreshTokenError> {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| RefreshTokenError::EntropyUnavailable(e.to_string()))?;
    Ok(hex::encode(bytes))
}

/// SHA-256 fingerprint of a refresh token, the only form that reaches storage
pub fn fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Issues, exchanges and revokes refresh tokens against a store
#[derive(Clone)]
pub struct RefreshTokenManager {
    store: Arc<dyn RefreshTokenStore>,
    horizon: Duration,
}

impl RefreshTokenManager {
    pub fn new(store: Arc<dyn RefreshTokenStore>) -> Self {
        Self {
            store,
            horizon: Duration::days(DEFAULT_HORIZON_DAYS),
        }
    }

    pub fn with_horizon(mut self, horizon: Duration) -> Self {
        self.horizon = horizon;
        self
    }

    /// Mint a refresh token for `identity` and persist it
    ///
    /// # Errors
    /// - `InvalidInput` if the horizon pushes expiry out of the time range
    /// - `EntropyUnavailable` or store failures
    pub async fn issue(&self, identity: Uuid) -> Result<String, RefreshTokenError> {
        let expires_at = Utc::now()
            .checked_add_signed(self.horizon)
            .ok_or(RefreshTokenError::InvalidInput("refresh token horizon is out of range"))?;
        let token = generate_refresh_token()?;

        self.store
            .put_refresh_token(&fingerprint(&token), identity, expires_at)
            .await?;

        tracing::info!(user_id = %identity, expires_at = %expires_at, "Refresh token issued");
        Ok(token)
    }

    /// Look up a refresh token and return the identity it belongs to
    ///
    /// # Errors
    /// - `NotFound` if the store has no such token
    /// - `Expired` once now >= expiry, revoked or not
    /// - `Revoked` if the token was revoked
    pub async fn exchange(&self, token: &str) -> Result<Uuid, RefreshTokenError> {
        let record = self.store.get_refresh_token_record(&fingerprint(token)).await?;

        if Utc::now() >= record.expires_at {
            tracing::info!(user_id = %record.identity, "Refresh token expired");
            return Err(RefreshTokenError::Expired);
        }

        if record.revoked_at.is_some() {
            tracing::warn!(user_id = %record.identity, "Attempt to use revoked refresh token");
            return Err(RefreshTokenError::Revoked);
        }

        Ok(record.identity)
    }

    /// Revoke a refresh token
    ///
    /// Idempotent: revoking an unknown or already revoked token succeeds.
    pub async fn revoke(&self, token: &str) -> Result<(), RefreshTokenError> {
        self.store.mark_revoked(&fingerprint(token)).await?;
        Ok(())
    }

    /// Revoke every active refresh token of `identity`, returning how many were revoked
    pub async fn revoke_all(&self, identity: Uuid) -> Result<u64, RefreshTokenError> {
        let revoked = self.store.mark_all_revoked(identity).await?;
        tracing::info!(user_id = %identity, revoked = revoked, "All refresh tokens revoked for user");
        Ok(revoked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryRefreshTokenStore;
    use std::collections::HashSet;

    fn manager() -> RefreshTokenManager {
        RefreshTokenManager::new(Arc::new(InMemoryRefreshTokenStore::new()))
    }

    #[test]
    fn test_generate_refresh_token() {
        let token = generate_refresh_token().expect("Failed to generate token");

        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn test_generated_tokens_are_distinct() {
        let tokens: HashSet<String> = (0..10_000)
            .map(|_| generate_refresh_token().expect("Failed to generate token"))
            .collect();

        assert_eq!(tokens.len(), 10_000);
        assert!(tokens.iter().all(|t| t.len() == 64 && t == &t.to_lowercase()));
    }

    #[test]
    fn test_fingerprint() {
        let token = generate_refresh_token().unwrap();

        assert_eq!(fingerprint(&token), fingerprint(&token));
        assert_ne!(fingerprint(&token), token);
        assert_eq!(fingerprint(&token).len(), 64);
        assert_ne!(fingerprint(&token), fingerprint(&generate_refresh_token().unwrap()));
    }

    #[tokio::test]
    async fn test_issue_then_exchange() {
        let manager = manager();
        let identity = Uuid::new_v4();

        let token = manager.issue(identity).await.expect("Failed to issue token");

        assert_eq!(manager.exchange(&token).await.unwrap(), identity);
        // Exchange leaves the token usable
        assert_eq!(manager.exchange(&token).await.unwrap(), identity);
    }

    #[tokio::test]
    async fn test_exchange_unknown_token() {
        let result = manager().exchange(&generate_refresh_token().unwrap()).await;
        assert!(matches!(result, Err(RefreshTokenError::NotFound)));
    }

    #[tokio::test]
    async fn test_revoked_token_is_rejected() {
        let manager = manager();
        let token = manager.issue(Uuid::new_v4()).await.unwrap();

        manager.revoke(&token).await.expect("Failed to revoke token");

        assert!(matches!(
            manager.exchange(&token).await,
            Err(RefreshTokenError::Revoked)
        ));
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let manager = manager();
        let token = manager.issue(Uuid::new_v4()).await.unwrap();

        manager.revoke(&token).await.expect("First revoke failed");
        manager.revoke(&token).await.expect("Second revoke failed");
        manager
            .revoke(&generate_refresh_token().unwrap())
            .await
            .expect("Revoking an unknown token failed");

        assert!(matches!(
            manager.exchange(&token).await,
            Err(RefreshTokenError::Revoked)
        ));
    }

    #[tokio::test]
    async fn test_token_past_horizon_is_expired() {
        let manager = manager().with_horizon(Duration::zero());
        let token = manager.issue(Uuid::new_v4()).await.unwrap();

        assert!(matches!(
            manager.exchange(&token).await,
            Err(RefreshTokenError::Expired)
        ));
    }

    #[tokio::test]
    async fn test_expired_and_revoked_reports_expired() {
        let manager = manager().with_horizon(Duration::zero());
        let token = manager.issue(Uuid::new_v4()).await.unwrap();

        manager.revoke(&token).await.expect("Failed to revoke token");

        assert!(matches!(
            manager.exchange(&token).await,
            Err(RefreshTokenError::Expired)
        ));
    }

    #[tokio::test]
    async fn test_horizon_out_of_range() {
        let manager = manager().with_horizon(Duration::days(365 * 400_000));

        assert!(matches!(
            manager.issue(Uuid::new_v4()).await,
            Err(RefreshTokenError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_revoke_all_for_identity() {
        let manager = manager();
        let identity = Uuid::new_v4();
        let other = Uuid::new_v4();

        let first = manager.issue(identity).await.unwrap();
        let second = manager.issue(identity).await.unwrap();
        let unrelated = manager.issue(other).await.unwrap();

        assert_eq!(manager.revoke_all(identity).await.unwrap(), 2);
        assert!(matches!(manager.exchange(&first).await, Err(RefreshTokenError::Revoked)));
        assert!(matches!(manager.exchange(&second).await, Err(RefreshTokenError::Revoked)));
        assert_eq!(manager.exchange(&unrelated).await.unwrap(), other);
    }
}
