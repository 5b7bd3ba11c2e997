use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{RefreshTokenRecord, RefreshTokenStore, UserCredentials, UserStore};
use crate::error::StoreError;

/// Postgres-backed store over the `refresh_tokens` table (see `migrations/`)
#[derive(Clone)]
pub struct PgRefreshTokenStore {
    pool: PgPool,
}

impl PgRefreshTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenStore for PgRefreshTokenStore {
    async fn put_refresh_token(
        &self,
        fingerprint: &str,
        identity: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (token_hash, user_id, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(fingerprint)
        .bind(identity)
        .bind(Utc::now())
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_refresh_token_record(&self, fingerprint: &str) -> Result<RefreshTokenRecord, StoreError> {
        let (identity, issued_at, expires_at, revoked_at) = sqlx::query_as::<
            _,
            (Uuid, DateTime<Utc>, DateTime<Utc>, Option<DateTime<Utc>>),
        >(
            r#"
            SELECT user_id, created_at, expires_at, revoked_at
            FROM refresh_tokens
            WHERE token_hash = $1
            "#,
        )
        .bind(fingerprint)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        Ok(RefreshTokenRecord {
            identity,
            issued_at,
            expires_at,
            revoked_at,
        })
    }

    async fn mark_revoked(&self, fingerprint: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked_at = $1
            WHERE token_hash = $2 AND revoked_at IS NULL
            "#,
        )
        .bind(Utc::now())
        .bind(fingerprint)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn mark_all_revoked(&self, identity: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked_at = $1
            WHERE user_id = $2 AND revoked_at IS NULL
            "#,
        )
        .bind(Utc::now())
        .bind(identity)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

/// Postgres-backed user lookup over the `users` table
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, StoreError> {
        let user = sqlx::query_as::<_, (Uuid, String)>(
            "SELECT id, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user.map(|(id, password_hash)| UserCredentials { id, password_hash }))
    }
}
