use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::{RefreshTokenRecord, RefreshTokenStore, UserCredentials, UserStore};
use crate::error::StoreError;

/// Process-local store, for tests and single-node embedding
#[derive(Default)]
pub struct InMemoryRefreshTokenStore {
    records: Mutex<HashMap<String, RefreshTokenRecord>>,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> Result<MutexGuard<'_, HashMap<String, RefreshTokenRecord>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Database("refresh token map poisoned".to_string()))
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn put_refresh_token(
        &self,
        fingerprint: &str,
        identity: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let record = RefreshTokenRecord {
            identity,
            issued_at: Utc::now(),
            expires_at,
            revoked_at: None,
        };
        self.records()?.insert(fingerprint.to_string(), record);
        Ok(())
    }

    async fn get_refresh_token_record(&self, fingerprint: &str) -> Result<RefreshTokenRecord, StoreError> {
        self.records()?
            .get(fingerprint)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn mark_revoked(&self, fingerprint: &str) -> Result<(), StoreError> {
        if let Some(record) = self.records()?.get_mut(fingerprint) {
            record.revoked_at.get_or_insert_with(Utc::now);
        }
        Ok(())
    }

    async fn mark_all_revoked(&self, identity: Uuid) -> Result<u64, StoreError> {
        let now = Utc::now();
        let mut revoked = 0;
        for record in self.records()?.values_mut() {
            if record.identity == identity && record.revoked_at.is_none() {
                record.revoked_at = Some(now);
                revoked += 1;
            }
        }
        Ok(revoked)
    }
}

/// Process-local user table keyed by email
#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<String, UserCredentials>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the user registered under `email`
    pub fn insert(&self, email: &str, id: Uuid, password_hash: String) -> Result<(), StoreError> {
        self.users
            .lock()
            .map_err(|_| StoreError::Database("user map poisoned".to_string()))?
            .insert(email.to_string(), UserCredentials { id, password_hash });
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, StoreError> {
        let users = self
            .users
            .lock()
            .map_err(|_| StoreError::Database("user map poisoned".to_string()))?;
        Ok(users.get(email).cloned())
    }
}
