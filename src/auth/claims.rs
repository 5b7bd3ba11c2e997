/// Access token claims
///
/// Registered JWT claims (RFC 7519) only: who, by whom, when, until when.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AccessTokenError;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (identity as UUID string)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Claims for `identity` issued at `now`, expiring at `now + ttl`
    ///
    /// Both timestamps are truncated to whole seconds.
    ///
    /// # Errors
    /// `InvalidInput` if `now + ttl` is outside the representable time range
    pub fn new(
        identity: Uuid,
        issuer: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, AccessTokenError> {
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or(AccessTokenError::InvalidInput("token ttl is out of range"))?;
        Ok(Self {
            sub: identity.to_string(),
            iss: issuer.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        })
    }

    /// Parse the subject back into an identity
    pub fn identity(&self) -> Result<Uuid, AccessTokenError> {
        Uuid::parse_str(&self.sub).map_err(|_| AccessTokenError::MalformedSubject)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_claims_creation() {
        let identity = Uuid::new_v4();
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let claims = Claims::new(identity, "postgate", now, Duration::hours(1)).unwrap();

        assert_eq!(claims.sub, identity.to_string());
        assert_eq!(claims.iss, "postgate");
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_003_600);
    }

    #[test]
    fn test_expiry_truncates_to_seconds() {
        let now = Utc.timestamp_opt(1_700_000_000, 850_000_000).unwrap();
        let claims = Claims::new(Uuid::new_v4(), "postgate", now, Duration::seconds(1)).unwrap();

        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_000_001);
        assert!(claims.is_expired_at(now + Duration::milliseconds(200)));
    }

    #[test]
    fn test_ttl_out_of_range() {
        let result = Claims::new(Uuid::new_v4(), "postgate", Utc::now(), Duration::days(365 * 400_000));
        assert!(matches!(result, Err(AccessTokenError::InvalidInput(_))));
    }

    #[test]
    fn test_expired_at_boundary() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let claims = Claims::new(Uuid::new_v4(), "postgate", now, Duration::seconds(10)).unwrap();

        assert!(!claims.is_expired_at(now + Duration::seconds(9)));
        assert!(claims.is_expired_at(now + Duration::seconds(10)));
    }

    #[test]
    fn test_identity_extraction() {
        let identity = Uuid::new_v4();
        let claims = Claims::new(identity, "postgate", Utc::now(), Duration::hours(1)).unwrap();

        assert_eq!(claims.identity().unwrap(), identity);
    }

    #[test]
    fn test_invalid_subject() {
        let mut claims = Claims::new(Uuid::new_v4(), "postgate", Utc::now(), Duration::hours(1)).unwrap();
        claims.sub = "invalid-uuid".to_string();

        assert!(matches!(claims.identity(), Err(AccessTokenError::MalformedSubject)));
    }
}
