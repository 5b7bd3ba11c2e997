/// Shared signing secret for access tokens
///
/// Wraps the HMAC key so it cannot end up in logs by accident: `Debug` is
/// redacted and there is no `Display`. Callers own rotation; nothing in this
/// crate caches the secret between calls.

use serde::Deserialize;
use std::fmt;

#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct SigningSecret(String);

impl SigningSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Raw key bytes, for the MAC only.
    pub fn expose(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let secret = SigningSecret::new("super-secret-value");
        let rendered = format!("{:?}", secret);

        assert!(!rendered.contains("super-secret-value"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn test_deserializes_from_plain_string() {
        let secret: SigningSecret =
            serde_json::from_str("\"from-config\"").expect("Failed to deserialize secret");

        assert_eq!(secret.expose(), b"from-config");
        assert!(!secret.is_empty());
    }
}
