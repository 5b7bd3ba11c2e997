/// Password Hashing and Verification
///
/// Argon2id with fixed process-wide parameters. One verification costs tens of
/// milliseconds, which is the point: offline brute force stays expensive.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::error::PasswordError;

/// Memory cost in KiB (12 MiB)
pub const MEMORY_COST_KIB: u32 = 12 * 1024;
pub const ITERATIONS: u32 = 3;
pub const PARALLELISM: u32 = 1;
/// Derived key length in bytes
pub const KEY_LENGTH: usize = 32;

/// A credential presented at login. Never persisted, never logged.
pub struct Credential {
    pub identity: String,
    pub secret: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("identity", &self.identity)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

fn hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(MEMORY_COST_KIB, ITERATIONS, PARALLELISM, Some(KEY_LENGTH))
        .map_err(|e| PasswordError::Hashing(format!("invalid argon2 parameters: {}", e)))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a password into a PHC string
///
/// The string carries algorithm, parameters, a fresh 16-byte salt and the
/// derived key, so two hashes of the same password never match.
///
/// # Errors
/// - `InvalidInput` for an empty password
/// - `Hashing` if argon2 itself fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    if password.is_empty() {
        return Err(PasswordError::InvalidInput("password cannot be empty"));
    }

    let salt = SaltString::generate(&mut OsRng);
    hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hashing(e.to_string()))
}

/// Verify a password against a stored PHC hash
///
/// A well-formed hash of a different password yields `Ok(false)`.
///
/// # Errors
/// - `InvalidInput` if either side is empty
/// - `MalformedHash` if `hash` cannot be parsed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    if password.is_empty() {
        return Err(PasswordError::InvalidInput("password cannot be empty"));
    }
    if hash.is_empty() {
        return Err(PasswordError::InvalidInput("password hash cannot be empty"));
    }

    let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

    match hasher()?.verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::MalformedHash(e.to_string())),
    }
}
