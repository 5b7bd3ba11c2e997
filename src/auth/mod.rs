/// Authentication module
///
/// Password hashing, `Authorization` header parsing, access token
/// issuance/validation and the refresh token lifecycle.

mod claims;
mod header;
mod jwt;
mod password;
mod refresh_token;
mod secret;
mod session;

pub use claims::Claims;
pub use header::{api_key, bearer_token, extract, Scheme};
pub use jwt::{generate_access_token, validate_access_token, ISSUER};
pub use password::{hash_password, verify_password, Credential};
pub use refresh_token::{fingerprint, generate_refresh_token, RefreshTokenManager, DEFAULT_HORIZON_DAYS};
pub use secret::SigningSecret;
pub use session::{login, refresh_access_token, revoke_refresh_token, TokenPair};
