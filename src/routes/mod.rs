mod auth;
mod health_check;

pub use auth::{login, me, refresh, revoke, LoginRequest, MeResponse, TokenResponse};
pub use health_check::health_check;
