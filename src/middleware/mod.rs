/// Middleware module

mod jwt_middleware;

pub use jwt_middleware::{AccessTokenGuard, AuthenticatedUser};
