/// Access Token Middleware
///
/// Validates the Bearer access token from the Authorization header and
/// injects the authenticated identity into request extensions for handlers.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;
use uuid::Uuid;

use crate::auth::{bearer_token, validate_access_token, SigningSecret};
use crate::error::AppError;

/// Identity proven by a valid access token
///
/// Handlers take it as `web::ReqData<AuthenticatedUser>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub Uuid);

/// Guard for routes that require an access token
pub struct AccessTokenGuard {
    secret: SigningSecret,
}

impl AccessTokenGuard {
    pub fn new(secret: SigningSecret) -> Self {
        Self { secret }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessTokenGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessTokenGuardService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(AccessTokenGuardService {
            service: Rc::new(service),
            secret: self.secret.clone(),
        }))
    }
}

pub struct AccessTokenGuardService<S> {
    service: Rc<S>,
    secret: SigningSecret,
}

impl<S, B> Service<ServiceRequest> for AccessTokenGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let identity = bearer_token(req.headers())
            .map_err(AppError::from)
            .and_then(|token| validate_access_token(&token, &self.secret).map_err(AppError::from));

        match identity {
            Ok(identity) => {
                req.extensions_mut().insert(AuthenticatedUser(identity));
                tracing::debug!(user_id = %identity, "Access token validated");

                let service = self.service.clone();
                Box::pin(async move { service.call(req).await })
            }
            Err(e) => Box::pin(async move { Err(e.into()) }),
        }
    }
}
