use std::sync::Arc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header, Method},
    Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use super::Credentials;
use crate::error::AppError;

/// Rejects requests without a valid `Authorization: Bearer <token>` header.
///
/// Rejected requests are answered with the 401 envelope and never reach the
/// wrapped service. Verified claims are stored in the request extensions for
/// `AuthenticatedUser`. Methods registered with [`AuthMiddleware::allow`] bypass the check.
#[derive(Clone)]
pub struct AuthMiddleware {
    credentials: Arc<Credentials>,
    public_methods: Vec<Method>,
}

impl AuthMiddleware {
    pub fn new(credentials: Arc<Credentials>) -> Self {
        Self {
            credentials,
            public_methods: Vec::new(),
        }
    }

    /// Lets requests with `method` through without a token.
    pub fn allow(mut self, method: Method) -> Self {
        self.public_methods.push(method);
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            credentials: self.credentials.clone(),
            public_methods: self.public_methods.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    credentials: Arc<Credentials>,
    public_methods: Vec<Method>,
}

impl<S> AuthMiddlewareService<S> {
    fn authenticate(&self, req: &ServiceRequest) -> Result<(), AppError> {
        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| {
                AppError::Unauthenticated("missing token or invalid authorization format".into())
            })?;

        let claims = self.credentials.parse_token(token).map_err(|e| {
            log::debug!("rejecting bearer token on {}: {}", req.path(), e);
            AppError::Unauthenticated("invalid or expired token".into())
        })?;

        req.extensions_mut().insert(claims);
        Ok(())
    }
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let verdict = if self.public_methods.contains(req.method()) {
            Ok(())
        } else {
            self.authenticate(&req)
        };

        match verdict {
            Ok(()) => {
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            Err(app_err) => {
                let response = req.into_response(app_err.error_response());
                Box::pin(async move { Ok(response.map_into_right_body()) })
            }
        }
    }
}
