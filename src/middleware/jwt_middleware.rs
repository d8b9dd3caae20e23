use std::future::{ready, Ready};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    web, Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::{
    models::{AuthUser, Claims},
    AppState,
};

/// Verifies the `Authorization: Bearer` access token and injects the
/// caller's identity into request extensions.
#[derive(Clone)]
pub struct JwtAuth {
    app_data: web::Data<AppState>,
}

impl JwtAuth {
    pub fn new(app_data: web::Data<AppState>) -> Self {
        Self { app_data }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service,
            app_data: self.app_data.clone(),
        }))
    }
}

pub struct JwtAuthMiddleware<S> {
    service: S,
    app_data: web::Data<AppState>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let bearer_token = req
            .headers()
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(str::to_owned);

        if let Some(token) = bearer_token {
            match decode::<Claims>(
                &token,
                &DecodingKey::from_secret(self.app_data.jwt_secret.as_bytes()),
                &Validation::default(),
            ) {
                Ok(data) => {
                    req.extensions_mut().insert(AuthUser {
                        id: data.claims.sub,
                    });
                    let fut = self.service.call(req);
                    Box::pin(async move { fut.await })
                }
                Err(_) => Box::pin(async { Err(ErrorUnauthorized("Invalid or expired token")) }),
            }
        } else {
            Box::pin(async { Err(ErrorUnauthorized("Missing Bearer token")) })
        }
    }
}
