use std::sync::Mutex;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest, HttpResponse};
use futures::future::{ready, LocalBoxFuture, Ready};
use serde_json::json;
use wisecamp::models::Id;

use super::routes::MockError;
use super::token::{verify_token, Claims};
use super::MockState;

/// Records every request and rejects protected ones without a valid bearer token.
pub struct RequireToken;

impl<S, B> Transform<S, ServiceRequest> for RequireToken
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RequireTokenService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireTokenService { service }))
    }
}

pub struct RequireTokenService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequireTokenService<S>
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
        let state = req.app_data::<web::Data<Mutex<MockState>>>().cloned();
        let revoked = match &state {
            Some(state) => {
                let mut state = state.lock().unwrap();
                state
                    .requests
                    .push(format!("{} {}", req.method(), req.path()));
                state.revoked
            }
            None => false,
        };

        if req.path().starts_with("/api/auth/") {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        }

        let token = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let verdict = match token {
            _ if revoked => Err("Token has been revoked".to_string()),
            Some(token) => verify_token(token),
            None => Err("Missing token".to_string()),
        };

        match verdict {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(message) => {
                let response = HttpResponse::Unauthorized().json(json!({ "message": message }));
                Box::pin(ready(Ok(req.into_response(response).map_into_right_body())))
            }
        }
    }
}

/// The signed-in user's id, inserted by `RequireToken`.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Id);

impl FromRequest for AuthUser {
    type Error = MockError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) => ready(Ok(AuthUser(claims.sub))),
            None => ready(Err(MockError::new(401, "Missing token"))),
        }
    }
}
