use std::ops::Deref;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::error::InternalError;
use actix_web::http::{StatusCode, header};
use actix_web::middleware::Next;
use actix_web::{HttpMessage, web};
use uuid::Uuid;

use crate::repository::TokenVerifier;
use crate::utils::build_error_response;

#[derive(Copy, Clone, Debug)]
pub struct UserId(Uuid);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl Deref for UserId {
    type Target = Uuid;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn unauthorized(msg: &'static str) -> actix_web::Error {
    let response = build_error_response(StatusCode::UNAUTHORIZED, msg.to_string());
    InternalError::from_response(anyhow::anyhow!(msg), response).into()
}

fn e500(e: anyhow::Error) -> actix_web::Error {
    let response =
        build_error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string());
    InternalError::from_response(e, response).into()
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolves the bearer token to a user and stores its [`UserId`] in the
/// request extensions.
pub async fn reject_anonymous_users(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let token = bearer_token(&req)
        .ok_or_else(|| unauthorized("Missing bearer token"))?
        .to_string();

    let verifier = req
        .app_data::<web::Data<dyn TokenVerifier>>()
        .cloned()
        .ok_or_else(|| e500(anyhow::anyhow!("Token verifier is not registered")))?;

    match verifier.verify(&token).await.map_err(e500)? {
        Some(user_id) => {
            req.extensions_mut().insert(UserId(user_id));
            next.call(req).await
        }
        None => Err(unauthorized("Invalid access token")),
    }
}
