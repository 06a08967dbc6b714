//! Caller identity, resolved once per request.
//!
//! Authentication happens upstream; this service trusts the user id the
//! gateway forwards and only resolves it to a [`Role`].

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use std::future::Future;
use std::pin::Pin;
use uuid::Uuid;

use crate::core::Role;
use crate::routes::error::ApiError;
use crate::routes::AppState;

pub const USER_ID_HEADER: &str = "X-User-Id";

/// The authenticated user and the role they act in
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub user_id: Uuid,
    pub role: Role,
}

impl FromRequest for Caller {
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user_id = parse_user_id(req);
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let user_id = user_id?;
            let state = state
                .ok_or_else(|| ApiError::Internal("application state not configured".to_string()))?;

            match state.postgres.resolve_role(user_id).await? {
                Some(role) => Ok(Caller { user_id, role }),
                None => {
                    tracing::info!("Rejecting request from unknown or inactive user {}", user_id);
                    Err(ApiError::Forbidden("Unknown or inactive user".to_string()))
                }
            }
        })
    }
}

pub fn parse_user_id(req: &HttpRequest) -> Result<Uuid, ApiError> {
    let value = req
        .headers()
        .get(USER_ID_HEADER)
        .ok_or_else(|| ApiError::Unauthenticated(format!("Missing {} header", USER_ID_HEADER)))?;

    value
        .to_str()
        .ok()
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .ok_or_else(|| ApiError::Unauthenticated(format!("Malformed {} header", USER_ID_HEADER)))
}
