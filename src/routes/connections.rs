use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::models::{NewConnectionRequest, RequestActiveUpdate, RequestStatusUpdate};
use crate::routes::{ApiError, AppState, Caller};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/requests", web::post().to(create_request))
        .route("/requests", web::get().to(list_requests))
        .route("/requests/{id}/status", web::patch().to(set_status))
        .route("/requests/{id}/active", web::patch().to(set_active));
}

/// Ask a babysitter to connect
///
/// POST /api/v1/requests
///
/// Request body:
/// ```json
/// { "babysitter_id": "uuid" }
/// ```
async fn create_request(
    state: web::Data<AppState>,
    caller: Caller,
    req: web::Json<NewConnectionRequest>,
) -> Result<HttpResponse, ApiError> {
    let family_id = caller.role.require_parent("send connection requests")?;
    let request = state.postgres.create_request(family_id, req.babysitter_id).await?;
    Ok(HttpResponse::Created().json(request))
}

async fn list_requests(
    state: web::Data<AppState>,
    caller: Caller,
) -> Result<HttpResponse, ApiError> {
    let requests = state.postgres.list_requests(&caller.role).await?;
    Ok(HttpResponse::Ok().json(requests))
}

async fn set_status(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<Uuid>,
    req: web::Json<RequestStatusUpdate>,
) -> Result<HttpResponse, ApiError> {
    caller.role.require_babysitter("answer connection requests")?;
    let request = state
        .postgres
        .set_request_status(&caller.role, path.into_inner(), req.status)
        .await?;
    Ok(HttpResponse::Ok().json(request))
}

async fn set_active(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<Uuid>,
    req: web::Json<RequestActiveUpdate>,
) -> Result<HttpResponse, ApiError> {
    let request = state
        .postgres
        .set_request_active(&caller.role, path.into_inner(), req.is_active)
        .await?;
    Ok(HttpResponse::Ok().json(request))
}
