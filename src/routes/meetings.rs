use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::models::{MeetingStatusUpdate, NewMeetingRequest};
use crate::routes::{ApiError, AppState, Caller};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/meetings", web::post().to(request_meeting))
        .route("/meetings", web::get().to(list_meetings))
        .route("/meetings/{id}", web::get().to(get_meeting))
        .route("/meetings/{id}/status", web::patch().to(answer_meeting));
}

/// Request a meeting with a connected babysitter
///
/// POST /api/v1/meetings
///
/// Request body:
/// ```json
/// {
///   "babysitter_id": "uuid",
///   "start": "2026-03-02T10:00:00Z",
///   "end": "2026-03-02T11:00:00Z"
/// }
/// ```
///
/// Invalid interval → 400, no approved connection → 403,
/// not inside a window → 404, clashes with an approved meeting → 400.
async fn request_meeting(
    state: web::Data<AppState>,
    caller: Caller,
    req: web::Json<NewMeetingRequest>,
) -> Result<HttpResponse, ApiError> {
    let family_id = caller.role.require_parent("request meetings")?;

    let meeting = state
        .postgres
        .request_meeting(family_id, req.babysitter_id, req.start, req.end)
        .await?;

    Ok(HttpResponse::Created().json(meeting))
}

async fn list_meetings(
    state: web::Data<AppState>,
    caller: Caller,
) -> Result<HttpResponse, ApiError> {
    let meetings = state.postgres.list_meetings(&caller.role).await?;
    Ok(HttpResponse::Ok().json(meetings))
}

async fn get_meeting(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let meeting = state.postgres.get_meeting(&caller.role, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(meeting))
}

/// Approve or decline a pending meeting
async fn answer_meeting(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<Uuid>,
    req: web::Json<MeetingStatusUpdate>,
) -> Result<HttpResponse, ApiError> {
    caller.role.require_babysitter("answer meetings")?;
    let meeting = state
        .postgres
        .answer_meeting(&caller.role, path.into_inner(), req.status)
        .await?;
    Ok(HttpResponse::Ok().json(meeting))
}
