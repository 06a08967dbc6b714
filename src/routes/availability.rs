use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::models::{AvailabilityResponse, NewWindow, WindowPatch};
use crate::core::ScheduleError;
use crate::routes::{ApiError, AppState, Caller};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/availability", web::get().to(list_windows))
        .route("/availability", web::post().to(create_window))
        .route("/availability/{id}", web::patch().to(update_window))
        .route("/availability/{id}", web::delete().to(delete_window))
        .route("/babysitters/{id}/availability", web::get().to(bookable_availability));
}

/// The caller's own declared windows
async fn list_windows(
    state: web::Data<AppState>,
    caller: Caller,
) -> Result<HttpResponse, ApiError> {
    let babysitter_id = caller.role.require_babysitter("manage availability")?;
    let windows = state.postgres.list_windows(babysitter_id).await?;
    Ok(HttpResponse::Ok().json(windows))
}

/// Declare a window
///
/// POST /api/v1/availability
///
/// Request body:
/// ```json
/// { "start": "2026-03-02T09:00:00Z", "end": "2026-03-02T17:00:00Z" }
/// ```
async fn create_window(
    state: web::Data<AppState>,
    caller: Caller,
    req: web::Json<NewWindow>,
) -> Result<HttpResponse, ApiError> {
    let babysitter_id = caller.role.require_babysitter("manage availability")?;
    let window = state.postgres.create_window(babysitter_id, &req).await?;
    Ok(HttpResponse::Created().json(window))
}

async fn update_window(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<Uuid>,
    req: web::Json<WindowPatch>,
) -> Result<HttpResponse, ApiError> {
    caller.role.require_babysitter("manage availability")?;
    let window = state
        .postgres
        .update_window(&caller.role, path.into_inner(), &req)
        .await?;
    Ok(HttpResponse::Ok().json(window))
}

async fn delete_window(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    caller.role.require_babysitter("manage availability")?;
    state.postgres.delete_window(&caller.role, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Bookable time of a babysitter, for a connected family
///
/// GET /api/v1/babysitters/{id}/availability
async fn bookable_availability(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let family_id = caller.role.require_parent("view babysitter availability")?;
    let babysitter_id = path.into_inner();

    if !state.postgres.is_approved(babysitter_id, family_id).await? {
        return Err(ScheduleError::not_connected().into());
    }

    let merged = state.scheduling.merge_overlapping_windows;
    let intervals = state.postgres.bookable_intervals(babysitter_id, merged).await?;

    Ok(HttpResponse::Ok().json(AvailabilityResponse {
        babysitter_id,
        intervals,
        merged,
    }))
}
