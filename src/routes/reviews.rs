use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::models::{NewReview, ReviewPatch};
use crate::routes::{ApiError, AppState, Caller};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/reviews", web::post().to(create_review))
        .route("/reviews/{id}", web::patch().to(update_review))
        .route("/reviews/{id}", web::delete().to(delete_review))
        .route("/babysitters/{id}/reviews", web::get().to(list_reviews));
}

async fn create_review(
    state: web::Data<AppState>,
    caller: Caller,
    req: web::Json<NewReview>,
) -> Result<HttpResponse, ApiError> {
    let family_id = caller.role.require_parent("write reviews")?;
    req.validate()?;

    let review = state.postgres.create_review(family_id, &req).await?;
    Ok(HttpResponse::Created().json(review))
}

/// Reviews are readable by any signed-in user
async fn list_reviews(
    state: web::Data<AppState>,
    _caller: Caller,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let reviews = state.postgres.list_reviews(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(reviews))
}

async fn update_review(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<Uuid>,
    req: web::Json<ReviewPatch>,
) -> Result<HttpResponse, ApiError> {
    caller.role.require_parent("edit reviews")?;
    req.validate()?;

    let review = state
        .postgres
        .update_review(&caller.role, path.into_inner(), &req)
        .await?;
    Ok(HttpResponse::Ok().json(review))
}

async fn delete_review(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    caller.role.require_parent("delete reviews")?;
    state.postgres.delete_review(&caller.role, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
