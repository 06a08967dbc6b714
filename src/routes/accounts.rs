use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::core::Role;
use crate::models::{KidPatch, MessageResponse, NewKid, ProfilePatch, ProfileResponse, RegisterRequest, UserType};
use crate::routes::{ApiError, AppState, Caller};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/register", web::post().to(register))
        .route("/users/deactivate", web::post().to(deactivate))
        .route("/babysitters", web::get().to(list_babysitters))
        .route("/parents", web::get().to(list_parents))
        .route("/profile", web::get().to(get_profile))
        .route("/profile", web::patch().to(update_profile))
        .route("/kids", web::post().to(add_kid))
        .route("/kids/{id}", web::patch().to(update_kid));
}

/// Register a babysitter or a family
///
/// POST /api/v1/register
///
/// Request body:
/// ```json
/// {
///   "username": "string",
///   "email": "string",
///   "user_type": "Babysitter|Parent",
///   "babysitter": { "name": "...", "age": 24, "address": "...",
///                   "hourly_rate_cents": 1500, "phone_number": "..." },
///   "parent": null
/// }
/// ```
async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let has_profile = match req.user_type {
        UserType::Babysitter => req.babysitter.is_some(),
        UserType::Parent => req.parent.is_some(),
    };
    if !has_profile {
        return Err(ApiError::Validation(format!(
            "A {:?} profile is required for this user type",
            req.user_type
        )));
    }

    let (user, role) = state.postgres.register(&req).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": format!("{:?} user created successfully", req.user_type),
        "user": user,
        "role": role,
    })))
}

async fn deactivate(
    state: web::Data<AppState>,
    caller: Caller,
) -> Result<HttpResponse, ApiError> {
    state.postgres.deactivate_user(caller.user_id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("User account deactivated")))
}

/// Families browse active babysitters
async fn list_babysitters(
    state: web::Data<AppState>,
    caller: Caller,
) -> Result<HttpResponse, ApiError> {
    caller.role.require_parent("browse babysitters")?;
    let babysitters = state.postgres.list_babysitters().await?;
    Ok(HttpResponse::Ok().json(babysitters))
}

/// Babysitters browse families
async fn list_parents(
    state: web::Data<AppState>,
    caller: Caller,
) -> Result<HttpResponse, ApiError> {
    caller.role.require_babysitter("browse families")?;
    let families = state.postgres.list_families().await?;
    Ok(HttpResponse::Ok().json(families))
}

async fn get_profile(
    state: web::Data<AppState>,
    caller: Caller,
) -> Result<HttpResponse, ApiError> {
    let profile = match caller.role {
        Role::Babysitter(id) => ProfileResponse::Babysitter(state.postgres.get_babysitter(id).await?),
        Role::Parent(id) => ProfileResponse::Parent(state.postgres.get_family(id).await?),
    };
    Ok(HttpResponse::Ok().json(profile))
}

async fn update_profile(
    state: web::Data<AppState>,
    caller: Caller,
    req: web::Json<ProfilePatch>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let profile = match (caller.role, &req.babysitter, &req.parent) {
        (Role::Babysitter(id), Some(patch), _) => {
            ProfileResponse::Babysitter(state.postgres.update_babysitter(id, patch).await?)
        }
        (Role::Parent(id), _, Some(patch)) => {
            ProfileResponse::Parent(state.postgres.update_family(id, patch).await?)
        }
        _ => {
            return Err(ApiError::Validation(
                "Body must contain the profile block matching your role".to_string(),
            ))
        }
    };
    Ok(HttpResponse::Ok().json(profile))
}

async fn add_kid(
    state: web::Data<AppState>,
    caller: Caller,
    req: web::Json<NewKid>,
) -> Result<HttpResponse, ApiError> {
    let family_id = caller.role.require_parent("add kids")?;
    req.validate()?;

    let kid = state.postgres.add_kid(family_id, &req).await?;
    Ok(HttpResponse::Created().json(kid))
}

async fn update_kid(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<Uuid>,
    req: web::Json<KidPatch>,
) -> Result<HttpResponse, ApiError> {
    caller.role.require_parent("edit kids")?;
    req.validate()?;

    let kid = state.postgres.update_kid(&caller.role, path.into_inner(), &req).await?;
    Ok(HttpResponse::Ok().json(kid))
}
