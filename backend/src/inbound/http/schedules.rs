//! Schedule editor handlers.
//!
//! Entries are addressed by category and entry id carried in the request
//! body; the dog id comes from the path.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::dog::DogId;
use crate::domain::error::Error;
use crate::domain::schedule::{ScheduleCategory, ScheduleEntryPatch};
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::error;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddEntryRequest {
    pub category: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryRequest {
    pub category: String,
    pub schedule_id: String,
    pub time: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEntryRequest {
    pub category: String,
    pub schedule_id: String,
}

fn parse_category(raw: &str) -> Result<ScheduleCategory, Error> {
    raw.parse::<ScheduleCategory>()
        .map_err(|err| Error::invalid_request(err.to_string()))
}

/// Full schedule map for a dog.
#[utoipa::path(
    get,
    path = "/api/dogs/{id}/schedules",
    params(("id" = i64, Path, description = "Dog identifier")),
    responses(
        (status = 200, description = "Schedule by category"),
        (status = 403, description = "Owned by someone else", body = error::ErrorBody),
        (status = 404, description = "Unknown dog", body = error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "schedules"
)]
pub async fn list(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult {
    let dog = state.dogs.get(caller.id, DogId(path.into_inner())).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "schedule": dog.schedule,
    })))
}

/// Add a schedule entry.
#[utoipa::path(
    post,
    path = "/api/dogs/{id}/schedule",
    params(("id" = i64, Path, description = "Dog identifier")),
    request_body = AddEntryRequest,
    responses(
        (status = 200, description = "Entry added"),
        (status = 400, description = "Bad category or missing time", body = error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "schedules"
)]
pub async fn add(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<i64>,
    body: web::Json<AddEntryRequest>,
) -> ApiResult {
    let body = body.into_inner();
    let category = parse_category(&body.category)?;
    let dog = state
        .dogs
        .add_schedule_entry(
            caller.id,
            DogId(path.into_inner()),
            category,
            body.time,
            body.description,
        )
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Schedule added successfully!",
        "schedule": dog.schedule,
    })))
}

/// Update fields of an existing schedule entry.
#[utoipa::path(
    put,
    path = "/api/dogs/{id}/schedule",
    params(("id" = i64, Path, description = "Dog identifier")),
    request_body = UpdateEntryRequest,
    responses(
        (status = 200, description = "Entry updated"),
        (status = 404, description = "Unknown dog or entry", body = error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "schedules"
)]
pub async fn update(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<i64>,
    body: web::Json<UpdateEntryRequest>,
) -> ApiResult {
    let body = body.into_inner();
    let category = parse_category(&body.category)?;
    let dog = state
        .dogs
        .update_schedule_entry(
            caller.id,
            DogId(path.into_inner()),
            category,
            &body.schedule_id,
            ScheduleEntryPatch {
                time: body.time,
                description: body.description,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Schedule updated successfully!",
        "schedule": dog.schedule,
    })))
}

/// Remove a schedule entry.
#[utoipa::path(
    delete,
    path = "/api/dogs/{id}/schedule",
    params(("id" = i64, Path, description = "Dog identifier")),
    request_body = DeleteEntryRequest,
    responses(
        (status = 200, description = "Entry removed"),
        (status = 404, description = "Unknown dog or entry", body = error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "schedules"
)]
pub async fn delete(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<i64>,
    body: web::Json<DeleteEntryRequest>,
) -> ApiResult {
    let body = body.into_inner();
    let category = parse_category(&body.category)?;
    let dog = state
        .dogs
        .delete_schedule_entry(
            caller.id,
            DogId(path.into_inner()),
            category,
            &body.schedule_id,
        )
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Schedule deleted successfully!",
        "schedule": dog.schedule,
    })))
}
