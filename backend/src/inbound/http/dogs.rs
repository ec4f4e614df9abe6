//! Dog profile handlers.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::dog::{DogId, DogPatch};
use crate::domain::dogs_service::NewDog;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::error;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddDogRequest {
    #[serde(default)]
    pub name: String,
    pub breed: Option<String>,
    pub age: Option<u32>,
    pub birth_date: Option<String>,
    pub photo: Option<String>,
    pub weight: Option<f64>,
    pub gender: Option<String>,
}

/// Register a dog for the authenticated owner.
#[utoipa::path(
    post,
    path = "/api/dogs",
    request_body = AddDogRequest,
    responses(
        (status = 200, description = "Dog registered"),
        (status = 400, description = "Missing name", body = error::ErrorBody),
        (status = 401, description = "Not authenticated", body = error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "dogs"
)]
pub async fn add(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    body: web::Json<AddDogRequest>,
) -> ApiResult {
    let body = body.into_inner();
    let dog = state
        .dogs
        .add(
            caller.id,
            NewDog {
                name: body.name,
                breed: body.breed,
                age: body.age,
                birth_date: body.birth_date,
                photo: body.photo,
                weight: body.weight,
                gender: body.gender,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Dog added successfully!",
        "dogId": dog.dog_id,
        "dog": dog,
    })))
}

/// List the caller's dogs.
#[utoipa::path(
    get,
    path = "/api/dogs",
    responses((status = 200, description = "Owned dogs")),
    security(("bearer" = [])),
    tag = "dogs"
)]
pub async fn list(state: web::Data<HttpState>, caller: AuthenticatedUser) -> ApiResult {
    let dogs = state.dogs.list(caller.id).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "dogs": dogs })))
}

/// Fetch one of the caller's dogs.
#[utoipa::path(
    get,
    path = "/api/dogs/{id}",
    params(("id" = i64, Path, description = "Dog identifier")),
    responses(
        (status = 200, description = "Dog profile"),
        (status = 403, description = "Owned by someone else", body = error::ErrorBody),
        (status = 404, description = "Unknown dog", body = error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "dogs"
)]
pub async fn get(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult {
    let dog = state.dogs.get(caller.id, DogId(path.into_inner())).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "dog": dog })))
}

/// Partially update a dog profile.
#[utoipa::path(
    put,
    path = "/api/dogs/{id}",
    params(("id" = i64, Path, description = "Dog identifier")),
    request_body = DogPatch,
    responses(
        (status = 200, description = "Updated dog"),
        (status = 403, description = "Owned by someone else", body = error::ErrorBody),
        (status = 404, description = "Unknown dog", body = error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "dogs"
)]
pub async fn update(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<i64>,
    body: web::Json<DogPatch>,
) -> ApiResult {
    let dog = state
        .dogs
        .update(caller.id, DogId(path.into_inner()), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Dog updated successfully!",
        "dogId": dog.dog_id,
        "dog": dog,
    })))
}

/// Delete a dog.
#[utoipa::path(
    delete,
    path = "/api/dogs/{id}",
    params(("id" = i64, Path, description = "Dog identifier")),
    responses(
        (status = 200, description = "Dog deleted"),
        (status = 403, description = "Owned by someone else", body = error::ErrorBody),
        (status = 404, description = "Unknown dog", body = error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "dogs"
)]
pub async fn delete(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult {
    state
        .dogs
        .delete(caller.id, DogId(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Dog deleted successfully!",
    })))
}
