//! User profile handlers.

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::domain::user::{UserId, UserPatch};
use crate::inbound::http::error;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Fetch a user by numeric identifier.
#[utoipa::path(
    get,
    path = "/api/user/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User profile"),
        (status = 404, description = "Unknown user", body = error::ErrorBody),
    ),
    tag = "users"
)]
pub async fn get(state: web::Data<HttpState>, path: web::Path<i64>) -> ApiResult {
    let user = state.users.get(UserId(path.into_inner())).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "user": user })))
}

/// Fetch a user by username.
#[utoipa::path(
    get,
    path = "/api/user/username/{username}",
    params(("username" = String, Path, description = "Unique username")),
    responses(
        (status = 200, description = "User profile"),
        (status = 404, description = "Unknown user", body = error::ErrorBody),
    ),
    tag = "users"
)]
pub async fn get_by_username(state: web::Data<HttpState>, path: web::Path<String>) -> ApiResult {
    let user = state.users.get_by_username(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "user": user })))
}

/// List every registered user.
#[utoipa::path(
    get,
    path = "/api/users",
    responses((status = 200, description = "All users")),
    tag = "users"
)]
pub async fn list(state: web::Data<HttpState>) -> ApiResult {
    let users = state.users.list().await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": users.len(),
        "users": users,
    })))
}

/// Partially update a user profile.
#[utoipa::path(
    put,
    path = "/api/user/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = UserPatch,
    responses(
        (status = 200, description = "Updated profile"),
        (status = 404, description = "Unknown user", body = error::ErrorBody),
        (status = 409, description = "Email or username taken", body = error::ErrorBody),
    ),
    tag = "users"
)]
pub async fn update(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    body: web::Json<UserPatch>,
) -> ApiResult {
    let user = state
        .users
        .update(UserId(path.into_inner()), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "User updated successfully!",
        "user": user,
    })))
}
