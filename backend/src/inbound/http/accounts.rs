//! Signup and sign-in handlers.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::inbound::http::error;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SigninRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created"),
        (status = 400, description = "Validation failure", body = error::ErrorBody),
        (status = 409, description = "Email or username taken", body = error::ErrorBody),
    ),
    tag = "auth"
)]
pub async fn signup(state: web::Data<HttpState>, body: web::Json<SignupRequest>) -> ApiResult {
    let body = body.into_inner();
    let session = state
        .accounts
        .signup(&body.email, &body.password, &body.username, &body.name)
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Account created successfully!",
        "token": session.token,
        "userId": session.user.id,
        "userDbId": session.user.id,
        "uid": session.user.uid,
        "username": session.user.username,
    })))
}

/// Exchange email and password for a fresh token.
#[utoipa::path(
    post,
    path = "/api/signin",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Signed in"),
        (status = 401, description = "Bad credentials", body = error::ErrorBody),
        (status = 404, description = "Unknown account", body = error::ErrorBody),
    ),
    tag = "auth"
)]
pub async fn signin(state: web::Data<HttpState>, body: web::Json<SigninRequest>) -> ApiResult {
    let body = body.into_inner();
    let session = state.accounts.signin(&body.email, &body.password).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Welcome back!",
        "token": session.token,
        "username": session.user.username,
        "userId": session.user.id,
        "userDbId": session.user.id,
        "uid": session.user.uid,
    })))
}
