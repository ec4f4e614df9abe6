//! Service banner, health and datastore status handlers.

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;

use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

fn environment() -> &'static str {
    if cfg!(debug_assertions) {
        "development"
    } else {
        "production"
    }
}

/// Service banner.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner")),
    tag = "system"
)]
pub async fn root() -> ApiResult {
    Ok(HttpResponse::Ok().json(json!({
        "message": "Doggo Backend API is running!",
        "environment": environment(),
        "timestamp": Utc::now(),
    })))
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service health")),
    tag = "system"
)]
pub async fn health() -> ApiResult {
    Ok(HttpResponse::Ok().json(json!({
        "status": "OK",
        "service": "Doggo API",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": environment(),
    })))
}

/// Round-trip probe against the active datastore.
///
/// Always answers HTTP 200; the body's `status` field reports the outcome.
#[utoipa::path(
    get,
    path = "/api/database-status",
    responses((status = 200, description = "Datastore connectivity report")),
    tag = "system"
)]
pub async fn database_status(state: web::Data<HttpState>) -> ApiResult {
    let info = state.diagnostics.describe();
    match state.diagnostics.probe().await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "status": "connected",
            "database": info.database,
            "endpoint": info.endpoint,
            "test": "successful",
        }))),
        Err(err) => Ok(HttpResponse::Ok().json(json!({
            "status": "error",
            "message": err.to_string(),
        }))),
    }
}
