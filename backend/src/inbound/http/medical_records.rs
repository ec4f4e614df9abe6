//! Medical record handlers.

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::dog::DogId;
use crate::domain::error::Error;
use crate::domain::medical::{MedicalRecordPatch, RecordId, RecordStatus};
use crate::domain::medical_service::NewMedicalRecord;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::error;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddRecordRequest {
    pub dog_id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub next_due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub veterinarian: Option<String>,
    pub clinic: Option<String>,
    pub status: Option<RecordStatus>,
    pub documents: Option<Vec<String>>,
    pub reminder_enabled: Option<bool>,
    pub reminder_days: Option<u32>,
}

/// Log a medical record for one of the caller's dogs.
#[utoipa::path(
    post,
    path = "/api/medical-records",
    request_body = AddRecordRequest,
    responses(
        (status = 200, description = "Record created"),
        (status = 400, description = "Missing required fields", body = error::ErrorBody),
        (status = 403, description = "Dog owned by someone else", body = error::ErrorBody),
        (status = 404, description = "Unknown dog", body = error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "medical-records"
)]
pub async fn add(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    body: web::Json<AddRecordRequest>,
) -> ApiResult {
    let body = body.into_inner();
    let (Some(dog_id), Some(kind), Some(name), Some(date)) =
        (body.dog_id, body.kind, body.name, body.date)
    else {
        return Err(Error::invalid_request(
            "dogId, type, name, and date are required",
        ));
    };
    let record = state
        .medical
        .add(
            caller.id,
            NewMedicalRecord {
                dog_id: DogId(dog_id),
                kind,
                name,
                date,
                next_due_date: body.next_due_date,
                notes: body.notes,
                veterinarian: body.veterinarian,
                clinic: body.clinic,
                status: body.status,
                documents: body.documents,
                reminder_enabled: body.reminder_enabled,
                reminder_days: body.reminder_days,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Medical record added successfully!",
        "medicalId": record.medical_id,
        "medicalRecord": record,
    })))
}

/// All records across the caller's dogs.
#[utoipa::path(
    get,
    path = "/api/medical-records",
    responses((status = 200, description = "Caller's records")),
    security(("bearer" = [])),
    tag = "medical-records"
)]
pub async fn list(state: web::Data<HttpState>, caller: AuthenticatedUser) -> ApiResult {
    let records = state.medical.list_for_owner(caller.id).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "medicalRecords": records })))
}

/// Records for a single dog.
#[utoipa::path(
    get,
    path = "/api/medical-records/dog/{dogId}",
    params(("dogId" = i64, Path, description = "Dog identifier")),
    responses(
        (status = 200, description = "Dog's records"),
        (status = 403, description = "Dog owned by someone else", body = error::ErrorBody),
        (status = 404, description = "Unknown dog", body = error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "medical-records"
)]
pub async fn list_for_dog(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult {
    let records = state
        .medical
        .list_for_dog(caller.id, DogId(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "medicalRecords": records })))
}

/// Records due within the next 30 days.
#[utoipa::path(
    get,
    path = "/api/medical-records/upcoming",
    responses((status = 200, description = "Upcoming records with count")),
    security(("bearer" = [])),
    tag = "medical-records"
)]
pub async fn upcoming(state: web::Data<HttpState>, caller: AuthenticatedUser) -> ApiResult {
    let records = state.medical.upcoming(caller.id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": records.len(),
        "upcomingRecords": records,
    })))
}

/// Records past due and not completed.
#[utoipa::path(
    get,
    path = "/api/medical-records/overdue",
    responses((status = 200, description = "Overdue records with count")),
    security(("bearer" = [])),
    tag = "medical-records"
)]
pub async fn overdue(state: web::Data<HttpState>, caller: AuthenticatedUser) -> ApiResult {
    let records = state.medical.overdue(caller.id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": records.len(),
        "overdueRecords": records,
    })))
}

/// Fetch a single record.
#[utoipa::path(
    get,
    path = "/api/medical-records/{id}",
    params(("id" = i64, Path, description = "Record identifier")),
    responses(
        (status = 200, description = "Record"),
        (status = 403, description = "Owned by someone else", body = error::ErrorBody),
        (status = 404, description = "Unknown record", body = error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "medical-records"
)]
pub async fn get(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult {
    let record = state
        .medical
        .get(caller.id, RecordId(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "medicalRecord": record })))
}

/// Partially update a record.
#[utoipa::path(
    put,
    path = "/api/medical-records/{id}",
    params(("id" = i64, Path, description = "Record identifier")),
    request_body = MedicalRecordPatch,
    responses(
        (status = 200, description = "Updated record"),
        (status = 403, description = "Owned by someone else", body = error::ErrorBody),
        (status = 404, description = "Unknown record", body = error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "medical-records"
)]
pub async fn update(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<i64>,
    body: web::Json<MedicalRecordPatch>,
) -> ApiResult {
    let record = state
        .medical
        .update(caller.id, RecordId(path.into_inner()), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Medical record updated successfully!",
        "medicalId": record.medical_id,
        "medicalRecord": record,
    })))
}

/// Delete a record.
#[utoipa::path(
    delete,
    path = "/api/medical-records/{id}",
    params(("id" = i64, Path, description = "Record identifier")),
    responses(
        (status = 200, description = "Record deleted"),
        (status = 403, description = "Owned by someone else", body = error::ErrorBody),
        (status = 404, description = "Unknown record", body = error::ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "medical-records"
)]
pub async fn delete(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult {
    state
        .medical
        .delete(caller.id, RecordId(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Medical record deleted successfully!",
    })))
}
