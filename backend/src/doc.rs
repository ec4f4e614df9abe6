//! OpenAPI document assembled from the annotated handlers.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::dog::{Dog, DogId, DogPatch};
use crate::domain::error::ErrorCode;
use crate::domain::medical::{MedicalRecord, MedicalRecordPatch, RecordId, RecordStatus};
use crate::domain::schedule::{Schedule, ScheduleCategory, ScheduleEntry};
use crate::domain::user::{User, UserId, UserPatch};
use crate::inbound::http;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Doggo API",
        description = "Pet-care tracking backend: accounts, dogs, schedules and medical records."
    ),
    paths(
        http::system::root,
        http::system::health,
        http::system::database_status,
        http::accounts::signup,
        http::accounts::signin,
        http::users::get,
        http::users::get_by_username,
        http::users::list,
        http::users::update,
        http::dogs::add,
        http::dogs::list,
        http::dogs::get,
        http::dogs::update,
        http::dogs::delete,
        http::schedules::list,
        http::schedules::add,
        http::schedules::update,
        http::schedules::delete,
        http::medical_records::add,
        http::medical_records::list,
        http::medical_records::list_for_dog,
        http::medical_records::upcoming,
        http::medical_records::overdue,
        http::medical_records::get,
        http::medical_records::update,
        http::medical_records::delete,
        http::uploads::profile_picture,
        http::uploads::post_image,
    ),
    components(schemas(
        User,
        UserId,
        UserPatch,
        Dog,
        DogId,
        DogPatch,
        Schedule,
        ScheduleCategory,
        ScheduleEntry,
        MedicalRecord,
        MedicalRecordPatch,
        RecordId,
        RecordStatus,
        ErrorCode,
        http::error::ErrorBody,
        http::accounts::SignupRequest,
        http::accounts::SigninRequest,
        http::dogs::AddDogRequest,
        http::schedules::AddEntryRequest,
        http::schedules::UpdateEntryRequest,
        http::schedules::DeleteEntryRequest,
        http::medical_records::AddRecordRequest,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "system", description = "Service status"),
        (name = "auth", description = "Signup and sign-in"),
        (name = "users", description = "User profiles"),
        (name = "dogs", description = "Dog profiles"),
        (name = "schedules", description = "Daily care schedules"),
        (name = "medical-records", description = "Medical history and reminders"),
        (name = "uploads", description = "Image uploads"),
    )
)]
pub struct ApiDoc;
