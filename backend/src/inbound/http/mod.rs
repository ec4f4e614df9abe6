//! HTTP surface: route registration, request authentication and error
//! rendering for the JSON API.

pub mod accounts;
pub mod auth;
pub mod dogs;
pub mod error;
pub mod medical_records;
pub mod schedules;
pub mod state;
pub mod system;
pub mod uploads;
pub mod users;

use actix_web::web;

use crate::domain::error::Error;

/// Handler result rendered through [`error`]'s `ResponseError` impl.
pub type ApiResult = Result<actix_web::HttpResponse, Error>;

/// Register every route on the service config.
///
/// Literal medical-record paths are registered before the `{id}` match so
/// `/upcoming` and friends are never captured as identifiers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(system::root))
        .route("/health", web::get().to(system::health))
        .service(
            web::scope("/api")
                .route("/database-status", web::get().to(system::database_status))
                .route("/signup", web::post().to(accounts::signup))
                .route("/signin", web::post().to(accounts::signin))
                .route("/users", web::get().to(users::list))
                .route(
                    "/user/username/{username}",
                    web::get().to(users::get_by_username),
                )
                .route("/user/{id}", web::get().to(users::get))
                .route("/user/{id}", web::put().to(users::update))
                .route("/dogs", web::post().to(dogs::add))
                .route("/dogs", web::get().to(dogs::list))
                .route("/dogs/{id}/schedules", web::get().to(schedules::list))
                .route("/dogs/{id}/schedule", web::post().to(schedules::add))
                .route("/dogs/{id}/schedule", web::put().to(schedules::update))
                .route("/dogs/{id}/schedule", web::delete().to(schedules::delete))
                .route("/dogs/{id}", web::get().to(dogs::get))
                .route("/dogs/{id}", web::put().to(dogs::update))
                .route("/dogs/{id}", web::delete().to(dogs::delete))
                .route(
                    "/medical-records/upcoming",
                    web::get().to(medical_records::upcoming),
                )
                .route(
                    "/medical-records/overdue",
                    web::get().to(medical_records::overdue),
                )
                .route(
                    "/medical-records/dog/{dogId}",
                    web::get().to(medical_records::list_for_dog),
                )
                .route("/medical-records", web::post().to(medical_records::add))
                .route("/medical-records", web::get().to(medical_records::list))
                .route(
                    "/medical-records/{id}",
                    web::get().to(medical_records::get),
                )
                .route(
                    "/medical-records/{id}",
                    web::put().to(medical_records::update),
                )
                .route(
                    "/medical-records/{id}",
                    web::delete().to(medical_records::delete),
                )
                .route(
                    "/upload/profile-picture",
                    web::post().to(uploads::profile_picture),
                )
                .route("/upload/post-image", web::post().to(uploads::post_image)),
        );
}
