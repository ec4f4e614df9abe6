//! Server assembly: adapter wiring and the actix application factory.

pub mod config;

use std::io;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use tracing::info;

use crate::domain::accounts::AccountService;
use crate::domain::dogs_service::DogService;
use crate::domain::ids::IdAllocator;
use crate::domain::medical_service::MedicalService;
use crate::domain::ports::auth_provider::AuthProvider;
use crate::domain::ports::counter_store::CounterStore;
use crate::domain::ports::dog_store::DogStore;
use crate::domain::ports::image_store::ImageStore;
use crate::domain::ports::medical_store::MedicalRecordStore;
use crate::domain::ports::store::StoreDiagnostics;
use crate::domain::ports::user_store::UserStore;
use crate::domain::uploads::UploadService;
use crate::domain::users_service::UsersService;
use crate::inbound::http;
use crate::inbound::http::state::HttpState;
use crate::middleware::Trace;
use crate::outbound::cloudinary::Cloudinary;
use crate::outbound::firebase::{FirebaseAuth, FirebaseDb};
use crate::outbound::memory::{MemoryAuthProvider, MemoryBackend, MemoryImageStore};

pub use config::{AppConfig, ConfigError, FirebaseSettings};

struct Adapters {
    users: Arc<dyn UserStore>,
    dogs: Arc<dyn DogStore>,
    medical: Arc<dyn MedicalRecordStore>,
    counters: Arc<dyn CounterStore>,
    auth: Arc<dyn AuthProvider>,
    images: Arc<dyn ImageStore>,
    diagnostics: Arc<dyn StoreDiagnostics>,
}

fn build_adapters(config: &AppConfig) -> io::Result<Adapters> {
    let (users, dogs, medical, counters, auth, diagnostics): (
        Arc<dyn UserStore>,
        Arc<dyn DogStore>,
        Arc<dyn MedicalRecordStore>,
        Arc<dyn CounterStore>,
        Arc<dyn AuthProvider>,
        Arc<dyn StoreDiagnostics>,
    ) = if let Some(firebase) = &config.firebase {
        let db = Arc::new(
            FirebaseDb::new(firebase.database_url.clone(), firebase.database_auth.clone())
                .map_err(io::Error::other)?,
        );
        let auth = Arc::new(
            FirebaseAuth::new(firebase.api_key.clone()).map_err(io::Error::other)?,
        );
        info!(database = %firebase.database_url, "using Firebase backend");
        (
            db.clone(),
            db.clone(),
            db.clone(),
            db.clone(),
            auth,
            db,
        )
    } else {
        let backend = Arc::new(MemoryBackend::new());
        info!("no Firebase settings, using in-memory backend");
        (
            backend.clone(),
            backend.clone(),
            backend.clone(),
            backend.clone(),
            Arc::new(MemoryAuthProvider::new()),
            backend,
        )
    };

    let images: Arc<dyn ImageStore> = if let Some(settings) = &config.cloudinary {
        Arc::new(Cloudinary::new(settings.clone()).map_err(io::Error::other)?)
    } else {
        Arc::new(MemoryImageStore::new())
    };

    Ok(Adapters {
        users,
        dogs,
        medical,
        counters,
        auth,
        images,
        diagnostics,
    })
}

/// Wire domain services over the adapters selected by `config`.
pub fn build_state(config: &AppConfig) -> io::Result<HttpState> {
    let adapters = build_adapters(config)?;
    let ids = IdAllocator::new(adapters.counters);
    Ok(HttpState {
        accounts: Arc::new(AccountService::new(
            adapters.auth,
            adapters.users.clone(),
            ids.clone(),
        )),
        users: Arc::new(UsersService::new(adapters.users.clone())),
        dogs: Arc::new(DogService::new(adapters.dogs.clone(), ids.clone())),
        medical: Arc::new(MedicalService::new(adapters.medical, adapters.dogs, ids)),
        uploads: Arc::new(UploadService::new(adapters.images, adapters.users)),
        diagnostics: adapters.diagnostics,
    })
}

/// Build and bind the HTTP server.
pub fn create_server(config: AppConfig) -> io::Result<Server> {
    let state = build_state(&config)?;
    info!(addr = %config.bind_addr, "starting server");
    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Trace)
            .configure(http::configure);
        #[cfg(debug_assertions)]
        let app = app.service(
            utoipa_swagger_ui::SwaggerUi::new("/docs/{_url}")
                .url("/api-docs/openapi.json", <crate::doc::ApiDoc as utoipa::OpenApi>::openapi()),
        );
        app
    })
    .bind(config.bind_addr)?
    .run();
    Ok(server)
}
