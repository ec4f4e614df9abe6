//! Shared application state handed to HTTP handlers.

use std::sync::Arc;

use crate::domain::accounts::AccountService;
use crate::domain::dogs_service::DogService;
use crate::domain::medical_service::MedicalService;
use crate::domain::ports::store::StoreDiagnostics;
use crate::domain::uploads::UploadService;
use crate::domain::users_service::UsersService;

/// Domain services wired at startup; see `server::build_state`.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<AccountService>,
    pub users: Arc<UsersService>,
    pub dogs: Arc<DogService>,
    pub medical: Arc<MedicalService>,
    pub uploads: Arc<UploadService>,
    pub diagnostics: Arc<dyn StoreDiagnostics>,
}
