//! API error type shared across services and handlers.

use serde::Serialize;
use serde_json::Value;

use crate::domain::ports::auth_provider::AuthProviderError;
use crate::domain::ports::image_store::ImageStoreError;
use crate::domain::ports::store::StoreError;
use crate::middleware::TraceId;

/// Machine-readable error categories surfaced to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    InternalError,
}

/// Error surfaced by domain services and rendered by the HTTP layer.
///
/// Carries the trace identifier active when the error was constructed so
/// clients can quote it back when reporting problems.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<Value>,
    pub trace_id: Option<String>,
}

impl Error {
    /// Build an error with the given code and message, capturing the
    /// current trace identifier if one is in scope.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            trace_id: TraceId::current().map(|id| id.to_string()),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Attach structured details for clients that want more than the message.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "store operation failed");
        Self::internal(err.to_string())
    }
}

impl From<AuthProviderError> for Error {
    fn from(err: AuthProviderError) -> Self {
        match err {
            AuthProviderError::EmailExists => Self::conflict("Email already exists"),
            AuthProviderError::InvalidEmail => Self::invalid_request("Invalid email address"),
            AuthProviderError::WeakPassword => Self::invalid_request("Password is too weak"),
            AuthProviderError::UserNotFound => Self::not_found("User not found"),
            AuthProviderError::InvalidCredentials => {
                Self::unauthorized("Invalid email or password")
            }
            AuthProviderError::InvalidToken => Self::unauthorized("Invalid or expired token"),
            AuthProviderError::Upstream { message } => {
                tracing::error!(error = %message, "auth provider failure");
                Self::internal(message)
            }
        }
    }
}

impl From<ImageStoreError> for Error {
    fn from(err: ImageStoreError) -> Self {
        tracing::error!(error = %err, "image store operation failed");
        Self::internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_email_exists_maps_to_conflict() {
        let err = Error::from(AuthProviderError::EmailExists);
        assert_eq!(err.code, ErrorCode::Conflict);
        assert_eq!(err.message, "Email already exists");
    }

    #[test]
    fn auth_invalid_credentials_maps_to_unauthorized() {
        let err = Error::from(AuthProviderError::InvalidCredentials);
        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert_eq!(err.message, "Invalid email or password");
    }

    #[test]
    fn store_errors_map_to_internal() {
        let err = Error::from(StoreError::query("boom"));
        assert_eq!(err.code, ErrorCode::InternalError);
    }

    #[tokio::test]
    async fn captures_trace_id_when_in_scope() {
        let trace_id = "0f7a1c4e-9a0b-4c6e-8f0d-0123456789ab"
            .parse::<TraceId>()
            .expect("valid uuid");
        let err =
            TraceId::scope(trace_id, async { Error::not_found("Dog not found") }).await;
        assert_eq!(err.trace_id.as_deref(), Some(trace_id.to_string().as_str()));
    }
}
