//! External authentication provider port.

use async_trait::async_trait;

/// Credentials issued by the provider after signup or sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthAccount {
    /// Provider-assigned stable account identifier.
    pub uid: String,
    /// Bearer token for subsequent authenticated requests.
    pub token: String,
}

/// Failures reported by the authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthProviderError {
    #[error("email already registered")]
    EmailExists,
    #[error("malformed email address")]
    InvalidEmail,
    #[error("password rejected by provider")]
    WeakPassword,
    #[error("no account for email")]
    UserNotFound,
    #[error("credentials rejected")]
    InvalidCredentials,
    #[error("token rejected")]
    InvalidToken,
    #[error("auth provider failure: {message}")]
    Upstream { message: String },
}

impl AuthProviderError {
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }
}

/// Account lifecycle operations delegated to the managed auth backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Register a new account and return its credentials.
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthAccount, AuthProviderError>;

    /// Exchange email and password for fresh credentials.
    async fn sign_in(&self, email: &str, password: &str)
        -> Result<AuthAccount, AuthProviderError>;

    /// Resolve a bearer token to the provider uid it belongs to.
    async fn verify_token(&self, token: &str) -> Result<String, AuthProviderError>;
}
