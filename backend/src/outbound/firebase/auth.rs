//! Identity Toolkit adapter.
//!
//! Uses the REST endpoints (`accounts:signUp`, `accounts:signInWithPassword`,
//! `accounts:lookup`) authenticated by the project's web API key. The
//! `idToken` returned by signup/sign-in doubles as the bearer token clients
//! present on authenticated routes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use url::Url;

use crate::domain::ports::auth_provider::{AuthAccount, AuthProvider, AuthProviderError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_ENDPOINT: &str = "https://identitytoolkit.googleapis.com/v1/";

/// Identity Toolkit client implementing the auth provider port.
#[derive(Clone)]
pub struct FirebaseAuth {
    client: Client,
    endpoint: Url,
    api_key: String,
}

#[derive(Deserialize)]
struct SessionResponse {
    #[serde(rename = "localId")]
    local_id: String,
    #[serde(rename = "idToken")]
    id_token: String,
}

#[derive(Deserialize)]
struct LookupResponse {
    users: Option<Vec<LookupUser>>,
}

#[derive(Deserialize)]
struct LookupUser {
    #[serde(rename = "localId")]
    local_id: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

impl FirebaseAuth {
    pub fn new(api_key: String) -> Result<Self, AuthProviderError> {
        let endpoint = Url::parse(DEFAULT_ENDPOINT)
            .map_err(|err| AuthProviderError::upstream(err.to_string()))?;
        Self::with_endpoint(endpoint, api_key)
    }

    /// Client against a custom endpoint, used with the auth emulator and in
    /// tests.
    pub fn with_endpoint(endpoint: Url, api_key: String) -> Result<Self, AuthProviderError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| AuthProviderError::upstream(err.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    // `Url::join` would read `accounts:signUp` as a full URL with scheme
    // `accounts`, so the segment is pushed onto the endpoint path instead.
    fn action_url(&self, action: &str) -> Result<Url, AuthProviderError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| AuthProviderError::upstream("auth endpoint cannot be a base"))?
            .pop_if_empty()
            .push(&format!("accounts:{action}"));
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn post_action<T: serde::de::DeserializeOwned>(
        &self,
        action: &str,
        body: serde_json::Value,
    ) -> Result<T, AuthProviderError> {
        let url = self.action_url(action)?;
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|err| AuthProviderError::upstream(err.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| AuthProviderError::upstream(err.to_string()))?;
        if !status.is_success() {
            return Err(map_api_error(&body));
        }
        serde_json::from_str(&body).map_err(|err| AuthProviderError::upstream(err.to_string()))
    }
}

/// Translate an Identity Toolkit error body into the port's taxonomy.
fn map_api_error(body: &str) -> AuthProviderError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| body.to_owned());
    // Some codes carry a suffix, e.g. "WEAK_PASSWORD : Password should be
    // at least 6 characters"; match on the leading code.
    let code = message.split(&[' ', ':'][..]).next().unwrap_or("");
    match code {
        "EMAIL_EXISTS" => AuthProviderError::EmailExists,
        "INVALID_EMAIL" | "MISSING_EMAIL" => AuthProviderError::InvalidEmail,
        "WEAK_PASSWORD" | "MISSING_PASSWORD" => AuthProviderError::WeakPassword,
        "EMAIL_NOT_FOUND" => AuthProviderError::UserNotFound,
        "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => AuthProviderError::InvalidCredentials,
        "INVALID_ID_TOKEN" | "TOKEN_EXPIRED" | "USER_NOT_FOUND" | "USER_DISABLED" => {
            AuthProviderError::InvalidToken
        }
        _ => {
            warn!(error = %message, "unmapped auth provider error");
            AuthProviderError::upstream(message)
        }
    }
}

#[async_trait]
impl AuthProvider for FirebaseAuth {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthAccount, AuthProviderError> {
        let session: SessionResponse = self
            .post_action(
                "signUp",
                json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;
        Ok(AuthAccount {
            uid: session.local_id,
            token: session.id_token,
        })
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthAccount, AuthProviderError> {
        let session: SessionResponse = self
            .post_action(
                "signInWithPassword",
                json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;
        Ok(AuthAccount {
            uid: session.local_id,
            token: session.id_token,
        })
    }

    async fn verify_token(&self, token: &str) -> Result<String, AuthProviderError> {
        let lookup: LookupResponse = self
            .post_action("lookup", json!({ "idToken": token }))
            .await?;
        lookup
            .users
            .and_then(|users| users.into_iter().next())
            .map(|user| user.local_id)
            .ok_or(AuthProviderError::InvalidToken)
    }
}
