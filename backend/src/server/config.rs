//! Environment-driven application configuration.
//!
//! Upstream settings are optional as a pair: a Firebase section needs both
//! the database URL and the API key, a Cloudinary section needs all three
//! credentials. With a section absent the server falls back to the matching
//! in-memory adapters.

use std::net::SocketAddr;

use url::Url;

use crate::outbound::cloudinary::CloudinarySettings;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Firebase project settings.
#[derive(Debug, Clone)]
pub struct FirebaseSettings {
    /// Realtime Database root, e.g. `https://project.firebaseio.com`.
    pub database_url: Url,
    /// Optional legacy database secret for the `auth` query parameter.
    pub database_auth: Option<String>,
    /// Web API key for Identity Toolkit calls.
    pub api_key: String,
}

/// Top-level configuration assembled in `main` and passed down explicitly.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub firebase: Option<FirebaseSettings>,
    pub cloudinary: Option<CloudinarySettings>,
}

/// Failure while reading the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {name}: {message}")]
    Invalid { name: &'static str, message: String },
    #[error("{name} is set but {missing} is not")]
    IncompleteSection {
        name: &'static str,
        missing: &'static str,
    },
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env_var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned())
            .parse::<SocketAddr>()
            .map_err(|err| ConfigError::Invalid {
                name: "BIND_ADDR",
                message: err.to_string(),
            })?;

        let firebase = match (env_var("FIREBASE_DATABASE_URL"), env_var("FIREBASE_API_KEY")) {
            (Some(database_url), Some(api_key)) => Some(FirebaseSettings {
                database_url: Url::parse(&database_url).map_err(|err| ConfigError::Invalid {
                    name: "FIREBASE_DATABASE_URL",
                    message: err.to_string(),
                })?,
                database_auth: env_var("FIREBASE_DATABASE_AUTH"),
                api_key,
            }),
            (Some(_), None) => {
                return Err(ConfigError::IncompleteSection {
                    name: "FIREBASE_DATABASE_URL",
                    missing: "FIREBASE_API_KEY",
                })
            }
            (None, Some(_)) => {
                return Err(ConfigError::IncompleteSection {
                    name: "FIREBASE_API_KEY",
                    missing: "FIREBASE_DATABASE_URL",
                })
            }
            (None, None) => None,
        };

        let cloudinary = match (
            env_var("CLOUDINARY_CLOUD_NAME"),
            env_var("CLOUDINARY_API_KEY"),
            env_var("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinarySettings {
                cloud_name,
                api_key,
                api_secret,
            }),
            (None, None, None) => None,
            _ => {
                return Err(ConfigError::IncompleteSection {
                    name: "CLOUDINARY_CLOUD_NAME",
                    missing: "CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET",
                })
            }
        };

        Ok(Self {
            bind_addr,
            firebase,
            cloudinary,
        })
    }

    /// Configuration for tests and local runs: memory adapters, ephemeral
    /// port.
    pub fn in_memory() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            firebase: None,
            cloudinary: None,
        }
    }
}
