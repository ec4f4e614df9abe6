//! Shared datastore error type and diagnostics port.

use async_trait::async_trait;

/// Failure surfaced by a datastore adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("store connection failed: {message}")]
    Connection { message: String },
    #[error("store query failed: {message}")]
    Query { message: String },
    #[error("store payload could not be decoded: {message}")]
    Decode { message: String },
    /// A conditional write kept losing to concurrent writers.
    #[error("store write contention, retries exhausted")]
    Contended,
}

impl StoreError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Descriptive summary of the backing datastore, for status endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreInfo {
    /// Human-readable backend name, e.g. "firebase-rtdb" or "memory".
    pub database: String,
    /// Endpoint the adapter talks to, when there is one.
    pub endpoint: Option<String>,
}

/// Health probing for the active datastore.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreDiagnostics: Send + Sync {
    /// Round-trip a trivial operation against the store.
    async fn probe(&self) -> Result<(), StoreError>;

    /// Describe the backing store without touching it.
    fn describe(&self) -> StoreInfo;
}
