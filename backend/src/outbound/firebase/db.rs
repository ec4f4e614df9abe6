//! Realtime Database adapter.
//!
//! Entities live under flat nodes keyed by their numeric id (`users/{id}`,
//! `dogs/{id}`, `medical_records/{id}`); counters under `counters/{kind}`.
//! Field queries use the REST `orderBy`/`equalTo` parameters, which require
//! matching `.indexOn` rules on the database side.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ETAG, IF_MATCH};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};
use url::Url;

use crate::domain::dog::{Dog, DogId};
use crate::domain::ids::EntityKind;
use crate::domain::medical::{MedicalRecord, RecordId};
use crate::domain::ports::counter_store::CounterStore;
use crate::domain::ports::dog_store::DogStore;
use crate::domain::ports::medical_store::MedicalRecordStore;
use crate::domain::ports::store::{StoreDiagnostics, StoreError, StoreInfo};
use crate::domain::ports::user_store::UserStore;
use crate::domain::user::{User, UserId};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Attempts for the conditional counter write before giving up.
const COUNTER_RETRIES: usize = 4;

/// Realtime Database client implementing the persistence ports.
#[derive(Clone)]
pub struct FirebaseDb {
    client: Client,
    base: Url,
    auth: Option<String>,
}

impl FirebaseDb {
    /// Build a client for the database at `base`. `auth` is the optional
    /// legacy database secret appended as the `auth` query parameter.
    pub fn new(base: Url, auth: Option<String>) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| StoreError::connection(err.to_string()))?;
        Ok(Self { client, base, auth })
    }

    fn node_url(&self, path: &str) -> Result<Url, StoreError> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| StoreError::connection("database URL cannot be a base"))?;
            segments.pop_if_empty();
            for segment in path.split('/') {
                segments.push(segment);
            }
        }
        url.set_path(&format!("{}.json", url.path().trim_end_matches('/')));
        if let Some(auth) = &self.auth {
            url.query_pairs_mut().append_pair("auth", auth);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, StoreError> {
        let url = self.node_url(path)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| StoreError::connection(err.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| StoreError::connection(err.to_string()))?;
        if !status.is_success() {
            return Err(StoreError::query(format!("GET {path} returned {status}")));
        }
        if body == "null" {
            return Ok(None);
        }
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|err| StoreError::decode(err.to_string()))
    }

    async fn put_json<T: Serialize + Sync>(&self, path: &str, value: &T) -> Result<(), StoreError> {
        let url = self.node_url(path)?;
        let response = self
            .client
            .put(url)
            .json(value)
            .send()
            .await
            .map_err(|err| StoreError::connection(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::query(format!("PUT {path} returned {status}")));
        }
        Ok(())
    }

    async fn delete_node(&self, path: &str) -> Result<(), StoreError> {
        let url = self.node_url(path)?;
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|err| StoreError::connection(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::query(format!(
                "DELETE {path} returned {status}"
            )));
        }
        Ok(())
    }

    /// Fetch every child of `node` whose `field` equals `value`.
    async fn query_by<T: DeserializeOwned>(
        &self,
        node: &str,
        field: &str,
        value: &serde_json::Value,
    ) -> Result<BTreeMap<String, T>, StoreError> {
        let mut url = self.node_url(node)?;
        url.query_pairs_mut()
            .append_pair("orderBy", &format!("\"{field}\""))
            .append_pair("equalTo", &value.to_string());
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| StoreError::connection(err.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| StoreError::connection(err.to_string()))?;
        if !status.is_success() {
            return Err(StoreError::query(format!(
                "query {node}/{field} returned {status}: {body}"
            )));
        }
        if body == "null" {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&body).map_err(|err| StoreError::decode(err.to_string()))
    }

    async fn query_one<T: DeserializeOwned>(
        &self,
        node: &str,
        field: &str,
        value: &serde_json::Value,
    ) -> Result<Option<T>, StoreError> {
        let mut matches = self.query_by::<T>(node, field, value).await?;
        if matches.len() > 1 {
            warn!(node, field, "query matched more than one record");
        }
        Ok(matches.pop_first().map(|(_, record)| record))
    }
}

#[async_trait]
impl CounterStore for FirebaseDb {
    /// Conditional read-increment-write on `counters/{kind}` using ETags.
    ///
    /// A lost race returns 412 with the winner's ETag; the write is retried
    /// a bounded number of times before reporting contention.
    async fn increment(&self, kind: EntityKind) -> Result<i64, StoreError> {
        let path = format!("counters/{kind}");
        for attempt in 0..COUNTER_RETRIES {
            let url = self.node_url(&path)?;
            let response = self
                .client
                .get(url)
                .header("X-Firebase-ETag", HeaderValue::from_static("true"))
                .send()
                .await
                .map_err(|err| StoreError::connection(err.to_string()))?;
            let status = response.status();
            let etag = read_etag(response.headers());
            let body = response
                .text()
                .await
                .map_err(|err| StoreError::connection(err.to_string()))?;
            if !status.is_success() {
                return Err(StoreError::query(format!(
                    "counter read returned {status}"
                )));
            }
            let etag = etag.ok_or_else(|| {
                StoreError::query("counter read returned no ETag".to_owned())
            })?;
            let current: i64 = if body == "null" {
                0
            } else {
                serde_json::from_str(&body).map_err(|err| StoreError::decode(err.to_string()))?
            };
            let next = current + 1;

            let url = self.node_url(&path)?;
            let response = self
                .client
                .put(url)
                .header(IF_MATCH, etag)
                .json(&next)
                .send()
                .await
                .map_err(|err| StoreError::connection(err.to_string()))?;
            match response.status() {
                status if status.is_success() => return Ok(next),
                StatusCode::PRECONDITION_FAILED => {
                    debug!(kind = %kind, attempt, "counter write lost race");
                }
                status => {
                    return Err(StoreError::query(format!(
                        "counter write returned {status}"
                    )))
                }
            }
        }
        Err(StoreError::Contended)
    }
}

fn read_etag(headers: &HeaderMap) -> Option<String> {
    headers
        .get(ETAG)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

#[async_trait]
impl UserStore for FirebaseDb {
    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        self.put_json(&format!("users/{}", user.id), user).await
    }

    async fn fetch(&self, id: UserId) -> Result<Option<User>, StoreError> {
        self.get_json(&format!("users/{id}")).await
    }

    async fn fetch_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.query_one("users", "email", &json!(email)).await
    }

    async fn fetch_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.query_one("users", "username", &json!(username)).await
    }

    async fn fetch_by_uid(&self, uid: &str) -> Result<Option<User>, StoreError> {
        self.query_one("users", "uid", &json!(uid)).await
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let users: BTreeMap<String, User> = self.get_json("users").await?.unwrap_or_default();
        Ok(users.into_values().collect())
    }

    async fn update(&self, user: &User) -> Result<(), StoreError> {
        self.put_json(&format!("users/{}", user.id), user).await
    }
}

#[async_trait]
impl DogStore for FirebaseDb {
    async fn insert(&self, dog: &Dog) -> Result<(), StoreError> {
        self.put_json(&format!("dogs/{}", dog.dog_id), dog).await
    }

    async fn fetch(&self, id: DogId) -> Result<Option<Dog>, StoreError> {
        self.get_json(&format!("dogs/{id}")).await
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Dog>, StoreError> {
        let dogs = self
            .query_by::<Dog>("dogs", "ownerId", &json!(owner.0))
            .await?;
        Ok(dogs.into_values().collect())
    }

    async fn update(&self, dog: &Dog) -> Result<(), StoreError> {
        self.put_json(&format!("dogs/{}", dog.dog_id), dog).await
    }

    async fn delete(&self, id: DogId) -> Result<(), StoreError> {
        self.delete_node(&format!("dogs/{id}")).await
    }
}

#[async_trait]
impl MedicalRecordStore for FirebaseDb {
    async fn insert(&self, record: &MedicalRecord) -> Result<(), StoreError> {
        self.put_json(&format!("medical_records/{}", record.medical_id), record)
            .await
    }

    async fn fetch(&self, id: RecordId) -> Result<Option<MedicalRecord>, StoreError> {
        self.get_json(&format!("medical_records/{id}")).await
    }

    async fn list_by_dog(&self, dog: DogId) -> Result<Vec<MedicalRecord>, StoreError> {
        let records = self
            .query_by::<MedicalRecord>("medical_records", "dogId", &json!(dog.0))
            .await?;
        Ok(records.into_values().collect())
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<MedicalRecord>, StoreError> {
        let records = self
            .query_by::<MedicalRecord>("medical_records", "ownerId", &json!(owner.0))
            .await?;
        Ok(records.into_values().collect())
    }

    async fn update(&self, record: &MedicalRecord) -> Result<(), StoreError> {
        self.put_json(&format!("medical_records/{}", record.medical_id), record)
            .await
    }

    async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        self.delete_node(&format!("medical_records/{id}")).await
    }
}

#[async_trait]
impl StoreDiagnostics for FirebaseDb {
    async fn probe(&self) -> Result<(), StoreError> {
        self.put_json(
            "connection_test",
            &json!({ "test": true, "timestamp": chrono::Utc::now() }),
        )
        .await?;
        self.get_json::<serde_json::Value>("connection_test")
            .await?
            .ok_or_else(|| StoreError::query("connection test record missing after write"))?;
        Ok(())
    }

    fn describe(&self) -> StoreInfo {
        StoreInfo {
            database: "firebase-rtdb".to_owned(),
            endpoint: Some(self.base.to_string()),
        }
    }
}
