//! In-memory adapters used when no upstream credentials are configured.
//!
//! They back local development and the integration tests: same ports, same
//! observable behaviour, no network. Auth tokens are random UUIDs held in a
//! map, so restarting the process invalidates every session.

use std::collections::BTreeMap;
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::dog::{Dog, DogId};
use crate::domain::ids::EntityKind;
use crate::domain::medical::{MedicalRecord, RecordId};
use crate::domain::ports::auth_provider::{AuthAccount, AuthProvider, AuthProviderError};
use crate::domain::ports::counter_store::CounterStore;
use crate::domain::ports::dog_store::DogStore;
use crate::domain::ports::image_store::{ImageStore, ImageStoreError, StoredImage};
use crate::domain::ports::medical_store::MedicalRecordStore;
use crate::domain::ports::store::{StoreDiagnostics, StoreError, StoreInfo};
use crate::domain::ports::user_store::UserStore;
use crate::domain::user::{User, UserId};

fn poisoned() -> StoreError {
    StoreError::connection("store lock poisoned")
}

/// Map-backed datastore implementing every persistence port.
#[derive(Default)]
pub struct MemoryBackend {
    users: RwLock<BTreeMap<i64, User>>,
    dogs: RwLock<BTreeMap<i64, Dog>>,
    medical: RwLock<BTreeMap<i64, MedicalRecord>>,
    counters: Mutex<BTreeMap<EntityKind, i64>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for MemoryBackend {
    async fn increment(&self, kind: EntityKind) -> Result<i64, StoreError> {
        let mut counters = self.counters.lock().map_err(|_| poisoned())?;
        let counter = counters.entry(kind).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }
}

#[async_trait]
impl UserStore for MemoryBackend {
    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        self.users
            .write()
            .map_err(|_| poisoned())?
            .insert(user.id.0, user.clone());
        Ok(())
    }

    async fn fetch(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().map_err(|_| poisoned())?.get(&id.0).cloned())
    }

    async fn fetch_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .map_err(|_| poisoned())?
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn fetch_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .map_err(|_| poisoned())?
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn fetch_by_uid(&self, uid: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .map_err(|_| poisoned())?
            .values()
            .find(|user| user.uid == uid)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self
            .users
            .read()
            .map_err(|_| poisoned())?
            .values()
            .cloned()
            .collect())
    }

    async fn update(&self, user: &User) -> Result<(), StoreError> {
        self.users
            .write()
            .map_err(|_| poisoned())?
            .insert(user.id.0, user.clone());
        Ok(())
    }
}

#[async_trait]
impl DogStore for MemoryBackend {
    async fn insert(&self, dog: &Dog) -> Result<(), StoreError> {
        self.dogs
            .write()
            .map_err(|_| poisoned())?
            .insert(dog.dog_id.0, dog.clone());
        Ok(())
    }

    async fn fetch(&self, id: DogId) -> Result<Option<Dog>, StoreError> {
        Ok(self.dogs.read().map_err(|_| poisoned())?.get(&id.0).cloned())
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Dog>, StoreError> {
        Ok(self
            .dogs
            .read()
            .map_err(|_| poisoned())?
            .values()
            .filter(|dog| dog.owner_id == owner)
            .cloned()
            .collect())
    }

    async fn update(&self, dog: &Dog) -> Result<(), StoreError> {
        self.dogs
            .write()
            .map_err(|_| poisoned())?
            .insert(dog.dog_id.0, dog.clone());
        Ok(())
    }

    async fn delete(&self, id: DogId) -> Result<(), StoreError> {
        self.dogs.write().map_err(|_| poisoned())?.remove(&id.0);
        Ok(())
    }
}

#[async_trait]
impl MedicalRecordStore for MemoryBackend {
    async fn insert(&self, record: &MedicalRecord) -> Result<(), StoreError> {
        self.medical
            .write()
            .map_err(|_| poisoned())?
            .insert(record.medical_id.0, record.clone());
        Ok(())
    }

    async fn fetch(&self, id: RecordId) -> Result<Option<MedicalRecord>, StoreError> {
        Ok(self
            .medical
            .read()
            .map_err(|_| poisoned())?
            .get(&id.0)
            .cloned())
    }

    async fn list_by_dog(&self, dog: DogId) -> Result<Vec<MedicalRecord>, StoreError> {
        Ok(self
            .medical
            .read()
            .map_err(|_| poisoned())?
            .values()
            .filter(|record| record.dog_id == dog)
            .cloned()
            .collect())
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<MedicalRecord>, StoreError> {
        Ok(self
            .medical
            .read()
            .map_err(|_| poisoned())?
            .values()
            .filter(|record| record.owner_id == owner)
            .cloned()
            .collect())
    }

    async fn update(&self, record: &MedicalRecord) -> Result<(), StoreError> {
        self.medical
            .write()
            .map_err(|_| poisoned())?
            .insert(record.medical_id.0, record.clone());
        Ok(())
    }

    async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        self.medical.write().map_err(|_| poisoned())?.remove(&id.0);
        Ok(())
    }
}

#[async_trait]
impl StoreDiagnostics for MemoryBackend {
    async fn probe(&self) -> Result<(), StoreError> {
        // Exercise a lock to surface poisoning.
        drop(self.counters.lock().map_err(|_| poisoned())?);
        Ok(())
    }

    fn describe(&self) -> StoreInfo {
        StoreInfo {
            database: "memory".to_owned(),
            endpoint: None,
        }
    }
}

struct MemoryAccount {
    password: String,
    uid: String,
}

/// In-memory auth provider mirroring the managed provider's observable
/// behaviour, including its own looser password minimum.
#[derive(Default)]
pub struct MemoryAuthProvider {
    accounts: RwLock<BTreeMap<String, MemoryAccount>>,
    tokens: RwLock<BTreeMap<String, String>>,
}

impl MemoryAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn issue_token(&self, uid: &str) -> Result<String, AuthProviderError> {
        let token = Uuid::new_v4().to_string();
        self.tokens
            .write()
            .map_err(|_| AuthProviderError::upstream("token lock poisoned"))?
            .insert(token.clone(), uid.to_owned());
        Ok(token)
    }
}

#[async_trait]
impl AuthProvider for MemoryAuthProvider {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthAccount, AuthProviderError> {
        if !email.contains('@') {
            return Err(AuthProviderError::InvalidEmail);
        }
        if password.len() < 6 {
            return Err(AuthProviderError::WeakPassword);
        }
        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| AuthProviderError::upstream("account lock poisoned"))?;
        if accounts.contains_key(email) {
            return Err(AuthProviderError::EmailExists);
        }
        let uid = format!("mem-{}", Uuid::new_v4().simple());
        accounts.insert(
            email.to_owned(),
            MemoryAccount {
                password: password.to_owned(),
                uid: uid.clone(),
            },
        );
        drop(accounts);
        let token = self.issue_token(&uid)?;
        Ok(AuthAccount { uid, token })
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthAccount, AuthProviderError> {
        let uid = {
            let accounts = self
                .accounts
                .read()
                .map_err(|_| AuthProviderError::upstream("account lock poisoned"))?;
            let account = accounts.get(email).ok_or(AuthProviderError::UserNotFound)?;
            if account.password != password {
                return Err(AuthProviderError::InvalidCredentials);
            }
            account.uid.clone()
        };
        let token = self.issue_token(&uid)?;
        Ok(AuthAccount { uid, token })
    }

    async fn verify_token(&self, token: &str) -> Result<String, AuthProviderError> {
        self.tokens
            .read()
            .map_err(|_| AuthProviderError::upstream("token lock poisoned"))?
            .get(token)
            .cloned()
            .ok_or(AuthProviderError::InvalidToken)
    }
}

/// Image store returning deterministic fake delivery URLs.
#[derive(Default)]
pub struct MemoryImageStore;

impl MemoryImageStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn upload(
        &self,
        folder: &str,
        public_id: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<StoredImage, ImageStoreError> {
        Ok(StoredImage {
            url: format!("https://images.invalid/{folder}/{public_id}"),
        })
    }

    async fn delete(&self, _url: &str) -> Result<(), ImageStoreError> {
        Ok(())
    }
}
