//! Medical record persistence port.

use async_trait::async_trait;

use crate::domain::dog::DogId;
use crate::domain::medical::{MedicalRecord, RecordId};
use crate::domain::ports::store::StoreError;
use crate::domain::user::UserId;

/// Persistence operations for medical history records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MedicalRecordStore: Send + Sync {
    async fn insert(&self, record: &MedicalRecord) -> Result<(), StoreError>;

    async fn fetch(&self, id: RecordId) -> Result<Option<MedicalRecord>, StoreError>;

    async fn list_by_dog(&self, dog: DogId) -> Result<Vec<MedicalRecord>, StoreError>;

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<MedicalRecord>, StoreError>;

    async fn update(&self, record: &MedicalRecord) -> Result<(), StoreError>;

    async fn delete(&self, id: RecordId) -> Result<(), StoreError>;
}
