//! Dog persistence port.

use async_trait::async_trait;

use crate::domain::dog::{Dog, DogId};
use crate::domain::ports::store::StoreError;
use crate::domain::user::UserId;

/// Persistence operations for dog profiles, schedules included.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DogStore: Send + Sync {
    async fn insert(&self, dog: &Dog) -> Result<(), StoreError>;

    async fn fetch(&self, id: DogId) -> Result<Option<Dog>, StoreError>;

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Dog>, StoreError>;

    async fn update(&self, dog: &Dog) -> Result<(), StoreError>;

    async fn delete(&self, id: DogId) -> Result<(), StoreError>;
}
