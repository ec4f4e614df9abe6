//! User persistence port.

use async_trait::async_trait;

use crate::domain::ports::store::StoreError;
use crate::domain::user::{User, UserId};

/// Persistence operations for user profiles.
///
/// Updates replace the whole record; services fetch, mutate and write back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: &User) -> Result<(), StoreError>;

    async fn fetch(&self, id: UserId) -> Result<Option<User>, StoreError>;

    async fn fetch_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn fetch_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn fetch_by_uid(&self, uid: &str) -> Result<Option<User>, StoreError>;

    async fn list(&self) -> Result<Vec<User>, StoreError>;

    async fn update(&self, user: &User) -> Result<(), StoreError>;
}
