//! Dog registration, profile management and schedule editing.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::dog::{Dog, DogId, DogPatch};
use crate::domain::error::Error;
use crate::domain::ids::{EntityKind, IdAllocator};
use crate::domain::ownership::authorize;
use crate::domain::ports::dog_store::DogStore;
use crate::domain::schedule::{Schedule, ScheduleCategory, ScheduleEntryPatch};
use crate::domain::user::UserId;

/// Fields accepted when registering a dog. Only `name` is required.
#[derive(Debug, Clone, Default)]
pub struct NewDog {
    pub name: String,
    pub breed: Option<String>,
    pub age: Option<u32>,
    pub birth_date: Option<String>,
    pub photo: Option<String>,
    pub weight: Option<f64>,
    pub gender: Option<String>,
}

/// All dog operations run on behalf of an authenticated owner; every lookup
/// passes through the ownership guard before anything is returned or
/// modified.
#[derive(Clone)]
pub struct DogService {
    dogs: Arc<dyn DogStore>,
    ids: IdAllocator,
}

impl DogService {
    pub fn new(dogs: Arc<dyn DogStore>, ids: IdAllocator) -> Self {
        Self { dogs, ids }
    }

    pub async fn add(&self, owner: UserId, new_dog: NewDog) -> Result<Dog, Error> {
        if new_dog.name.trim().is_empty() {
            return Err(Error::invalid_request("Dog name is required"));
        }
        let id = DogId(self.ids.next_id(EntityKind::Dogs).await?);
        let dog = Dog {
            dog_id: id,
            name: new_dog.name,
            breed: new_dog.breed.unwrap_or_default(),
            age: new_dog.age.unwrap_or_default(),
            birth_date: new_dog.birth_date.unwrap_or_default(),
            photo: new_dog.photo.unwrap_or_default(),
            weight: new_dog.weight.unwrap_or_default(),
            gender: new_dog.gender.unwrap_or_default(),
            schedule: Schedule::seeded(),
            owner_id: owner,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.dogs.insert(&dog).await?;
        info!(dog_id = %id, owner_id = %owner, "dog registered");
        Ok(dog)
    }

    pub async fn list(&self, owner: UserId) -> Result<Vec<Dog>, Error> {
        Ok(self.dogs.list_by_owner(owner).await?)
    }

    pub async fn get(&self, owner: UserId, id: DogId) -> Result<Dog, Error> {
        self.fetch_owned(owner, id).await
    }

    pub async fn update(&self, owner: UserId, id: DogId, patch: DogPatch) -> Result<Dog, Error> {
        let mut dog = self.fetch_owned(owner, id).await?;
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(Error::invalid_request("Dog name is required"));
            }
        }
        patch.apply(&mut dog);
        dog.updated_at = Some(Utc::now());
        self.dogs.update(&dog).await?;
        Ok(dog)
    }

    /// Delete a dog. Medical records are keyed independently and are left
    /// in place.
    pub async fn delete(&self, owner: UserId, id: DogId) -> Result<(), Error> {
        self.fetch_owned(owner, id).await?;
        self.dogs.delete(id).await?;
        info!(dog_id = %id, owner_id = %owner, "dog deleted");
        Ok(())
    }

    pub async fn add_schedule_entry(
        &self,
        owner: UserId,
        id: DogId,
        category: ScheduleCategory,
        time: String,
        description: String,
    ) -> Result<Dog, Error> {
        if time.trim().is_empty() {
            return Err(Error::invalid_request("Schedule time is required"));
        }
        let mut dog = self.fetch_owned(owner, id).await?;
        let now = Utc::now();
        dog.schedule.add_entry(category, time, description, now);
        dog.updated_at = Some(now);
        self.dogs.update(&dog).await?;
        Ok(dog)
    }

    pub async fn update_schedule_entry(
        &self,
        owner: UserId,
        id: DogId,
        category: ScheduleCategory,
        entry_id: &str,
        patch: ScheduleEntryPatch,
    ) -> Result<Dog, Error> {
        let mut dog = self.fetch_owned(owner, id).await?;
        let now = Utc::now();
        dog.schedule
            .update_entry(category, entry_id, patch, now)
            .map_err(|err| Error::not_found(err.to_string()))?;
        dog.updated_at = Some(now);
        self.dogs.update(&dog).await?;
        Ok(dog)
    }

    pub async fn delete_schedule_entry(
        &self,
        owner: UserId,
        id: DogId,
        category: ScheduleCategory,
        entry_id: &str,
    ) -> Result<Dog, Error> {
        let mut dog = self.fetch_owned(owner, id).await?;
        dog.schedule
            .delete_entry(category, entry_id)
            .map_err(|err| Error::not_found(err.to_string()))?;
        dog.updated_at = Some(Utc::now());
        self.dogs.update(&dog).await?;
        Ok(dog)
    }

    async fn fetch_owned(&self, owner: UserId, id: DogId) -> Result<Dog, Error> {
        authorize(self.dogs.fetch(id).await?, owner, "Dog")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::counter_store::MockCounterStore;
    use crate::domain::ports::dog_store::MockDogStore;

    fn allocator_returning(id: i64) -> IdAllocator {
        let mut counters = MockCounterStore::new();
        counters.expect_increment().returning(move |_| Ok(id));
        IdAllocator::new(Arc::new(counters))
    }

    fn stored_dog(owner: UserId) -> Dog {
        Dog {
            dog_id: DogId(5),
            name: "Rex".into(),
            breed: String::new(),
            age: 2,
            birth_date: String::new(),
            photo: String::new(),
            weight: 12.0,
            gender: String::new(),
            schedule: Schedule::seeded(),
            owner_id: owner,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn service(dogs: MockDogStore) -> DogService {
        DogService::new(Arc::new(dogs), allocator_returning(5))
    }

    #[tokio::test]
    async fn add_requires_name() {
        let service = service(MockDogStore::new());
        let err = service
            .add(UserId(1), NewDog { name: "  ".into(), ..NewDog::default() })
            .await
            .unwrap_err();
        assert_eq!(err.message, "Dog name is required");
    }

    #[tokio::test]
    async fn add_seeds_defaults_and_schedule() {
        let mut dogs = MockDogStore::new();
        dogs.expect_insert()
            .withf(|dog| {
                dog.dog_id == DogId(5)
                    && dog.breed.is_empty()
                    && dog.age == 0
                    && dog.schedule == Schedule::seeded()
            })
            .returning(|_| Ok(()));
        let service = service(dogs);
        let dog = service
            .add(UserId(1), NewDog { name: "Rex".into(), ..NewDog::default() })
            .await
            .expect("dog added");
        assert_eq!(dog.owner_id, UserId(1));
    }

    #[tokio::test]
    async fn get_rejects_foreign_dog() {
        let mut dogs = MockDogStore::new();
        dogs.expect_fetch()
            .returning(|_| Ok(Some(stored_dog(UserId(2)))));
        let service = service(dogs);
        let err = service.get(UserId(1), DogId(5)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn get_reports_missing_dog() {
        let mut dogs = MockDogStore::new();
        dogs.expect_fetch().returning(|_| Ok(None));
        let service = service(dogs);
        let err = service.get(UserId(1), DogId(5)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Dog not found");
    }

    #[tokio::test]
    async fn update_rejects_blank_name() {
        let mut dogs = MockDogStore::new();
        dogs.expect_fetch()
            .returning(|_| Ok(Some(stored_dog(UserId(1)))));
        let service = service(dogs);
        let err = service
            .update(
                UserId(1),
                DogId(5),
                DogPatch { name: Some(String::new()), ..DogPatch::default() },
            )
            .await
            .unwrap_err();
        assert_eq!(err.message, "Dog name is required");
    }

    #[tokio::test]
    async fn delete_requires_ownership() {
        let mut dogs = MockDogStore::new();
        dogs.expect_fetch()
            .returning(|_| Ok(Some(stored_dog(UserId(2)))));
        dogs.expect_delete().never();
        let service = service(dogs);
        let err = service.delete(UserId(1), DogId(5)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn delete_removes_owned_dog() {
        let mut dogs = MockDogStore::new();
        dogs.expect_fetch()
            .returning(|_| Ok(Some(stored_dog(UserId(1)))));
        dogs.expect_delete()
            .withf(|id| *id == DogId(5))
            .times(1)
            .returning(|_| Ok(()));
        let service = service(dogs);
        service.delete(UserId(1), DogId(5)).await.expect("deleted");
    }

    #[tokio::test]
    async fn schedule_add_persists_updated_dog() {
        let mut dogs = MockDogStore::new();
        dogs.expect_fetch()
            .returning(|_| Ok(Some(stored_dog(UserId(1)))));
        dogs.expect_update()
            .withf(|dog| {
                dog.schedule.entries(ScheduleCategory::Walk).len() == 1
                    && dog.updated_at.is_some()
            })
            .returning(|_| Ok(()));
        let service = service(dogs);
        let dog = service
            .add_schedule_entry(
                UserId(1),
                DogId(5),
                ScheduleCategory::Walk,
                "07:30".into(),
                "Morning walk".into(),
            )
            .await
            .expect("entry added");
        assert_eq!(dog.schedule.entries(ScheduleCategory::Walk).len(), 1);
    }

    #[tokio::test]
    async fn schedule_delete_missing_entry_is_not_found() {
        let mut dogs = MockDogStore::new();
        dogs.expect_fetch()
            .returning(|_| Ok(Some(stored_dog(UserId(1)))));
        let service = service(dogs);
        let err = service
            .delete_schedule_entry(UserId(1), DogId(5), ScheduleCategory::Eat, "missing")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Schedule item not found");
    }
}
