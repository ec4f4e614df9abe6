//! Medical history management and due-date queries.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::domain::dog::DogId;
use crate::domain::error::Error;
use crate::domain::ids::{EntityKind, IdAllocator};
use crate::domain::medical::{
    self, MedicalRecord, MedicalRecordPatch, RecordId, RecordStatus,
};
use crate::domain::ownership::authorize;
use crate::domain::ports::dog_store::DogStore;
use crate::domain::ports::medical_store::MedicalRecordStore;
use crate::domain::user::UserId;

/// Fields accepted when logging a medical record.
#[derive(Debug, Clone)]
pub struct NewMedicalRecord {
    pub dog_id: DogId,
    pub kind: String,
    pub name: String,
    pub date: NaiveDate,
    pub next_due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub veterinarian: Option<String>,
    pub clinic: Option<String>,
    pub status: Option<RecordStatus>,
    pub documents: Option<Vec<String>>,
    pub reminder_enabled: Option<bool>,
    pub reminder_days: Option<u32>,
}

/// Medical record CRUD plus the upcoming and overdue reminder queries.
///
/// Creating or listing records for a dog first authorises the dog itself,
/// so records can never be attached to another owner's dog.
#[derive(Clone)]
pub struct MedicalService {
    medical: Arc<dyn MedicalRecordStore>,
    dogs: Arc<dyn DogStore>,
    ids: IdAllocator,
}

impl MedicalService {
    pub fn new(
        medical: Arc<dyn MedicalRecordStore>,
        dogs: Arc<dyn DogStore>,
        ids: IdAllocator,
    ) -> Self {
        Self { medical, dogs, ids }
    }

    pub async fn add(&self, owner: UserId, new: NewMedicalRecord) -> Result<MedicalRecord, Error> {
        if new.kind.trim().is_empty() || new.name.trim().is_empty() {
            return Err(Error::invalid_request(
                "dogId, type, name, and date are required",
            ));
        }
        authorize(self.dogs.fetch(new.dog_id).await?, owner, "Dog")?;
        let id = RecordId(self.ids.next_id(EntityKind::MedicalRecords).await?);
        let record = MedicalRecord {
            medical_id: id,
            dog_id: new.dog_id,
            owner_id: owner,
            kind: new.kind,
            name: new.name,
            date: new.date,
            next_due_date: new.next_due_date,
            notes: new.notes.unwrap_or_default(),
            veterinarian: new.veterinarian.unwrap_or_default(),
            clinic: new.clinic.unwrap_or_default(),
            status: new.status.unwrap_or(RecordStatus::Completed),
            documents: new.documents.unwrap_or_default(),
            reminder_enabled: new.reminder_enabled.unwrap_or(true),
            reminder_days: new.reminder_days.unwrap_or(7),
            reminder_sent: false,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.medical.insert(&record).await?;
        info!(medical_id = %id, dog_id = %record.dog_id, "medical record created");
        Ok(record)
    }

    pub async fn get(&self, owner: UserId, id: RecordId) -> Result<MedicalRecord, Error> {
        self.fetch_owned(owner, id).await
    }

    pub async fn list_for_owner(&self, owner: UserId) -> Result<Vec<MedicalRecord>, Error> {
        Ok(self.medical.list_by_owner(owner).await?)
    }

    pub async fn list_for_dog(
        &self,
        owner: UserId,
        dog_id: DogId,
    ) -> Result<Vec<MedicalRecord>, Error> {
        authorize(self.dogs.fetch(dog_id).await?, owner, "Dog")?;
        Ok(self.medical.list_by_dog(dog_id).await?)
    }

    pub async fn update(
        &self,
        owner: UserId,
        id: RecordId,
        patch: MedicalRecordPatch,
    ) -> Result<MedicalRecord, Error> {
        let mut record = self.fetch_owned(owner, id).await?;
        patch.apply(&mut record);
        record.updated_at = Some(Utc::now());
        self.medical.update(&record).await?;
        Ok(record)
    }

    pub async fn delete(&self, owner: UserId, id: RecordId) -> Result<(), Error> {
        self.fetch_owned(owner, id).await?;
        self.medical.delete(id).await?;
        info!(medical_id = %id, "medical record deleted");
        Ok(())
    }

    /// Records across all the owner's dogs due within the next 30 days.
    pub async fn upcoming(&self, owner: UserId) -> Result<Vec<MedicalRecord>, Error> {
        let records = self.medical.list_by_owner(owner).await?;
        Ok(medical::upcoming(&records, Utc::now().date_naive()))
    }

    /// Records across all the owner's dogs past due and not completed.
    pub async fn overdue(&self, owner: UserId) -> Result<Vec<MedicalRecord>, Error> {
        let records = self.medical.list_by_owner(owner).await?;
        Ok(medical::overdue(&records, Utc::now().date_naive()))
    }

    async fn fetch_owned(&self, owner: UserId, id: RecordId) -> Result<MedicalRecord, Error> {
        authorize(self.medical.fetch(id).await?, owner, "Medical record")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dog::Dog;
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::counter_store::MockCounterStore;
    use crate::domain::ports::dog_store::MockDogStore;
    use crate::domain::ports::medical_store::MockMedicalRecordStore;
    use crate::domain::schedule::Schedule;
    use chrono::Duration;

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

    fn stored_record(owner: UserId, due_offset: Option<i64>, status: RecordStatus) -> MedicalRecord {
        let today = Utc::now().date_naive();
        MedicalRecord {
            medical_id: RecordId(11),
            dog_id: DogId(5),
            owner_id: owner,
            kind: "vaccination".into(),
            name: "Rabies".into(),
            date: today,
            next_due_date: due_offset.map(|days| today + Duration::days(days)),
            notes: String::new(),
            veterinarian: String::new(),
            clinic: String::new(),
            status,
            documents: Vec::new(),
            reminder_enabled: true,
            reminder_days: 7,
            reminder_sent: false,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn new_record() -> NewMedicalRecord {
        NewMedicalRecord {
            dog_id: DogId(5),
            kind: "vaccination".into(),
            name: "Rabies".into(),
            date: Utc::now().date_naive(),
            next_due_date: None,
            notes: None,
            veterinarian: None,
            clinic: None,
            status: None,
            documents: None,
            reminder_enabled: None,
            reminder_days: None,
        }
    }

    #[tokio::test]
    async fn add_applies_reminder_defaults() {
        let mut dogs = MockDogStore::new();
        dogs.expect_fetch()
            .returning(|_| Ok(Some(stored_dog(UserId(1)))));
        let mut medical = MockMedicalRecordStore::new();
        medical
            .expect_insert()
            .withf(|record| {
                record.status == RecordStatus::Completed
                    && record.reminder_enabled
                    && record.reminder_days == 7
                    && !record.reminder_sent
            })
            .returning(|_| Ok(()));
        let service =
            MedicalService::new(Arc::new(medical), Arc::new(dogs), allocator_returning(11));
        let record = service.add(UserId(1), new_record()).await.expect("added");
        assert_eq!(record.medical_id, RecordId(11));
    }

    #[tokio::test]
    async fn add_rejects_foreign_dog() {
        let mut dogs = MockDogStore::new();
        dogs.expect_fetch()
            .returning(|_| Ok(Some(stored_dog(UserId(2)))));
        let service = MedicalService::new(
            Arc::new(MockMedicalRecordStore::new()),
            Arc::new(dogs),
            allocator_returning(11),
        );
        let err = service.add(UserId(1), new_record()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn add_requires_type_and_name() {
        let service = MedicalService::new(
            Arc::new(MockMedicalRecordStore::new()),
            Arc::new(MockDogStore::new()),
            allocator_returning(11),
        );
        let mut new = new_record();
        new.name = String::new();
        let err = service.add(UserId(1), new).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn get_reports_missing_record() {
        let mut medical = MockMedicalRecordStore::new();
        medical.expect_fetch().returning(|_| Ok(None));
        let service = MedicalService::new(
            Arc::new(medical),
            Arc::new(MockDogStore::new()),
            allocator_returning(11),
        );
        let err = service.get(UserId(1), RecordId(11)).await.unwrap_err();
        assert_eq!(err.message, "Medical record not found");
    }

    #[tokio::test]
    async fn upcoming_filters_by_window() {
        let mut medical = MockMedicalRecordStore::new();
        medical.expect_list_by_owner().returning(|owner| {
            Ok(vec![
                stored_record(owner, Some(10), RecordStatus::Upcoming),
                stored_record(owner, Some(45), RecordStatus::Upcoming),
                stored_record(owner, None, RecordStatus::Completed),
            ])
        });
        let service = MedicalService::new(
            Arc::new(medical),
            Arc::new(MockDogStore::new()),
            allocator_returning(11),
        );
        let records = service.upcoming(UserId(1)).await.expect("listed");
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn overdue_excludes_completed() {
        let mut medical = MockMedicalRecordStore::new();
        medical.expect_list_by_owner().returning(|owner| {
            Ok(vec![
                stored_record(owner, Some(-5), RecordStatus::Upcoming),
                stored_record(owner, Some(-5), RecordStatus::Completed),
            ])
        });
        let service = MedicalService::new(
            Arc::new(medical),
            Arc::new(MockDogStore::new()),
            allocator_returning(11),
        );
        let records = service.overdue(UserId(1)).await.expect("listed");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, RecordStatus::Upcoming);
    }

    #[tokio::test]
    async fn update_stamps_updated_at() {
        let mut medical = MockMedicalRecordStore::new();
        medical
            .expect_fetch()
            .returning(|_| Ok(Some(stored_record(UserId(1), None, RecordStatus::Completed))));
        medical
            .expect_update()
            .withf(|record| record.updated_at.is_some() && record.notes == "follow up booked")
            .returning(|_| Ok(()));
        let service = MedicalService::new(
            Arc::new(medical),
            Arc::new(MockDogStore::new()),
            allocator_returning(11),
        );
        let record = service
            .update(
                UserId(1),
                RecordId(11),
                MedicalRecordPatch {
                    notes: Some("follow up booked".into()),
                    ..MedicalRecordPatch::default()
                },
            )
            .await
            .expect("updated");
        assert_eq!(record.notes, "follow up booked");
    }
}
