//! Dog profiles owned by registered users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ownership::Owned;
use crate::domain::schedule::Schedule;
use crate::domain::user::UserId;

/// Sequential numeric identifier allocated for each dog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct DogId(pub i64);

impl std::fmt::Display for DogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A dog registered by an owner, including its care schedule.
///
/// Only `name` is required at registration; the remaining profile fields
/// default to empty or zero so owners can fill them in later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dog {
    pub dog_id: DogId,
    pub name: String,
    #[serde(default)]
    pub breed: String,
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub schedule: Schedule,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Owned for Dog {
    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

/// Partial update for a dog profile. `None` fields are left untouched.
/// The schedule is edited through its own operations, never patched here.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DogPatch {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub age: Option<u32>,
    pub birth_date: Option<String>,
    pub photo: Option<String>,
    pub weight: Option<f64>,
    pub gender: Option<String>,
}

impl DogPatch {
    pub fn apply(self, dog: &mut Dog) {
        if let Some(name) = self.name {
            dog.name = name;
        }
        if let Some(breed) = self.breed {
            dog.breed = breed;
        }
        if let Some(age) = self.age {
            dog.age = age;
        }
        if let Some(birth_date) = self.birth_date {
            dog.birth_date = birth_date;
        }
        if let Some(photo) = self.photo {
            dog.photo = photo;
        }
        if let Some(weight) = self.weight {
            dog.weight = weight;
        }
        if let Some(gender) = self.gender {
            dog.gender = gender;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dog() -> Dog {
        Dog {
            dog_id: DogId(1),
            name: "Rex".into(),
            breed: String::new(),
            age: 0,
            birth_date: String::new(),
            photo: String::new(),
            weight: 0.0,
            gender: String::new(),
            schedule: Schedule::seeded(),
            owner_id: UserId(7),
            created_at: "2026-08-01T08:00:00Z".parse().expect("valid timestamp"),
            updated_at: None,
        }
    }

    #[test]
    fn patch_applies_only_supplied_fields() {
        let mut dog = sample_dog();
        DogPatch {
            breed: Some("Border Collie".into()),
            weight: Some(17.5),
            ..DogPatch::default()
        }
        .apply(&mut dog);
        assert_eq!(dog.breed, "Border Collie");
        assert_eq!(dog.weight, 17.5);
        assert_eq!(dog.name, "Rex");
        assert_eq!(dog.age, 0);
    }

    #[test]
    fn serialises_with_camel_case_keys() {
        let value = serde_json::to_value(sample_dog()).expect("serialisable");
        assert!(value.get("dogId").is_some());
        assert!(value.get("ownerId").is_some());
        assert!(value.get("birthDate").is_some());
    }
}
