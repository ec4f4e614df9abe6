//! Per-dog daily care schedule.
//!
//! A schedule groups timed entries under a small set of categories. New
//! dogs start with empty `eat`, `walk` and `sleep` lists so clients can
//! render the default tabs without special-casing missing keys.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Care activity grouping for schedule entries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleCategory {
    Eat,
    Walk,
    Sleep,
    Medicine,
    Groom,
}

impl ScheduleCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eat => "eat",
            Self::Walk => "walk",
            Self::Sleep => "sleep",
            Self::Medicine => "medicine",
            Self::Groom => "groom",
        }
    }
}

impl std::fmt::Display for ScheduleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ScheduleCategory {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eat" => Ok(Self::Eat),
            "walk" => Ok(Self::Walk),
            "sleep" => Ok(Self::Sleep),
            "medicine" => Ok(Self::Medicine),
            "groom" => Ok(Self::Groom),
            other => Err(ScheduleError::UnknownCategory {
                category: other.to_owned(),
            }),
        }
    }
}

/// Failures raised by schedule edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("Schedule item not found")]
    EntryNotFound,
    #[error("Invalid schedule category: {category}")]
    UnknownCategory { category: String },
}

/// Single timed schedule item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: String,
    pub time: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Field updates applied to an existing entry. `None` leaves the field as is.
#[derive(Debug, Clone, Default)]
pub struct ScheduleEntryPatch {
    pub time: Option<String>,
    pub description: Option<String>,
}

/// Category-keyed collection of schedule entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Schedule(pub BTreeMap<ScheduleCategory, Vec<ScheduleEntry>>);

impl Schedule {
    /// Schedule for a freshly registered dog: empty eat, walk and sleep lists.
    pub fn seeded() -> Self {
        let mut map = BTreeMap::new();
        map.insert(ScheduleCategory::Eat, Vec::new());
        map.insert(ScheduleCategory::Walk, Vec::new());
        map.insert(ScheduleCategory::Sleep, Vec::new());
        Self(map)
    }

    pub fn entries(&self, category: ScheduleCategory) -> &[ScheduleEntry] {
        self.0.get(&category).map_or(&[], Vec::as_slice)
    }

    /// Append a new entry to `category`, creating the list if absent.
    /// Returns the generated entry identifier.
    pub fn add_entry(
        &mut self,
        category: ScheduleCategory,
        time: String,
        description: String,
        now: DateTime<Utc>,
    ) -> String {
        let id = Uuid::new_v4().to_string();
        self.0.entry(category).or_default().push(ScheduleEntry {
            id: id.clone(),
            time,
            description,
            created_at: now,
            updated_at: None,
        });
        id
    }

    /// Apply `patch` to the entry with `entry_id` under `category`.
    pub fn update_entry(
        &mut self,
        category: ScheduleCategory,
        entry_id: &str,
        patch: ScheduleEntryPatch,
        now: DateTime<Utc>,
    ) -> Result<&ScheduleEntry, ScheduleError> {
        let entry = self
            .0
            .get_mut(&category)
            .and_then(|entries| entries.iter_mut().find(|entry| entry.id == entry_id))
            .ok_or(ScheduleError::EntryNotFound)?;
        if let Some(time) = patch.time {
            entry.time = time;
        }
        if let Some(description) = patch.description {
            entry.description = description;
        }
        entry.updated_at = Some(now);
        Ok(entry)
    }

    /// Remove the entry with `entry_id` under `category`.
    pub fn delete_entry(
        &mut self,
        category: ScheduleCategory,
        entry_id: &str,
    ) -> Result<(), ScheduleError> {
        let entries = self
            .0
            .get_mut(&category)
            .ok_or(ScheduleError::EntryNotFound)?;
        let before = entries.len();
        entries.retain(|entry| entry.id != entry_id);
        if entries.len() == before {
            return Err(ScheduleError::EntryNotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        "2026-08-01T08:00:00Z".parse().expect("valid timestamp")
    }

    #[test]
    fn seeded_schedule_has_default_categories() {
        let schedule = Schedule::seeded();
        assert!(schedule.entries(ScheduleCategory::Eat).is_empty());
        assert!(schedule.entries(ScheduleCategory::Walk).is_empty());
        assert!(schedule.entries(ScheduleCategory::Sleep).is_empty());
        assert_eq!(schedule.0.len(), 3);
    }

    #[test]
    fn add_entry_targets_only_requested_category() {
        let mut schedule = Schedule::seeded();
        let id = schedule.add_entry(
            ScheduleCategory::Walk,
            "07:30".into(),
            "Morning walk".into(),
            now(),
        );
        assert_eq!(schedule.entries(ScheduleCategory::Walk).len(), 1);
        assert!(schedule.entries(ScheduleCategory::Eat).is_empty());
        assert_eq!(schedule.entries(ScheduleCategory::Walk)[0].id, id);
    }

    #[test]
    fn add_entry_creates_missing_category() {
        let mut schedule = Schedule::seeded();
        schedule.add_entry(
            ScheduleCategory::Medicine,
            "21:00".into(),
            "Heartworm tablet".into(),
            now(),
        );
        assert_eq!(schedule.entries(ScheduleCategory::Medicine).len(), 1);
    }

    #[test]
    fn update_entry_applies_partial_patch() {
        let mut schedule = Schedule::seeded();
        let id = schedule.add_entry(ScheduleCategory::Eat, "08:00".into(), "Kibble".into(), now());
        let later = now() + chrono::Duration::hours(1);
        let entry = schedule
            .update_entry(
                ScheduleCategory::Eat,
                &id,
                ScheduleEntryPatch {
                    time: Some("08:30".into()),
                    description: None,
                },
                later,
            )
            .expect("entry exists");
        assert_eq!(entry.time, "08:30");
        assert_eq!(entry.description, "Kibble");
        assert_eq!(entry.updated_at, Some(later));
    }

    #[test]
    fn update_missing_entry_is_not_found() {
        let mut schedule = Schedule::seeded();
        let result = schedule.update_entry(
            ScheduleCategory::Eat,
            "nope",
            ScheduleEntryPatch::default(),
            now(),
        );
        assert_eq!(result.unwrap_err(), ScheduleError::EntryNotFound);
    }

    #[test]
    fn delete_entry_removes_only_that_entry() {
        let mut schedule = Schedule::seeded();
        let keep = schedule.add_entry(ScheduleCategory::Walk, "07:00".into(), String::new(), now());
        let gone = schedule.add_entry(ScheduleCategory::Walk, "19:00".into(), String::new(), now());
        schedule
            .delete_entry(ScheduleCategory::Walk, &gone)
            .expect("entry exists");
        let remaining = schedule.entries(ScheduleCategory::Walk);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, keep);
    }

    #[test]
    fn delete_missing_entry_leaves_list_untouched() {
        let mut schedule = Schedule::seeded();
        schedule.add_entry(ScheduleCategory::Sleep, "22:00".into(), String::new(), now());
        let result = schedule.delete_entry(ScheduleCategory::Sleep, "missing");
        assert_eq!(result.unwrap_err(), ScheduleError::EntryNotFound);
        assert_eq!(schedule.entries(ScheduleCategory::Sleep).len(), 1);
    }

    #[rstest]
    #[case("eat", ScheduleCategory::Eat)]
    #[case("walk", ScheduleCategory::Walk)]
    #[case("sleep", ScheduleCategory::Sleep)]
    #[case("medicine", ScheduleCategory::Medicine)]
    #[case("groom", ScheduleCategory::Groom)]
    fn category_round_trips_through_str(#[case] text: &str, #[case] category: ScheduleCategory) {
        assert_eq!(text.parse::<ScheduleCategory>().ok(), Some(category));
        assert_eq!(category.as_str(), text);
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!(matches!(
            "play".parse::<ScheduleCategory>(),
            Err(ScheduleError::UnknownCategory { .. })
        ));
    }
}
