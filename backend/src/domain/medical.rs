//! Medical history records and due-date classification.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::dog::DogId;
use crate::domain::ownership::Owned;
use crate::domain::user::UserId;

/// How far ahead the upcoming window reaches, in days.
pub const UPCOMING_WINDOW_DAYS: i64 = 30;

/// Sequential numeric identifier allocated for each medical record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a medical record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Completed,
    Upcoming,
    Overdue,
}

/// A single entry in a dog's medical history.
///
/// `kind` holds the record type (vaccination, deworming, vet visit and so
/// on) as free text; the stored data does not constrain it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub medical_id: RecordId,
    pub dog_id: DogId,
    pub owner_id: UserId,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_due_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub veterinarian: String,
    #[serde(default)]
    pub clinic: String,
    pub status: RecordStatus,
    #[serde(default)]
    pub documents: Vec<String>,
    pub reminder_enabled: bool,
    pub reminder_days: u32,
    pub reminder_sent: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Owned for MedicalRecord {
    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

/// Partial update for a medical record. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecordPatch {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub next_due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub veterinarian: Option<String>,
    pub clinic: Option<String>,
    pub status: Option<RecordStatus>,
    pub documents: Option<Vec<String>>,
    pub reminder_enabled: Option<bool>,
    pub reminder_days: Option<u32>,
    pub reminder_sent: Option<bool>,
}

impl MedicalRecordPatch {
    pub fn apply(self, record: &mut MedicalRecord) {
        if let Some(kind) = self.kind {
            record.kind = kind;
        }
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(date) = self.date {
            record.date = date;
        }
        if let Some(next_due_date) = self.next_due_date {
            record.next_due_date = Some(next_due_date);
        }
        if let Some(notes) = self.notes {
            record.notes = notes;
        }
        if let Some(veterinarian) = self.veterinarian {
            record.veterinarian = veterinarian;
        }
        if let Some(clinic) = self.clinic {
            record.clinic = clinic;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(documents) = self.documents {
            record.documents = documents;
        }
        if let Some(reminder_enabled) = self.reminder_enabled {
            record.reminder_enabled = reminder_enabled;
        }
        if let Some(reminder_days) = self.reminder_days {
            record.reminder_days = reminder_days;
        }
        if let Some(reminder_sent) = self.reminder_sent {
            record.reminder_sent = reminder_sent;
        }
    }
}

/// Records whose next due date falls inside the upcoming window.
///
/// Selects records due between `today` and `today + 30 days` inclusive,
/// regardless of status. Records without a due date never match.
pub fn upcoming(records: &[MedicalRecord], today: NaiveDate) -> Vec<MedicalRecord> {
    let horizon = today + Duration::days(UPCOMING_WINDOW_DAYS);
    records
        .iter()
        .filter(|record| {
            record
                .next_due_date
                .is_some_and(|due| due >= today && due <= horizon)
        })
        .cloned()
        .collect()
}

/// Records whose next due date has passed without completion.
///
/// Selects records with a due date strictly before `today` whose status is
/// not `completed`. Independent of [`upcoming`]; the two sets never overlap
/// because the windows are disjoint.
pub fn overdue(records: &[MedicalRecord], today: NaiveDate) -> Vec<MedicalRecord> {
    records
        .iter()
        .filter(|record| {
            record.status != RecordStatus::Completed
                && record.next_due_date.is_some_and(|due| due < today)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record(due_offset_days: Option<i64>, status: RecordStatus) -> MedicalRecord {
        let today = today();
        MedicalRecord {
            medical_id: RecordId(1),
            dog_id: DogId(1),
            owner_id: UserId(1),
            kind: "vaccination".into(),
            name: "Rabies booster".into(),
            date: today - Duration::days(365),
            next_due_date: due_offset_days.map(|days| today + Duration::days(days)),
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

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 1).expect("valid date")
    }

    #[rstest]
    #[case(Some(0), true)]
    #[case(Some(10), true)]
    #[case(Some(30), true)]
    #[case(Some(31), false)]
    #[case(Some(-1), false)]
    #[case(None, false)]
    fn upcoming_window_is_inclusive(#[case] offset: Option<i64>, #[case] expected: bool) {
        let records = vec![record(offset, RecordStatus::Upcoming)];
        assert_eq!(!upcoming(&records, today()).is_empty(), expected);
    }

    #[test]
    fn upcoming_ignores_status() {
        let records = vec![record(Some(10), RecordStatus::Completed)];
        assert_eq!(upcoming(&records, today()).len(), 1);
    }

    #[rstest]
    #[case(Some(-5), RecordStatus::Upcoming, true)]
    #[case(Some(-5), RecordStatus::Overdue, true)]
    #[case(Some(-5), RecordStatus::Completed, false)]
    #[case(Some(0), RecordStatus::Upcoming, false)]
    #[case(None, RecordStatus::Upcoming, false)]
    fn overdue_requires_past_due_and_incomplete(
        #[case] offset: Option<i64>,
        #[case] status: RecordStatus,
        #[case] expected: bool,
    ) {
        let records = vec![record(offset, status)];
        assert_eq!(!overdue(&records, today()).is_empty(), expected);
    }

    #[test]
    fn upcoming_and_overdue_never_overlap() {
        let records = vec![
            record(Some(-3), RecordStatus::Upcoming),
            record(Some(5), RecordStatus::Upcoming),
            record(Some(40), RecordStatus::Upcoming),
        ];
        let up = upcoming(&records, today());
        let over = overdue(&records, today());
        assert_eq!(up.len(), 1);
        assert_eq!(over.len(), 1);
        assert_ne!(up[0].next_due_date, over[0].next_due_date);
    }

    #[test]
    fn kind_serialises_under_the_type_key() {
        let value = serde_json::to_value(record(None, RecordStatus::Completed))
            .expect("serialisable");
        assert_eq!(value.get("type").and_then(|v| v.as_str()), Some("vaccination"));
        assert!(value.get("kind").is_none());
    }
}
