//! Sequential identifier allocation.
//!
//! The datastore keeps one counter per entity kind. Allocation must be
//! atomic: two concurrent signups must never observe the same counter
//! value, so the increment happens inside the store rather than as a
//! read-modify-write at this layer.

use std::sync::Arc;

use crate::domain::ports::counter_store::CounterStore;
use crate::domain::ports::store::StoreError;

/// Entity families with an allocated counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    Users,
    Dogs,
    MedicalRecords,
}

impl EntityKind {
    /// Counter key under the datastore's `counters` node.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Dogs => "dogs",
            Self::MedicalRecords => "medical_records",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hands out the next identifier for an entity kind.
#[derive(Clone)]
pub struct IdAllocator {
    counters: Arc<dyn CounterStore>,
}

impl IdAllocator {
    pub fn new(counters: Arc<dyn CounterStore>) -> Self {
        Self { counters }
    }

    /// Allocate the next identifier for `kind`. The first allocation
    /// returns 1.
    pub async fn next_id(&self, kind: EntityKind) -> Result<i64, StoreError> {
        self.counters.increment(kind).await
    }
}
