//! Atomic entity counters.

use async_trait::async_trait;

use crate::domain::ids::EntityKind;
use crate::domain::ports::store::StoreError;

/// Atomically increments per-entity counters.
///
/// Implementations must guarantee that concurrent calls for the same kind
/// return distinct values; the domain never reads a counter without
/// incrementing it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Increment the counter for `kind` and return the new value.
    async fn increment(&self, kind: EntityKind) -> Result<i64, StoreError>;
}
