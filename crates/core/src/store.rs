//! Habit storage abstraction.
//!
//! The validator and query engine never touch storage; handlers go through
//! a [`HabitStore`], which owns id assignment and ownership scoping. The
//! PostgreSQL implementation lives in the `db` crate.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::CoreError;
use crate::habit::{HabitRecord, NewHabit};
use crate::types::DbId;

/// Persistence for habit records.
///
/// `get` and `update` return `None` both when the record does not exist and
/// when it belongs to another owner.
#[async_trait]
pub trait HabitStore: Send + Sync {
    /// Short backend name, reported by the health endpoint.
    fn backend_tag(&self) -> &'static str;

    /// Persist a new habit, assigning its id and creation timestamp.
    async fn create(&self, owner_id: DbId, habit: NewHabit) -> Result<HabitRecord, CoreError>;

    /// Fetch one habit owned by `owner_id`.
    async fn get(&self, owner_id: DbId, id: DbId) -> Result<Option<HabitRecord>, CoreError>;

    /// All habits owned by `owner_id`, inactive ones included.
    async fn list(&self, owner_id: DbId) -> Result<Vec<HabitRecord>, CoreError>;

    /// Overwrite a stored habit with `record`, matched on id and owner.
    /// `id`, `owner_id` and `created_at` are never changed.
    async fn update(&self, record: HabitRecord) -> Result<Option<HabitRecord>, CoreError>;
}

#[derive(Debug)]
struct MemoryInner {
    habits: Vec<HabitRecord>,
    next_id: DbId,
}

/// Process-local store. Contents are lost on restart.
#[derive(Debug)]
pub struct InMemoryHabitStore {
    inner: RwLock<MemoryInner>,
}

impl Default for InMemoryHabitStore {
    fn default() -> Self {
        Self {
            inner: RwLock::new(MemoryInner {
                habits: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl InMemoryHabitStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HabitStore for InMemoryHabitStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, owner_id: DbId, habit: NewHabit) -> Result<HabitRecord, CoreError> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;

        let record = HabitRecord::from_new(id, owner_id, habit, chrono::Utc::now());
        inner.habits.push(record.clone());
        Ok(record)
    }

    async fn get(&self, owner_id: DbId, id: DbId) -> Result<Option<HabitRecord>, CoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .habits
            .iter()
            .find(|h| h.id == id && h.owner_id == owner_id)
            .cloned())
    }

    async fn list(&self, owner_id: DbId) -> Result<Vec<HabitRecord>, CoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .habits
            .iter()
            .filter(|h| h.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn update(&self, record: HabitRecord) -> Result<Option<HabitRecord>, CoreError> {
        let mut inner = self.inner.write().await;
        let Some(stored) = inner
            .habits
            .iter_mut()
            .find(|h| h.id == record.id && h.owner_id == record.owner_id)
        else {
            return Ok(None);
        };

        *stored = HabitRecord {
            created_at: stored.created_at,
            updated_at: chrono::Utc::now(),
            ..record
        };
        Ok(Some(stored.clone()))
    }
}
