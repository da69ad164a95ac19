//! [`HabitStore`] backed by PostgreSQL.

use async_trait::async_trait;
use habits_core::error::CoreError;
use habits_core::habit::{HabitRecord, NewHabit};
use habits_core::store::HabitStore;
use habits_core::types::DbId;

use crate::repositories::HabitRepo;
use crate::DbPool;

/// Stores habits in the `habits` table through [`HabitRepo`].
#[derive(Debug, Clone)]
pub struct PgHabitStore {
    pool: DbPool,
}

impl PgHabitStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map a failed habit query to a domain error.
///
/// A CHECK violation (PostgreSQL code `23514`) means a write slipped past
/// the rule validator and is reported as a validation error. Anything else
/// is logged and surfaced as an internal error.
fn classify(op: &'static str) -> impl FnOnce(sqlx::Error) -> CoreError {
    move |err| {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("23514") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                tracing::warn!(constraint, op, "Check constraint rejected habit write");
                return CoreError::Validation(format!("Value violates constraint: {constraint}"));
            }
        }
        tracing::error!(error = %err, op, "Habit query failed");
        CoreError::Internal(format!("database error during {op}"))
    }
}

#[async_trait]
impl HabitStore for PgHabitStore {
    fn backend_tag(&self) -> &'static str {
        "postgres"
    }

    async fn create(&self, owner_id: DbId, habit: NewHabit) -> Result<HabitRecord, CoreError> {
        HabitRepo::create(&self.pool, owner_id, &habit)
            .await
            .map_err(classify("create"))?
            .into_record()
    }

    async fn get(&self, owner_id: DbId, id: DbId) -> Result<Option<HabitRecord>, CoreError> {
        HabitRepo::find_by_id(&self.pool, owner_id, id)
            .await
            .map_err(classify("get"))?
            .map(|row| row.into_record())
            .transpose()
    }

    async fn list(&self, owner_id: DbId) -> Result<Vec<HabitRecord>, CoreError> {
        HabitRepo::list_by_owner(&self.pool, owner_id)
            .await
            .map_err(classify("list"))?
            .into_iter()
            .map(|row| row.into_record())
            .collect()
    }

    async fn update(&self, record: HabitRecord) -> Result<Option<HabitRecord>, CoreError> {
        HabitRepo::update(&self.pool, &record)
            .await
            .map_err(classify("update"))?
            .map(|row| row.into_record())
            .transpose()
    }
}
