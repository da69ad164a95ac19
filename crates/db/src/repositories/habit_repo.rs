//! Repository for the `habits` table.
//!
//! Every query is scoped by `owner_id`; a habit owned by someone else looks
//! exactly like a missing one.

use habits_core::habit::{HabitRecord, NewHabit};
use habits_core::types::DbId;
use sqlx::PgPool;

use crate::models::habit::{month_day_values, week_day_strings, HabitRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, name, description, frequency_type, week_days, month_days, \
                       scheduled_time, estimated_minutes, start_date, category_id, status, \
                       created_at, updated_at";

/// Provides CRUD operations for habits.
pub struct HabitRepo;

impl HabitRepo {
    /// Insert a new habit, returning the created row. Status defaults to `ativo`.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &NewHabit,
    ) -> Result<HabitRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO habits (owner_id, name, description, frequency_type, week_days,
                                 month_days, scheduled_time, estimated_minutes, start_date,
                                 category_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HabitRow>(&query)
            .bind(owner_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.frequency_type.as_str())
            .bind(week_day_strings(input.week_days.as_deref()))
            .bind(month_day_values(input.month_days.as_deref()))
            .bind(&input.scheduled_time)
            .bind(input.estimated_minutes)
            .bind(input.start_date)
            .bind(input.category_id)
            .fetch_one(pool)
            .await
    }

    /// Find one of the owner's habits by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        owner_id: DbId,
        id: DbId,
    ) -> Result<Option<HabitRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM habits WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, HabitRow>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// List all of the owner's habits in insertion order, inactive ones included.
    ///
    /// Filtering and the requested ordering happen in the query engine.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<HabitRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM habits WHERE owner_id = $1 ORDER BY id");
        sqlx::query_as::<_, HabitRow>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Overwrite every mutable column with the values in `record`.
    ///
    /// The record is already merged and validated, so nullable columns are
    /// written as-is rather than coalesced. Returns `None` if no row with the
    /// given id belongs to the record's owner.
    pub async fn update(
        pool: &PgPool,
        record: &HabitRecord,
    ) -> Result<Option<HabitRow>, sqlx::Error> {
        let query = format!(
            "UPDATE habits SET
                name = $3,
                description = $4,
                frequency_type = $5,
                week_days = $6,
                month_days = $7,
                scheduled_time = $8,
                estimated_minutes = $9,
                start_date = $10,
                category_id = $11,
                status = $12,
                updated_at = NOW()
             WHERE id = $1 AND owner_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HabitRow>(&query)
            .bind(record.id)
            .bind(record.owner_id)
            .bind(&record.name)
            .bind(&record.description)
            .bind(record.frequency_type.as_str())
            .bind(week_day_strings(record.week_days.as_deref()))
            .bind(month_day_values(record.month_days.as_deref()))
            .bind(&record.scheduled_time)
            .bind(record.estimated_minutes)
            .bind(record.start_date)
            .bind(record.category_id)
            .bind(record.status.as_str())
            .fetch_optional(pool)
            .await
    }
}
