//! Habit row model.

use chrono::NaiveDate;
use habits_core::error::CoreError;
use habits_core::habit::{HabitRecord, WeekDay};
use habits_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `habits` table.
///
/// Enum columns hold their wire strings (`diaria`, `segunda`, `ativo`, ...),
/// guarded by CHECK constraints.
#[derive(Debug, Clone, FromRow)]
pub struct HabitRow {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub frequency_type: String,
    pub week_days: Option<Vec<String>>,
    pub month_days: Option<Vec<i16>>,
    pub scheduled_time: Option<String>,
    pub estimated_minutes: Option<i32>,
    pub start_date: NaiveDate,
    pub category_id: Option<DbId>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl HabitRow {
    /// Convert into the domain record. A value the domain does not recognize
    /// means the row was written outside the application.
    pub fn into_record(self) -> Result<HabitRecord, CoreError> {
        let id = self.id;
        let corrupt = move |what: String| CoreError::Internal(format!("habit {id} has invalid {what}"));

        let frequency_type = self
            .frequency_type
            .parse()
            .map_err(|e| corrupt(format!("frequency_type: {e}")))?;
        let status = self
            .status
            .parse()
            .map_err(|e| corrupt(format!("status: {e}")))?;

        let week_days = self
            .week_days
            .as_ref()
            .map(|days| {
                days.iter()
                    .map(|d| d.parse::<WeekDay>())
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()
            .map_err(|e| corrupt(format!("week_days: {e}")))?;

        let month_days = self
            .month_days
            .as_ref()
            .map(|days| {
                days.iter()
                    .map(|&d| u8::try_from(d).ok().filter(|d| (1..=31).contains(d)).ok_or(d))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()
            .map_err(|d| corrupt(format!("month day {d}")))?;

        Ok(HabitRecord {
            id: self.id,
            owner_id: self.owner_id,
            name: self.name,
            description: self.description,
            frequency_type,
            week_days,
            month_days,
            scheduled_time: self.scheduled_time,
            estimated_minutes: self.estimated_minutes,
            start_date: self.start_date,
            category_id: self.category_id,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Wire strings for a week-day list, as stored in `TEXT[]`.
pub fn week_day_strings(days: Option<&[WeekDay]>) -> Option<Vec<String>> {
    days.map(|days| days.iter().map(|d| d.as_str().to_string()).collect())
}

/// Month days widened to `SMALLINT[]`.
pub fn month_day_values(days: Option<&[u8]>) -> Option<Vec<i16>> {
    days.map(|days| days.iter().map(|&d| i16::from(d)).collect())
}
