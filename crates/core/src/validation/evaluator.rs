//! Habit rule evaluator -- pure logic, no storage access.
//!
//! Rules are evaluated in a fixed order and the first violation is returned:
//! name, description, frequency, week days, month days, scheduled time,
//! estimated minutes, start date, category, status.

use std::sync::LazyLock;

use chrono::{DateTime, Local, NaiveDate};
use regex::Regex;
use serde_json::Number;

use super::rules::{FieldViolation, ViolationCode};
use crate::habit::{
    CreateHabit, FrequencyType, HabitPatch, HabitRecord, HabitStatus, NewHabit, UpdateHabit,
    WeekDay,
};
use crate::types::DbId;

/// Maximum habit name length in characters, after trimming.
pub const NAME_MAX_CHARS: usize = 50;

/// Maximum description length in characters, after trimming.
pub const DESCRIPTION_MAX_CHARS: usize = 200;

/// Estimated duration bounds in minutes (one minute to a full day).
pub const MIN_ESTIMATED_MINUTES: i64 = 1;
pub const MAX_ESTIMATED_MINUTES: i64 = 1440;

/// Valid day-of-month bounds.
pub const MIN_MONTH_DAY: i64 = 1;
pub const MAX_MONTH_DAY: i64 = 31;

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]?[0-9]|2[0-3]):([0-5][0-9])$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Public operations
// ---------------------------------------------------------------------------

/// Validate and normalize a create payload.
///
/// `today` is the caller's current calendar date; a start date strictly
/// before it is rejected. The day list not used by the frequency is cleared.
pub fn validate_for_create(
    input: &CreateHabit,
    today: NaiveDate,
) -> Result<NewHabit, FieldViolation> {
    let name = check_name(&input.name)?;
    let description = check_description(input.description.as_deref())?;
    let frequency_type = check_frequency(&input.frequency_type)?;

    let (week_days, month_days) = if frequency_type.uses_week_days() {
        (Some(check_week_days(input.week_days.as_deref())?), None)
    } else {
        (None, Some(check_month_days(input.month_days.as_deref())?))
    };

    let scheduled_time = check_scheduled_time(input.scheduled_time.as_deref())?;
    let estimated_minutes = check_estimated_minutes(input.estimated_minutes.as_ref())?;

    let start_date = check_start_date(&input.start_date)?;
    if start_date < today {
        return Err(FieldViolation::new(
            "startDate",
            ViolationCode::StartDateInPast,
            "Start date cannot be in the past",
        ));
    }

    let category_id = check_category(input.category_id)?;

    Ok(NewHabit {
        name,
        description,
        frequency_type,
        week_days,
        month_days,
        scheduled_time,
        estimated_minutes,
        start_date,
        category_id,
    })
}

/// Validate and normalize an update payload.
///
/// Only fields present in the payload are checked. The start date is not
/// required to be in the future, since it records when the habit began.
///
/// `current` is the stored frequency of the habit being updated. The day
/// list that the resulting frequency does not use is ignored, as on create.
/// When the frequency changes, the day list it requires must be part of the
/// same patch and the other list is cleared.
pub fn validate_for_update(
    input: &UpdateHabit,
    current: FrequencyType,
) -> Result<HabitPatch, FieldViolation> {
    let name = input.name.as_deref().map(check_name).transpose()?;

    let description = match &input.description {
        Some(value) => Some(check_description(value.as_deref())?),
        None => None,
    };

    let frequency_type = input
        .frequency_type
        .as_deref()
        .map(check_frequency)
        .transpose()?;

    let (week_days, month_days) = match frequency_type {
        Some(frequency) if frequency.uses_week_days() => {
            let days = input.week_days.as_ref().and_then(|d| d.as_deref());
            (Some(Some(check_week_days(days)?)), Some(None))
        }
        Some(_) => {
            let days = input.month_days.as_ref().and_then(|d| d.as_deref());
            (Some(None), Some(Some(check_month_days(days)?)))
        }
        // An explicit null passes through; verify_schedule rejects it on the
        // merged record.
        None if current.uses_week_days() => {
            let week_days = match &input.week_days {
                Some(Some(days)) => Some(Some(check_week_days(Some(days.as_slice()))?)),
                Some(None) => Some(None),
                None => None,
            };
            (week_days, None)
        }
        None => {
            let month_days = match &input.month_days {
                Some(Some(days)) => Some(Some(check_month_days(Some(days.as_slice()))?)),
                Some(None) => Some(None),
                None => None,
            };
            (None, month_days)
        }
    };

    let scheduled_time = match &input.scheduled_time {
        Some(value) => Some(check_scheduled_time(value.as_deref())?),
        None => None,
    };

    let estimated_minutes = match &input.estimated_minutes {
        Some(value) => Some(check_estimated_minutes(value.as_ref())?),
        None => None,
    };

    let start_date = input
        .start_date
        .as_deref()
        .map(check_start_date)
        .transpose()?;

    let category_id = match input.category_id {
        Some(value) => Some(check_category(value)?),
        None => None,
    };

    let status = input.status.as_deref().map(check_status).transpose()?;

    Ok(HabitPatch {
        name,
        description,
        frequency_type,
        week_days,
        month_days,
        scheduled_time,
        estimated_minutes,
        start_date,
        category_id,
        status,
    })
}

/// Merge a validated patch into an existing record, returning a new record.
///
/// Fields present in the patch overwrite the stored ones; absent fields are
/// kept. The day list not used by the resulting frequency is cleared so the
/// record never carries both.
pub fn apply_update(existing: &HabitRecord, patch: &HabitPatch) -> HabitRecord {
    let mut record = existing.clone();

    if let Some(name) = &patch.name {
        record.name = name.clone();
    }
    if let Some(description) = &patch.description {
        record.description = description.clone();
    }
    if let Some(frequency_type) = patch.frequency_type {
        record.frequency_type = frequency_type;
    }
    if let Some(week_days) = &patch.week_days {
        record.week_days = week_days.clone();
    }
    if let Some(month_days) = &patch.month_days {
        record.month_days = month_days.clone();
    }
    if let Some(scheduled_time) = &patch.scheduled_time {
        record.scheduled_time = scheduled_time.clone();
    }
    if let Some(estimated_minutes) = patch.estimated_minutes {
        record.estimated_minutes = estimated_minutes;
    }
    if let Some(start_date) = patch.start_date {
        record.start_date = start_date;
    }
    if let Some(category_id) = patch.category_id {
        record.category_id = category_id;
    }
    if let Some(status) = patch.status {
        record.status = status;
    }

    if record.frequency_type.uses_week_days() {
        record.month_days = None;
    } else {
        record.week_days = None;
    }

    record
}

/// Check that a (merged) record's day list matches its frequency.
pub fn verify_schedule(record: &HabitRecord) -> Result<(), FieldViolation> {
    let populated = if record.frequency_type.uses_week_days() {
        record.week_days.as_ref().is_some_and(|d| !d.is_empty())
    } else {
        record.month_days.as_ref().is_some_and(|d| !d.is_empty())
    };

    if populated {
        Ok(())
    } else {
        Err(missing_days(record.frequency_type))
    }
}

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

fn check_name(raw: &str) -> Result<String, FieldViolation> {
    let name = raw.trim();
    let len = name.chars().count();
    if len == 0 || len > NAME_MAX_CHARS {
        return Err(FieldViolation::new(
            "name",
            ViolationCode::InvalidName,
            format!("Habit name must be between 1 and {NAME_MAX_CHARS} characters"),
        ));
    }
    Ok(name.to_string())
}

fn check_description(raw: Option<&str>) -> Result<Option<String>, FieldViolation> {
    let Some(description) = raw.map(str::trim).filter(|d| !d.is_empty()) else {
        return Ok(None);
    };
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(FieldViolation::new(
            "description",
            ViolationCode::InvalidDescription,
            format!("Description must be at most {DESCRIPTION_MAX_CHARS} characters"),
        ));
    }
    Ok(Some(description.to_string()))
}

fn check_frequency(raw: &str) -> Result<FrequencyType, FieldViolation> {
    raw.trim().parse().map_err(|_| {
        FieldViolation::new(
            "frequencyType",
            ViolationCode::InvalidFrequency,
            "Frequency must be one of: diaria, semanal, mensal",
        )
    })
}

fn missing_days(frequency: FrequencyType) -> FieldViolation {
    if frequency.uses_week_days() {
        FieldViolation::new(
            "weekDays",
            ViolationCode::MissingWeekDays,
            "Select at least one day of the week",
        )
    } else {
        FieldViolation::new(
            "monthDays",
            ViolationCode::MissingMonthDays,
            "Select at least one day of the month",
        )
    }
}

fn check_week_days(raw: Option<&[String]>) -> Result<Vec<WeekDay>, FieldViolation> {
    let raw = raw.unwrap_or_default();
    if raw.is_empty() {
        return Err(missing_days(FrequencyType::Weekly));
    }

    let mut days = raw
        .iter()
        .map(|day| {
            day.trim().parse::<WeekDay>().map_err(|_| {
                FieldViolation::new(
                    "weekDays",
                    ViolationCode::MissingWeekDays,
                    format!("'{day}' is not a recognized day of the week"),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    days.sort_unstable();
    days.dedup();
    Ok(days)
}

/// Integral value of a JSON number; `3.0` counts, `1.5` does not.
fn whole_number(number: &Number) -> Option<i64> {
    number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() <= i32::MAX as f64)
            .map(|f| f as i64)
    })
}

fn check_month_days(raw: Option<&[Number]>) -> Result<Vec<u8>, FieldViolation> {
    let raw = raw.unwrap_or_default();
    if raw.is_empty() {
        return Err(missing_days(FrequencyType::Monthly));
    }

    let mut days = raw
        .iter()
        .map(|day| match whole_number(day) {
            Some(day) if (MIN_MONTH_DAY..=MAX_MONTH_DAY).contains(&day) => Ok(day as u8),
            _ => Err(FieldViolation::new(
                "monthDays",
                ViolationCode::MissingMonthDays,
                format!("Day of the month must be between {MIN_MONTH_DAY} and {MAX_MONTH_DAY}"),
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;
    days.sort_unstable();
    days.dedup();
    Ok(days)
}

/// Accepts `H:MM` or `HH:MM` and normalizes to zero-padded `HH:MM`.
fn check_scheduled_time(raw: Option<&str>) -> Result<Option<String>, FieldViolation> {
    let Some(time) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    let caps = TIME_RE.captures(time).ok_or_else(|| {
        FieldViolation::new(
            "scheduledTime",
            ViolationCode::InvalidTime,
            "Scheduled time must use the HH:MM format",
        )
    })?;
    let hours: u8 = caps[1].parse().unwrap_or_default();
    Ok(Some(format!("{hours:02}:{}", &caps[2])))
}

fn check_estimated_minutes(raw: Option<&Number>) -> Result<Option<i32>, FieldViolation> {
    let Some(number) = raw else {
        return Ok(None);
    };
    match whole_number(number) {
        Some(minutes) if (MIN_ESTIMATED_MINUTES..=MAX_ESTIMATED_MINUTES).contains(&minutes) => {
            Ok(Some(minutes as i32))
        }
        _ => Err(FieldViolation::new(
            "estimatedMinutes",
            ViolationCode::InvalidDuration,
            format!(
                "Estimated time must be between {MIN_ESTIMATED_MINUTES} and \
                 {MAX_ESTIMATED_MINUTES} minutes"
            ),
        )),
    }
}

/// Accepts a calendar date (`YYYY-MM-DD`) or an RFC 3339 datetime. A
/// datetime is reduced to its calendar date in the server's local zone.
fn check_start_date(raw: &str) -> Result<NaiveDate, FieldViolation> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Local).date_naive())
        })
        .ok_or_else(|| {
            FieldViolation::new(
                "startDate",
                ViolationCode::InvalidStartDate,
                "Start date must be a valid date",
            )
        })
}

fn check_category(raw: Option<DbId>) -> Result<Option<DbId>, FieldViolation> {
    match raw {
        Some(id) if id <= 0 => Err(FieldViolation::new(
            "categoryId",
            ViolationCode::InvalidCategory,
            "Category id must be a positive integer",
        )),
        other => Ok(other),
    }
}

fn check_status(raw: &str) -> Result<HabitStatus, FieldViolation> {
    raw.trim().parse().map_err(|_| {
        FieldViolation::new(
            "status",
            ViolationCode::InvalidStatus,
            "Status must be one of: ativo, inativo, concluido",
        )
    })
}
