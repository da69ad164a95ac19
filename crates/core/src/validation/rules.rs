//! Validation violation types.

use serde::Serialize;

/// Reason a habit payload was rejected. One code per rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationCode {
    InvalidName,
    InvalidDescription,
    InvalidFrequency,
    MissingWeekDays,
    MissingMonthDays,
    InvalidTime,
    InvalidDuration,
    InvalidStartDate,
    StartDateInPast,
    InvalidCategory,
    InvalidStatus,
}

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FieldViolation {
    /// Wire (camelCase) name of the offending field.
    pub field: &'static str,
    pub code: ViolationCode,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            field,
            code,
            message: message.into(),
        }
    }
}
