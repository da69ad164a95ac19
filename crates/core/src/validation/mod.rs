//! Habit scheduling-rule validation.
//!
//! Provides the violation types and a pure-logic evaluator that checks
//! create/update payloads in a fixed order (first failure wins), normalizes
//! them, and merges validated patches into stored records.

pub mod evaluator;
pub mod rules;

pub use evaluator::{apply_update, validate_for_create, validate_for_update, verify_schedule};
pub use rules::{FieldViolation, ViolationCode};
