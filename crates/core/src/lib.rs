//! Habit domain core.
//!
//! Pure domain logic with no database or HTTP dependencies: habit types,
//! scheduling-rule validation, list filtering/ordering, and the storage
//! abstraction the outer layers plug into.

pub mod error;
pub mod habit;
pub mod query;
pub mod store;
pub mod types;
pub mod validation;
