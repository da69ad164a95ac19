//! Database row structs.
//!
//! Rows mirror the table columns with plain SQL types; conversion into the
//! core domain types happens at the repository boundary.

pub mod habit;
