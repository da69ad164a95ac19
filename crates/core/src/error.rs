use crate::types::DbId;
use crate::validation::rules::FieldViolation;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The entity does not exist or is not owned by the caller. Both cases
    /// are reported identically so ownership is never disclosed.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Validation failed: {0}")]
    InvalidField(#[from] FieldViolation),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
