use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found: id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The entity exists but its current state forbids the operation.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}
