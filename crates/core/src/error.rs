use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Invalid sort field: {0}")]
    InvalidSortField(String),

    #[error("Invalid page size: {0} (must be at least 1)")]
    InvalidPageSize(i64),

    #[error("Unsupported projection shape: {0}")]
    UnsupportedShape(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
