//! Note input DTOs.

use folio_core::types::DbId;
use serde::Deserialize;

/// DTO for creating a note, optionally already owned by a person.
#[derive(Debug, Deserialize)]
pub struct CreateNote {
    pub title: String,
    pub person_id: Option<DbId>,
}

/// DTO for creating a note under a person given in the path.
#[derive(Debug, Deserialize)]
pub struct CreatePersonNote {
    pub title: String,
}

/// DTO for moving a note to a new owner.
#[derive(Debug, Deserialize)]
pub struct AssignOwner {
    pub person_id: DbId,
}
