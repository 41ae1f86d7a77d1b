//! Person and note value types shared by storage, projection and HTTP.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// A row from the `persons` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Person {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i32>,
}

/// A row from the `notes` table.
///
/// `person_id` is the non-owning back-reference to the owning person;
/// `None` only while the note is detached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Note {
    pub id: DbId,
    pub title: String,
    pub person_id: Option<DbId>,
}

/// A person together with its full note collection.
///
/// An empty `notes` vector means the person has no notes; it never means the
/// collection was not loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonWithNotes {
    #[serde(flatten)]
    pub person: Person,
    pub notes: Vec<Note>,
}
