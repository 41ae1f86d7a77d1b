//! Row types for the outer joins between `persons` and `notes`.
//!
//! Column names follow the aliases in `folio_core::projection::Field`.

use folio_core::entity::{Note, Person};
use folio_core::projection::NoteWithOwner;
use folio_core::types::DbId;
use sqlx::FromRow;

/// One row of `persons LEFT JOIN notes`. Note columns are null for a person
/// without notes.
#[derive(Debug, FromRow)]
pub struct PersonNoteRow {
    pub person_id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i32>,
    pub note_id: Option<DbId>,
    pub title: Option<String>,
    pub owner_id: Option<DbId>,
}

impl PersonNoteRow {
    pub fn split(self) -> (Person, Option<Note>) {
        let person = Person {
            id: self.person_id,
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
        };
        let note = match (self.note_id, self.title) {
            (Some(id), Some(title)) => Some(Note {
                id,
                title,
                person_id: self.owner_id,
            }),
            _ => None,
        };
        (person, note)
    }
}

/// One row of `notes LEFT JOIN persons`. Person columns are null for a
/// detached note.
#[derive(Debug, FromRow)]
pub struct NoteOwnerRow {
    pub note_id: DbId,
    pub title: String,
    pub owner_id: Option<DbId>,
    pub person_id: Option<DbId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i32>,
}

impl From<NoteOwnerRow> for NoteWithOwner {
    fn from(row: NoteOwnerRow) -> Self {
        let person = match (row.person_id, row.first_name, row.last_name) {
            (Some(id), Some(first_name), Some(last_name)) => Some(Person {
                id,
                first_name,
                last_name,
                age: row.age,
            }),
            _ => None,
        };
        NoteWithOwner {
            note: Note {
                id: row.note_id,
                title: row.title,
                person_id: row.owner_id,
            },
            person,
        }
    }
}
