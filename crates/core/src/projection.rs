//! Projection shapes for the persons/notes join.
//!
//! A [`Shape`] is chosen *before* a query is issued: its field list becomes
//! the SQL select list, so nothing outside the shape is ever fetched. The
//! four shapes, from heaviest to lightest:
//!
//! | Shape             | Output              | Source                          |
//! |-------------------|---------------------|---------------------------------|
//! | `Entity`          | [`NoteWithOwner`]   | notes LEFT JOIN persons         |
//! | `NoteSummary`     | [`NoteSummary`]     | notes INNER JOIN persons        |
//! | `NoteTitle`       | [`NoteTitle`]       | notes                           |
//! | `PersonNoteCount` | [`PersonNoteCount`] | persons LEFT JOIN notes, grouped |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::{Note, Person};
use crate::error::CoreError;
use crate::graph::PersonGraph;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Fields and sources
// ---------------------------------------------------------------------------

/// A column a shape may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    PersonId,
    FirstName,
    LastName,
    Age,
    NoteId,
    NoteTitle,
    NoteOwnerId,
    NoteCount,
}

impl Field {
    /// Select expression, aliased so every field has a distinct column name.
    pub fn select_expr(self) -> &'static str {
        match self {
            Field::PersonId => "p.id AS person_id",
            Field::FirstName => "p.first_name AS first_name",
            Field::LastName => "p.last_name AS last_name",
            Field::Age => "p.age AS age",
            Field::NoteId => "n.id AS note_id",
            Field::NoteTitle => "n.title AS title",
            Field::NoteOwnerId => "n.person_id AS owner_id",
            Field::NoteCount => "COUNT(n.id) AS note_count",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::PersonId => "person_id",
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
            Field::Age => "age",
            Field::NoteId => "note_id",
            Field::NoteTitle => "title",
            Field::NoteOwnerId => "owner_id",
            Field::NoteCount => "note_count",
        }
    }
}

const PERSON_FIELDS: &[Field] = &[Field::PersonId, Field::FirstName, Field::LastName, Field::Age];

const NOTE_FIELDS: &[Field] = &[Field::NoteId, Field::NoteTitle, Field::NoteOwnerId];

const JOINED_FIELDS: &[Field] = &[
    Field::NoteId,
    Field::NoteTitle,
    Field::NoteOwnerId,
    Field::PersonId,
    Field::FirstName,
    Field::LastName,
    Field::Age,
];

const COUNTED_FIELDS: &[Field] = &[
    Field::PersonId,
    Field::FirstName,
    Field::LastName,
    Field::Age,
    Field::NoteCount,
];

/// A join the store can serve, and the fields it exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// `notes` alone.
    Notes,
    /// Every note, with its owner when it has one.
    NotesWithOwner,
    /// Only notes that have an owner.
    OwnedNotes,
    /// Every person, with one row per note (or one null row).
    PersonsWithNotes,
    /// Every person, grouped, with the number of notes it owns.
    PersonsWithNoteCount,
}

impl Source {
    pub fn fields(self) -> &'static [Field] {
        match self {
            Source::Notes => NOTE_FIELDS,
            Source::NotesWithOwner | Source::OwnedNotes | Source::PersonsWithNotes => {
                JOINED_FIELDS
            }
            Source::PersonsWithNoteCount => COUNTED_FIELDS,
        }
    }

    pub fn exposes(self, field: Field) -> bool {
        self.fields().contains(&field)
    }

    pub fn from_clause(self) -> &'static str {
        match self {
            Source::Notes => "notes n",
            Source::NotesWithOwner => "notes n LEFT JOIN persons p ON p.id = n.person_id",
            Source::OwnedNotes => "notes n INNER JOIN persons p ON p.id = n.person_id",
            Source::PersonsWithNotes | Source::PersonsWithNoteCount => {
                "persons p LEFT JOIN notes n ON n.person_id = p.id"
            }
        }
    }

    pub fn group_by(self) -> Option<&'static str> {
        match self {
            Source::PersonsWithNoteCount => Some("p.id"),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Shapes
// ---------------------------------------------------------------------------

/// Output shape descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Shape {
    /// All columns of both tables.
    Entity,
    /// Note title plus owner names.
    #[serde(rename = "summary")]
    NoteSummary,
    /// Note title only.
    #[serde(rename = "title")]
    NoteTitle,
    /// Person columns plus a grouped count of owned notes.
    #[serde(rename = "note-count")]
    PersonNoteCount,
}

impl Shape {
    pub const ALL: [Shape; 4] = [
        Shape::Entity,
        Shape::NoteSummary,
        Shape::NoteTitle,
        Shape::PersonNoteCount,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Shape::Entity => "entity",
            Shape::NoteSummary => "summary",
            Shape::NoteTitle => "title",
            Shape::PersonNoteCount => "note-count",
        }
    }

    pub fn fields(self) -> &'static [Field] {
        match self {
            Shape::Entity => JOINED_FIELDS,
            Shape::NoteSummary => &[Field::NoteTitle, Field::FirstName, Field::LastName],
            Shape::NoteTitle => &[Field::NoteTitle],
            Shape::PersonNoteCount => COUNTED_FIELDS,
        }
    }

    /// The cheapest source that can serve this shape.
    pub fn source(self) -> Source {
        match self {
            Shape::Entity => Source::NotesWithOwner,
            Shape::NoteSummary => Source::OwnedNotes,
            Shape::NoteTitle => Source::Notes,
            Shape::PersonNoteCount => Source::PersonsWithNoteCount,
        }
    }

    /// Stable ordering for the shape's rows.
    pub fn order_by(self) -> &'static str {
        match self {
            Shape::PersonNoteCount => "p.id ASC",
            _ => "n.id ASC",
        }
    }

    /// `SELECT <fields> FROM <source> [GROUP BY ...] ORDER BY ...`.
    pub fn select_sql(self) -> String {
        let source = self.source();
        let columns = self
            .fields()
            .iter()
            .map(|f| f.select_expr())
            .collect::<Vec<_>>()
            .join(", ");
        let group_by = source
            .group_by()
            .map(|g| format!(" GROUP BY {g}"))
            .unwrap_or_default();
        format!(
            "SELECT {columns} FROM {}{group_by} ORDER BY {}",
            source.from_clause(),
            self.order_by()
        )
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Shape {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Shape::ALL
            .into_iter()
            .find(|shape| shape.name() == s)
            .ok_or_else(|| {
                CoreError::UnsupportedShape(format!(
                    "'{s}' (supported shapes: {})",
                    Shape::ALL.map(Shape::name).join(", ")
                ))
            })
    }
}

/// Fail with [`CoreError::UnsupportedShape`] if `shape` asks for a field
/// that `source` does not expose.
pub fn check_shape(source: Source, shape: Shape) -> Result<(), CoreError> {
    let missing: Vec<&str> = shape
        .fields()
        .iter()
        .filter(|f| !source.exposes(**f))
        .map(|f| f.name())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::UnsupportedShape(format!(
            "shape '{shape}' needs field(s) {} which {source:?} does not provide",
            missing.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// A note with its owner, if any. Output of [`Shape::Entity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteWithOwner {
    #[serde(flatten)]
    pub note: Note,
    pub person: Option<Person>,
}

/// Output of [`Shape::NoteSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct NoteSummary {
    pub title: String,
    pub first_name: String,
    pub last_name: String,
}

/// Output of [`Shape::NoteTitle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct NoteTitle {
    pub title: String,
}

/// Output of [`Shape::PersonNoteCount`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PersonNoteCount {
    #[cfg_attr(feature = "sqlx", sqlx(rename = "person_id"))]
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i32>,
    pub note_count: i64,
}

/// One projected row, tagged by the shape that produced it.
///
/// Serialized untagged so clients see the plain DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ShapeInstance {
    Entity(NoteWithOwner),
    NoteSummary(NoteSummary),
    NoteTitle(NoteTitle),
    PersonNoteCount(PersonNoteCount),
}

// ---------------------------------------------------------------------------
// In-memory projection
// ---------------------------------------------------------------------------

/// Project an in-memory graph into `shape`.
///
/// Row sets match what the SQL for the same shape returns: `NoteSummary`
/// skips detached notes (inner join), `Entity` and `NoteTitle` include them,
/// `PersonNoteCount` has one row per person.
pub fn project(graph: &PersonGraph, shape: Shape) -> Vec<ShapeInstance> {
    match shape {
        Shape::Entity => graph
            .notes()
            .map(|note| {
                ShapeInstance::Entity(NoteWithOwner {
                    note: note.clone(),
                    person: note.person_id.and_then(|id| graph.person(id)).cloned(),
                })
            })
            .collect(),
        Shape::NoteSummary => graph
            .notes()
            .filter_map(|note| {
                let owner = graph.person(note.person_id?)?;
                Some(ShapeInstance::NoteSummary(NoteSummary {
                    title: note.title.clone(),
                    first_name: owner.first_name.clone(),
                    last_name: owner.last_name.clone(),
                }))
            })
            .collect(),
        Shape::NoteTitle => graph
            .notes()
            .map(|note| {
                ShapeInstance::NoteTitle(NoteTitle {
                    title: note.title.clone(),
                })
            })
            .collect(),
        Shape::PersonNoteCount => graph
            .persons()
            .map(|person| {
                ShapeInstance::PersonNoteCount(PersonNoteCount {
                    id: person.id,
                    first_name: person.first_name.clone(),
                    last_name: person.last_name.clone(),
                    age: person.age,
                    note_count: graph.note_count(person.id) as i64,
                })
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    /// Persons 1..=3; person 1 owns two notes, person 2 none, person 3 one,
    /// plus one detached note.
    fn scenario() -> PersonGraph {
        let mut graph = PersonGraph::new();
        for (id, first) in [(1, "John"), (2, "Jane"), (3, "Emily")] {
            graph
                .insert_person(Person {
                    id,
                    first_name: first.to_string(),
                    last_name: "Brown".to_string(),
                    age: Some(20 + id as i32),
                })
                .unwrap();
        }
        for (id, owner) in [(10, Some(1)), (11, Some(1)), (12, Some(3)), (13, None)] {
            graph
                .insert_note(Note {
                    id,
                    title: format!("Title{id}"),
                    person_id: owner,
                })
                .unwrap();
        }
        graph
    }

    // -- Shape parsing -------------------------------------------------------

    #[test]
    fn shape_names_round_trip() {
        for shape in Shape::ALL {
            assert_eq!(shape.name().parse::<Shape>().unwrap(), shape);
        }
    }

    #[test]
    fn unknown_shape_is_unsupported() {
        assert_matches!(
            "everything".parse::<Shape>(),
            Err(CoreError::UnsupportedShape(msg)) if msg.contains("summary")
        );
    }

    #[test]
    fn shape_deserializes_from_request_name() {
        let shape: Shape = serde_json::from_str("\"note-count\"").unwrap();
        assert_eq!(shape, Shape::PersonNoteCount);
        let shape: Shape = serde_json::from_str("\"summary\"").unwrap();
        assert_eq!(shape, Shape::NoteSummary);
    }

    // -- check_shape ---------------------------------------------------------

    #[test]
    fn every_shape_is_served_by_its_own_source() {
        for shape in Shape::ALL {
            assert!(check_shape(shape.source(), shape).is_ok(), "{shape}");
        }
    }

    #[test]
    fn note_count_not_available_from_note_join() {
        let err = check_shape(Source::NotesWithOwner, Shape::PersonNoteCount).unwrap_err();
        assert_matches!(err, CoreError::UnsupportedShape(msg) if msg.contains("note_count"));
    }

    #[test]
    fn owner_names_not_available_from_bare_notes() {
        assert_matches!(
            check_shape(Source::Notes, Shape::NoteSummary),
            Err(CoreError::UnsupportedShape(_))
        );
        assert!(check_shape(Source::Notes, Shape::NoteTitle).is_ok());
    }

    // -- SQL -----------------------------------------------------------------

    #[test]
    fn title_shape_selects_a_single_column() {
        assert_eq!(
            Shape::NoteTitle.select_sql(),
            "SELECT n.title AS title FROM notes n ORDER BY n.id ASC"
        );
    }

    #[test]
    fn summary_shape_uses_inner_join_and_no_ids() {
        let sql = Shape::NoteSummary.select_sql();
        assert!(sql.contains("INNER JOIN persons p"));
        assert!(!sql.contains("n.id AS"));
        assert!(!sql.contains("p.age"));
    }

    #[test]
    fn note_count_shape_groups_instead_of_loading_notes() {
        let sql = Shape::PersonNoteCount.select_sql();
        assert!(sql.contains("COUNT(n.id) AS note_count"));
        assert!(sql.contains("LEFT JOIN notes n"));
        assert!(sql.contains("GROUP BY p.id"));
        assert!(!sql.contains("n.title"));
    }

    // -- project -------------------------------------------------------------

    #[test]
    fn title_projection_covers_every_note() {
        let rows = project(&scenario(), Shape::NoteTitle);
        assert_eq!(rows.len(), 4);
        assert_matches!(&rows[0], ShapeInstance::NoteTitle(t) if t.title == "Title10");
    }

    #[test]
    fn summary_projection_skips_detached_notes() {
        let rows = project(&scenario(), Shape::NoteSummary);
        assert_eq!(rows.len(), 3);
        assert_matches!(
            &rows[2],
            ShapeInstance::NoteSummary(s) if s.title == "Title12" && s.first_name == "Emily"
        );
    }

    #[test]
    fn entity_projection_keeps_detached_note_without_owner() {
        let rows = project(&scenario(), Shape::Entity);
        assert_eq!(rows.len(), 4);
        assert_matches!(&rows[3], ShapeInstance::Entity(e) if e.person.is_none());
        assert_matches!(
            &rows[0],
            ShapeInstance::Entity(e) if e.person.as_ref().map(|p| p.id) == Some(1)
        );
    }

    #[test]
    fn note_count_matches_full_load() {
        let graph = scenario();
        let rows = project(&graph, Shape::PersonNoteCount);
        assert_eq!(rows.len(), 3);

        let mut total = 0;
        for row in &rows {
            let ShapeInstance::PersonNoteCount(count) = row else {
                panic!("unexpected shape: {row:?}");
            };
            let loaded = graph.person_with_notes(count.id).unwrap();
            assert_eq!(count.note_count, loaded.notes.len() as i64);
            total += count.note_count;
        }
        assert_eq!(total, 3);
    }

    #[test]
    fn shape_instance_serializes_as_plain_dto() {
        let row = ShapeInstance::NoteTitle(NoteTitle {
            title: "Hello".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            serde_json::json!({"title": "Hello"})
        );
    }
}
