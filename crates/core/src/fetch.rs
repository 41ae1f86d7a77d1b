//! Fetch strategy for the person -> notes relationship.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::{Note, Person, PersonWithNotes};
use crate::graph::{GraphError, PersonGraph};

/// How a person's note collection is loaded.
///
/// - `Eager`: one `persons LEFT JOIN notes` query, parent rows collapsed.
/// - `Lazy`: one query for the parents, then one per parent for its notes.
///   N parents cost N + 1 round trips; only kept as a baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    #[default]
    Eager,
    Lazy,
}

impl FetchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FetchMode::Eager => "eager",
            FetchMode::Lazy => "lazy",
        }
    }
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FetchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eager" => Ok(FetchMode::Eager),
            "lazy" => Ok(FetchMode::Lazy),
            other => Err(format!(
                "Invalid fetch mode '{other}'. Must be one of: eager, lazy"
            )),
        }
    }
}

/// Collapse the rows of a `persons LEFT JOIN notes` query into one entry per
/// person.
///
/// Each row is `(person, note)` where `note` is `None` for a person without
/// notes (the outer-join null row). A person spread over K rows comes back
/// once with K notes; a person with a single null row comes back with an
/// empty collection. Output is ordered by person id.
///
/// Fails with [`GraphError::DuplicateNote`] when one note id shows up under
/// two different persons.
pub fn collapse_left_join<I>(rows: I) -> Result<Vec<PersonWithNotes>, GraphError>
where
    I: IntoIterator<Item = (Person, Option<Note>)>,
{
    let mut graph = PersonGraph::new();
    for (person, note) in rows {
        let person_id = person.id;
        if graph.person(person_id).is_none() {
            graph.insert_person(person)?;
        }
        if let Some(mut note) = note {
            let repeated = graph
                .note(note.id)
                .is_some_and(|seen| seen.person_id == Some(person_id));
            if repeated {
                continue;
            }
            note.person_id = Some(person_id);
            graph.insert_note(note)?;
        }
    }
    Ok(graph.into_persons_with_notes())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
