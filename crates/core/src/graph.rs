//! In-memory person/note graph.
//!
//! The one-to-many relationship is kept as two independent maps rather than
//! a cyclic structure:
//!
//! - parent -> children: each [`PersonNode`] owns the ordered list of its
//!   note ids;
//! - child -> parent: each [`Note`] carries `person_id`, a plain id used only
//!   for lookups.
//!
//! Both sides are only ever changed together, inside a single `&mut self`
//! method ([`PersonGraph::attach`], [`PersonGraph::detach`],
//! [`PersonGraph::remove_person`]), so they cannot drift apart.

use std::collections::BTreeMap;

use crate::entity::{Note, Person, PersonWithNotes};
use crate::error::CoreError;
use crate::types::DbId;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("Person {0} already exists")]
    DuplicatePerson(DbId),

    #[error("Note {0} already exists")]
    DuplicateNote(DbId),

    #[error("Person {0} not found")]
    UnknownPerson(DbId),

    #[error("Note {0} not found")]
    UnknownNote(DbId),
}

impl From<GraphError> for CoreError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::UnknownPerson(id) => CoreError::NotFound {
                entity: "Person",
                id,
            },
            GraphError::UnknownNote(id) => CoreError::NotFound { entity: "Note", id },
            other => CoreError::Internal(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
struct PersonNode {
    person: Person,
    notes: Vec<DbId>,
}

/// Arena of persons and notes keyed by id, iterated in ascending id order.
#[derive(Debug, Clone, Default)]
pub struct PersonGraph {
    persons: BTreeMap<DbId, PersonNode>,
    notes: BTreeMap<DbId, Note>,
}

impl PersonGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_person(&mut self, person: Person) -> Result<(), GraphError> {
        if self.persons.contains_key(&person.id) {
            return Err(GraphError::DuplicatePerson(person.id));
        }
        self.persons.insert(
            person.id,
            PersonNode {
                person,
                notes: Vec::new(),
            },
        );
        Ok(())
    }

    /// Insert a note. If it already names an owner, it is attached to that
    /// owner in the same step.
    pub fn insert_note(&mut self, note: Note) -> Result<(), GraphError> {
        if self.notes.contains_key(&note.id) {
            return Err(GraphError::DuplicateNote(note.id));
        }
        if let Some(owner) = note.person_id {
            let node = self
                .persons
                .get_mut(&owner)
                .ok_or(GraphError::UnknownPerson(owner))?;
            node.notes.push(note.id);
        }
        self.notes.insert(note.id, note);
        Ok(())
    }

    /// Attach a note to a person, moving it away from any previous owner.
    pub fn attach(&mut self, note_id: DbId, person_id: DbId) -> Result<(), GraphError> {
        if !self.persons.contains_key(&person_id) {
            return Err(GraphError::UnknownPerson(person_id));
        }
        let note = self
            .notes
            .get_mut(&note_id)
            .ok_or(GraphError::UnknownNote(note_id))?;

        if note.person_id == Some(person_id) {
            return Ok(());
        }
        if let Some(previous) = note.person_id.take() {
            if let Some(node) = self.persons.get_mut(&previous) {
                node.notes.retain(|id| *id != note_id);
            }
        }
        note.person_id = Some(person_id);
        if let Some(node) = self.persons.get_mut(&person_id) {
            node.notes.push(note_id);
        }
        Ok(())
    }

    /// Detach a note from its owner. Returns the previous owner, if any.
    pub fn detach(&mut self, note_id: DbId) -> Result<Option<DbId>, GraphError> {
        let note = self
            .notes
            .get_mut(&note_id)
            .ok_or(GraphError::UnknownNote(note_id))?;
        let previous = note.person_id.take();
        if let Some(owner) = previous {
            if let Some(node) = self.persons.get_mut(&owner) {
                node.notes.retain(|id| *id != note_id);
            }
        }
        Ok(previous)
    }

    /// Remove a person and every note it owns.
    pub fn remove_person(&mut self, person_id: DbId) -> Option<PersonWithNotes> {
        let node = self.persons.remove(&person_id)?;
        let notes = node
            .notes
            .iter()
            .filter_map(|id| self.notes.remove(id))
            .collect();
        Some(PersonWithNotes {
            person: node.person,
            notes,
        })
    }

    pub fn person(&self, person_id: DbId) -> Option<&Person> {
        self.persons.get(&person_id).map(|node| &node.person)
    }

    pub fn note(&self, note_id: DbId) -> Option<&Note> {
        self.notes.get(&note_id)
    }

    pub fn persons(&self) -> impl Iterator<Item = &Person> + '_ {
        self.persons.values().map(|node| &node.person)
    }

    pub fn notes(&self) -> impl Iterator<Item = &Note> + '_ {
        self.notes.values()
    }

    /// Notes owned by a person, in attachment order.
    pub fn notes_of(&self, person_id: DbId) -> impl Iterator<Item = &Note> + '_ {
        self.persons
            .get(&person_id)
            .into_iter()
            .flat_map(|node| node.notes.iter())
            .filter_map(|id| self.notes.get(id))
    }

    pub fn note_count(&self, person_id: DbId) -> usize {
        self.persons
            .get(&person_id)
            .map_or(0, |node| node.notes.len())
    }

    pub fn person_with_notes(&self, person_id: DbId) -> Option<PersonWithNotes> {
        let node = self.persons.get(&person_id)?;
        Some(PersonWithNotes {
            person: node.person.clone(),
            notes: self.notes_of(person_id).cloned().collect(),
        })
    }

    /// Consume the graph into one entry per person, ascending by id.
    pub fn into_persons_with_notes(self) -> Vec<PersonWithNotes> {
        let Self { persons, mut notes } = self;
        persons
            .into_values()
            .map(|node| PersonWithNotes {
                notes: node.notes.iter().filter_map(|id| notes.remove(id)).collect(),
                person: node.person,
            })
            .collect()
    }

    /// Verify that both sides of every link agree.
    ///
    /// Every owned note id must point back at its owner and appear exactly
    /// once; every note naming an owner must be listed by that owner.
    pub fn check_invariants(&self) -> Result<(), String> {
        for (person_id, node) in &self.persons {
            for (pos, note_id) in node.notes.iter().enumerate() {
                let note = self
                    .notes
                    .get(note_id)
                    .ok_or_else(|| format!("person {person_id} lists missing note {note_id}"))?;
                if note.person_id != Some(*person_id) {
                    return Err(format!(
                        "note {note_id} is listed by person {person_id} but points at {:?}",
                        note.person_id
                    ));
                }
                if node.notes[pos + 1..].contains(note_id) {
                    return Err(format!("note {note_id} listed twice by person {person_id}"));
                }
            }
        }
        for note in self.notes.values() {
            if let Some(owner) = note.person_id {
                let listed = self
                    .persons
                    .get(&owner)
                    .is_some_and(|node| node.notes.contains(&note.id));
                if !listed {
                    return Err(format!(
                        "note {} points at person {owner} which does not list it",
                        note.id
                    ));
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
