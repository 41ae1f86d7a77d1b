//! Shared fixtures for repository integration tests.

#![allow(dead_code)]

use folio_core::entity::{Note, Person};
use folio_db::models::note::CreateNote;
use folio_db::models::person::CreatePerson;
use folio_db::repositories::{NoteRepo, PersonRepo};
use sqlx::PgPool;

pub fn new_person(first_name: &str, last_name: &str, age: Option<i32>) -> CreatePerson {
    CreatePerson {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        age,
    }
}

pub fn new_note(title: &str, person_id: Option<i64>) -> CreateNote {
    CreateNote {
        title: title.to_string(),
        person_id,
    }
}

pub async fn insert_person(pool: &PgPool, first_name: &str) -> Person {
    PersonRepo::create(pool, &new_person(first_name, "Smith", Some(30)))
        .await
        .unwrap()
}

pub async fn insert_note(pool: &PgPool, title: &str, person_id: Option<i64>) -> Note {
    NoteRepo::create(pool, &new_note(title, person_id))
        .await
        .unwrap()
}

/// Three persons; the first owns two notes, the second none, the third one.
///
/// Returns the persons in insertion order.
pub async fn seed_scenario(pool: &PgPool) -> Vec<Person> {
    let john = insert_person(pool, "John").await;
    let jane = insert_person(pool, "Jane").await;
    let emily = insert_person(pool, "Emily").await;

    insert_note(pool, "Groceries", Some(john.id)).await;
    insert_note(pool, "Dentist", Some(john.id)).await;
    insert_note(pool, "Taxes", Some(emily.id)).await;

    vec![john, jane, emily]
}
