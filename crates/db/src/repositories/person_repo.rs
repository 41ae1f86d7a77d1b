//! Repository for the `persons` table.

use folio_core::entity::Person;
use folio_core::pagination::{Page, PageRequest, Slice, SortableColumns};
use folio_core::projection::{PersonNoteCount, Shape};
use folio_core::types::DbId;
use sqlx::PgPool;

use crate::models::person::CreatePerson;
use crate::paging::{fetch_page, fetch_slice, Listing};
use crate::DbError;

/// Column list for persons queries.
const COLUMNS: &str = "id, first_name, last_name, age";

/// Public sort names for persons and the columns they resolve to.
pub const SORTABLE: SortableColumns = SortableColumns::new(
    &[
        ("id", "id"),
        ("first_name", "first_name"),
        ("last_name", "last_name"),
        ("age", "age"),
    ],
    "id",
);

const LISTING: Listing = Listing {
    columns: COLUMNS,
    from: "persons",
    sortable: SORTABLE,
};

/// Provides persistence and read queries for persons.
pub struct PersonRepo;

impl PersonRepo {
    /// Insert a new person, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePerson) -> Result<Person, sqlx::Error> {
        let query = format!(
            "INSERT INTO persons (first_name, last_name, age)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Person>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.age)
            .fetch_one(pool)
            .await
    }

    /// Find a person by ID. Notes are not loaded.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Person>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM persons WHERE id = $1");
        sqlx::query_as::<_, Person>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List persons with the given first name, ordered by ID. Notes are not loaded.
    pub async fn list_by_first_name(
        pool: &PgPool,
        first_name: &str,
    ) -> Result<Vec<Person>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM persons WHERE first_name = $1 ORDER BY id");
        sqlx::query_as::<_, Person>(&query)
            .bind(first_name)
            .fetch_all(pool)
            .await
    }

    /// Delete a person. Owned notes go with it (`ON DELETE CASCADE`).
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM persons WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total-count page of persons.
    pub async fn page(pool: &PgPool, request: &PageRequest) -> Result<Page<Person>, DbError> {
        fetch_page(pool, &LISTING, request).await
    }

    /// Bounded slice of persons.
    pub async fn slice(pool: &PgPool, request: &PageRequest) -> Result<Slice<Person>, DbError> {
        fetch_slice(pool, &LISTING, request).await
    }

    /// Every person with the number of notes it owns.
    ///
    /// The count comes from a grouped aggregate; note rows are never loaded.
    pub async fn list_with_note_count(pool: &PgPool) -> Result<Vec<PersonNoteCount>, sqlx::Error> {
        let query = Shape::PersonNoteCount.select_sql();
        sqlx::query_as::<_, PersonNoteCount>(&query)
            .fetch_all(pool)
            .await
    }
}
