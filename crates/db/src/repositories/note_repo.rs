//! Repository for the `notes` table.

use folio_core::entity::Note;
use folio_core::error::CoreError;
use folio_core::pagination::{Page, PageRequest, Slice, SortableColumns};
use folio_core::projection::{
    check_shape, NoteSummary, NoteTitle, NoteWithOwner, Shape, ShapeInstance, Source,
};
use folio_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::join::NoteOwnerRow;
use crate::models::note::CreateNote;
use crate::paging::{fetch_page, fetch_slice, Listing};
use crate::DbError;

/// Column list for notes queries.
const COLUMNS: &str = "id, title, person_id";

/// Public sort names for notes and the columns they resolve to.
pub const SORTABLE: SortableColumns = SortableColumns::new(
    &[("id", "id"), ("title", "title"), ("person_id", "person_id")],
    "id",
);

const LISTING: Listing = Listing {
    columns: COLUMNS,
    from: "notes",
    sortable: SORTABLE,
};

/// The widest join the notes resource serves; shapes are checked against it.
pub const PROJECTION_SOURCE: Source = Source::NotesWithOwner;

/// Provides persistence, projection and paging for notes.
pub struct NoteRepo;

impl NoteRepo {
    /// Insert a new note. When `person_id` is set the note is created already
    /// attached, in the same statement.
    pub async fn create(pool: &PgPool, input: &CreateNote) -> Result<Note, sqlx::Error> {
        let query = format!(
            "INSERT INTO notes (title, person_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(&input.title)
            .bind(input.person_id)
            .fetch_one(pool)
            .await
    }

    /// Find a note by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Note>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notes WHERE id = $1");
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Notes owned by one person, ordered by ID.
    ///
    /// This is the per-parent query of a lazy fetch.
    pub async fn list_by_person<'c, E>(executor: E, person_id: DbId) -> Result<Vec<Note>, sqlx::Error>
    where
        E: PgExecutor<'c>,
    {
        let query = format!("SELECT {COLUMNS} FROM notes WHERE person_id = $1 ORDER BY id");
        sqlx::query_as::<_, Note>(&query)
            .bind(person_id)
            .fetch_all(executor)
            .await
    }

    /// Attach a note to a person.
    ///
    /// Owner reference and collection membership are one column, so a single
    /// `UPDATE` changes both sides at once. Returns `None` when either the
    /// note or the person does not exist; nothing is changed in that case.
    pub async fn attach(
        pool: &PgPool,
        note_id: DbId,
        person_id: DbId,
    ) -> Result<Option<Note>, sqlx::Error> {
        sqlx::query_as::<_, Note>(
            "UPDATE notes SET person_id = p.id
             FROM persons p
             WHERE notes.id = $1 AND p.id = $2
             RETURNING notes.id, notes.title, notes.person_id",
        )
        .bind(note_id)
        .bind(person_id)
        .fetch_optional(pool)
        .await
    }

    /// Detach a note from its owner. Returns `None` if the note does not exist.
    pub async fn detach(pool: &PgPool, note_id: DbId) -> Result<Option<Note>, sqlx::Error> {
        let query = format!(
            "UPDATE notes SET person_id = NULL
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(note_id)
            .fetch_optional(pool)
            .await
    }

    /// Total-count page of notes.
    pub async fn page(pool: &PgPool, request: &PageRequest) -> Result<Page<Note>, DbError> {
        fetch_page(pool, &LISTING, request).await
    }

    /// Bounded slice of notes.
    pub async fn slice(pool: &PgPool, request: &PageRequest) -> Result<Slice<Note>, DbError> {
        fetch_slice(pool, &LISTING, request).await
    }

    /// Project every note into `shape`.
    ///
    /// The select list comes from the shape, so only its columns are read.
    /// Shapes needing fields the notes join cannot provide fail with
    /// `UnsupportedShape` before any query is issued.
    pub async fn project(pool: &PgPool, shape: Shape) -> Result<Vec<ShapeInstance>, DbError> {
        check_shape(PROJECTION_SOURCE, shape)?;
        let query = shape.select_sql();
        tracing::debug!(%shape, "Projecting notes");

        let rows = match shape {
            Shape::Entity => sqlx::query_as::<_, NoteOwnerRow>(&query)
                .fetch_all(pool)
                .await?
                .into_iter()
                .map(|row| ShapeInstance::Entity(NoteWithOwner::from(row)))
                .collect(),
            Shape::NoteSummary => sqlx::query_as::<_, NoteSummary>(&query)
                .fetch_all(pool)
                .await?
                .into_iter()
                .map(ShapeInstance::NoteSummary)
                .collect(),
            Shape::NoteTitle => sqlx::query_as::<_, NoteTitle>(&query)
                .fetch_all(pool)
                .await?
                .into_iter()
                .map(ShapeInstance::NoteTitle)
                .collect(),
            Shape::PersonNoteCount => {
                return Err(CoreError::UnsupportedShape(format!(
                    "shape '{shape}' is served by persons, not notes"
                ))
                .into());
            }
        };
        Ok(rows)
    }
}
