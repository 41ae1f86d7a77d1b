//! Query dispatch for persons with their notes.
//!
//! The caller picks a [`FetchMode`]; the dispatcher runs either one outer
//! join or the N+1 sequence and reports how many round trips it took.

use folio_core::entity::{Person, PersonWithNotes};
use folio_core::error::CoreError;
use folio_core::fetch::{collapse_left_join, FetchMode};
use folio_core::projection::Source;
use folio_core::types::DbId;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

use crate::{begin_read_only, DbError};
use crate::models::join::PersonNoteRow;
use crate::repositories::NoteRepo;

/// Which persons to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonFilter {
    ById(DbId),
    /// Inclusive on both ends.
    IdRange { from: DbId, to: DbId },
    FirstName(String),
}

impl PersonFilter {
    fn predicate(&self) -> &'static str {
        match self {
            PersonFilter::ById(_) => "p.id = $1",
            PersonFilter::IdRange { .. } => "p.id BETWEEN $1 AND $2",
            PersonFilter::FirstName(_) => "p.first_name = $1",
        }
    }

    fn bind<'q, O>(
        &'q self,
        query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        match self {
            PersonFilter::ById(id) => query.bind(*id),
            PersonFilter::IdRange { from, to } => query.bind(*from).bind(*to),
            PersonFilter::FirstName(name) => query.bind(name.as_str()),
        }
    }
}

/// Persons with their notes plus the number of queries it took to load them.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub persons: Vec<PersonWithNotes>,
    pub queries_issued: usize,
}

/// Loads persons together with their note collections.
pub struct PersonFetcher;

impl PersonFetcher {
    /// Load every person matching `filter` with its notes, ordered by ID.
    pub async fn fetch(
        pool: &PgPool,
        filter: &PersonFilter,
        mode: FetchMode,
    ) -> Result<FetchOutcome, DbError> {
        let outcome = match mode {
            FetchMode::Eager => Self::fetch_eager(pool, filter).await?,
            FetchMode::Lazy => Self::fetch_lazy(pool, filter).await?,
        };
        tracing::debug!(
            ?filter,
            %mode,
            persons = outcome.persons.len(),
            queries = outcome.queries_issued,
            "Loaded persons with notes"
        );
        Ok(outcome)
    }

    /// Load one person with its notes, or `None` if it does not exist.
    pub async fn fetch_one(
        pool: &PgPool,
        id: DbId,
        mode: FetchMode,
    ) -> Result<Option<PersonWithNotes>, DbError> {
        let outcome = Self::fetch(pool, &PersonFilter::ById(id), mode).await?;
        Ok(outcome.persons.into_iter().next())
    }

    /// One `persons LEFT JOIN notes` query. The outer join keeps persons
    /// without notes; the collapse removes the duplicated parent rows.
    async fn fetch_eager(pool: &PgPool, filter: &PersonFilter) -> Result<FetchOutcome, DbError> {
        let source = Source::PersonsWithNotes;
        let columns = source
            .fields()
            .iter()
            .map(|f| f.select_expr())
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "SELECT {columns} FROM {} WHERE {} ORDER BY p.id, n.id",
            source.from_clause(),
            filter.predicate()
        );

        let rows = filter
            .bind(sqlx::query_as::<_, PersonNoteRow>(&query))
            .fetch_all(pool)
            .await?;

        let persons = collapse_left_join(rows.into_iter().map(PersonNoteRow::split))
            .map_err(CoreError::from)?;

        Ok(FetchOutcome {
            persons,
            queries_issued: 1,
        })
    }

    /// One query for the persons, then one per person for its notes.
    ///
    /// All of them run in a single read-only snapshot.
    async fn fetch_lazy(pool: &PgPool, filter: &PersonFilter) -> Result<FetchOutcome, sqlx::Error> {
        let query = format!(
            "SELECT p.id, p.first_name, p.last_name, p.age FROM persons p WHERE {} ORDER BY p.id",
            filter.predicate()
        );

        let mut tx = begin_read_only(pool).await?;
        let parents = filter
            .bind(sqlx::query_as::<_, Person>(&query))
            .fetch_all(&mut *tx)
            .await?;

        if parents.len() > 1 {
            tracing::warn!(
                persons = parents.len(),
                queries = parents.len() + 1,
                "Lazy note loading issues one query per person; use eager fetch for lists"
            );
        }

        let mut persons = Vec::with_capacity(parents.len());
        for person in parents {
            let notes = NoteRepo::list_by_person(&mut *tx, person.id).await?;
            persons.push(PersonWithNotes { person, notes });
        }
        tx.commit().await?;

        let queries_issued = persons.len() + 1;
        Ok(FetchOutcome {
            persons,
            queries_issued,
        })
    }
}
