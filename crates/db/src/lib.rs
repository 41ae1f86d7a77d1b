//! PostgreSQL storage for persons and notes.
//!
//! Repositories are zero-sized structs with async methods taking `&PgPool`
//! (or any executor) as the first argument. [`dispatch`] decides how a
//! person's notes are loaded; [`paging`] runs the probe and count queries
//! behind slices and pages.

use folio_core::error::CoreError;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Postgres, Transaction};

pub mod dispatch;
pub mod models;
pub mod paging;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Errors from repository calls that validate their input before querying.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the bundled migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Open a read-only transaction with a single snapshot for every statement.
///
/// Under the default READ COMMITTED level each statement takes its own
/// snapshot, so a data query and its count query could disagree.
pub async fn begin_read_only(pool: &DbPool) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await?;
    Ok(tx)
}
