//! Probe and count queries behind [`Slice`] and [`Page`].
//!
//! A [`Listing`] pins the select list, the `FROM` clause and the sortable
//! columns of one resource. The count query is derived from the same `FROM`
//! clause, so both queries always share one predicate.

use folio_core::pagination::{Page, PageRequest, Slice, SortableColumns};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgExecutor};

use crate::{begin_read_only, DbError, DbPool};

/// Static description of a pageable query.
#[derive(Debug, Clone, Copy)]
pub struct Listing {
    pub columns: &'static str,
    pub from: &'static str,
    pub sortable: SortableColumns,
}

impl Listing {
    fn probe_sql(&self, order_by: &str) -> String {
        format!(
            "SELECT {} FROM {} ORDER BY {order_by} LIMIT $1 OFFSET $2",
            self.columns, self.from
        )
    }

    fn count_sql(&self) -> String {
        format!("SELECT COUNT(*) FROM {}", self.from)
    }
}

async fn fetch_probe<'c, E, T>(
    executor: E,
    listing: &Listing,
    order_by: &str,
    request: &PageRequest,
) -> Result<Vec<T>, sqlx::Error>
where
    E: PgExecutor<'c>,
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let query = listing.probe_sql(order_by);
    sqlx::query_as::<_, T>(&query)
        .bind(request.probe_limit())
        .bind(request.offset())
        .fetch_all(executor)
        .await
}

/// Bounded-slice mode: one query with `LIMIT size + 1`, no count.
pub async fn fetch_slice<T>(
    pool: &DbPool,
    listing: &Listing,
    request: &PageRequest,
) -> Result<Slice<T>, DbError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let order_by = listing.sortable.order_by(request.sort())?;
    let rows = fetch_probe(pool, listing, &order_by, request).await?;
    let slice = Slice::from_probe(rows, request);
    tracing::debug!(
        from = listing.from,
        page = slice.page,
        size = slice.size,
        has_next = slice.has_next,
        "Fetched slice"
    );
    Ok(slice)
}

/// Total-count mode: the probe query plus `COUNT(*)` over the same `FROM`,
/// both inside one read-only snapshot.
pub async fn fetch_page<T>(
    pool: &DbPool,
    listing: &Listing,
    request: &PageRequest,
) -> Result<Page<T>, DbError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let order_by = listing.sortable.order_by(request.sort())?;

    let count_query = listing.count_sql();

    let mut tx = begin_read_only(pool).await?;
    let rows = fetch_probe(&mut *tx, listing, &order_by, request).await?;
    let total: i64 = sqlx::query_scalar(&count_query)
        .fetch_one(&mut *tx)
        .await?;
    tx.commit().await?;

    let page = Page::from_probe(rows, request, total);
    tracing::debug!(
        from = listing.from,
        page = page.page,
        size = page.size,
        total_elements = page.total_elements,
        "Fetched page"
    );
    Ok(page)
}
