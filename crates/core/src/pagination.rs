//! Page requests, sort resolution and the two pagination result shapes.
//!
//! Both shapes are built from a *probe* query that asks for `size + 1` rows:
//!
//! - [`Slice`] only reports whether another page exists. The extra row is the
//!   signal; no count query is issued.
//! - [`Page`] additionally carries the total element count, which the caller
//!   obtains with a separate `COUNT(*)` over the same predicate.
//!
//! Sort fields coming from the request are never interpolated into SQL. They
//! are resolved through a [`SortableColumns`] whitelist that maps public names
//! to column expressions.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Page size used when the request does not specify one.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Largest page size a request may ask for; larger values are clamped.
pub const MAX_PAGE_SIZE: i64 = 100;

// ---------------------------------------------------------------------------
// Sort
// ---------------------------------------------------------------------------

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// A requested sort: public field name plus direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: Direction,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Desc,
        }
    }

    /// Parse `field` or `field,asc` / `field,desc` (case-insensitive direction).
    ///
    /// The field name itself is not checked here; that happens when the sort
    /// is resolved against a [`SortableColumns`] whitelist.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let mut parts = raw.split(',').map(str::trim);
        let field = parts.next().unwrap_or_default();
        if field.is_empty() {
            return Err(CoreError::InvalidSortField(raw.to_string()));
        }

        let direction = match parts.next() {
            None => Direction::Asc,
            Some(d) if d.eq_ignore_ascii_case("asc") => Direction::Asc,
            Some(d) if d.eq_ignore_ascii_case("desc") => Direction::Desc,
            Some(_) => return Err(CoreError::InvalidSortField(raw.to_string())),
        };

        if parts.next().is_some() {
            return Err(CoreError::InvalidSortField(raw.to_string()));
        }

        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}

/// Whitelist of sortable fields for one resource.
///
/// Each entry maps the public field name to the SQL expression used in
/// `ORDER BY`. The `tiebreaker` column is appended to every ordering so that
/// offset pagination is deterministic when the sort key has duplicates.
#[derive(Debug, Clone, Copy)]
pub struct SortableColumns {
    columns: &'static [(&'static str, &'static str)],
    tiebreaker: &'static str,
}

impl SortableColumns {
    pub const fn new(
        columns: &'static [(&'static str, &'static str)],
        tiebreaker: &'static str,
    ) -> Self {
        Self {
            columns,
            tiebreaker,
        }
    }

    /// Public names accepted by this whitelist.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|(name, _)| *name)
    }

    /// Look up the column expression for a public field name.
    pub fn column(&self, field: &str) -> Option<&'static str> {
        self.columns
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
    }

    /// Build the body of an `ORDER BY` clause (without the keywords).
    ///
    /// Fails with [`CoreError::InvalidSortField`] when the field is not in
    /// the whitelist.
    pub fn order_by(&self, sort: Option<&Sort>) -> Result<String, CoreError> {
        let Some(sort) = sort else {
            return Ok(format!("{} ASC", self.tiebreaker));
        };

        let column = self.column(&sort.field).ok_or_else(|| {
            CoreError::InvalidSortField(format!(
                "'{}' (sortable fields: {})",
                sort.field,
                self.field_names().collect::<Vec<_>>().join(", ")
            ))
        })?;

        if column == self.tiebreaker {
            Ok(format!("{column} {}", sort.direction.as_sql()))
        } else {
            Ok(format!(
                "{column} {}, {} ASC",
                sort.direction.as_sql(),
                self.tiebreaker
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// Page request
// ---------------------------------------------------------------------------

/// A validated request for one page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    size: i64,
    sort: Option<Sort>,
}

impl PageRequest {
    /// Create a request. A size below 1 is rejected; a negative page index is
    /// treated as the first page.
    pub fn new(page: i64, size: i64, sort: Option<Sort>) -> Result<Self, CoreError> {
        if size < 1 {
            return Err(CoreError::InvalidPageSize(size));
        }
        Ok(Self {
            page: page.max(0),
            size,
            sort,
        })
    }

    /// Build a request from raw query parameters.
    ///
    /// A missing size takes `default_size`; sizes above `max_size` are clamped.
    pub fn from_params(
        page: Option<i64>,
        size: Option<i64>,
        sort: Option<&str>,
        default_size: i64,
        max_size: i64,
    ) -> Result<Self, CoreError> {
        let size = match size {
            Some(s) if s < 1 => return Err(CoreError::InvalidPageSize(s)),
            Some(s) => s.min(max_size),
            None => default_size,
        };
        let sort = sort
            .filter(|s| !s.trim().is_empty())
            .map(Sort::parse)
            .transpose()?;
        Self::new(page.unwrap_or(0), size, sort)
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    /// Row offset of the first element on this page.
    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }

    /// `LIMIT` for the probe query: one row more than the page holds.
    pub fn probe_limit(&self) -> i64 {
        self.size.saturating_add(1)
    }
}

// ---------------------------------------------------------------------------
// Result shapes
// ---------------------------------------------------------------------------

/// A window of results that only knows whether more data follows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice<T> {
    pub content: Vec<T>,
    pub page: i64,
    pub size: i64,
    pub number_of_elements: usize,
    pub has_next: bool,
}

impl<T> Slice<T> {
    /// Build a slice from the rows returned by a probe query.
    ///
    /// `rows` may hold up to `size + 1` entries; the surplus row, if present,
    /// is dropped and recorded as `has_next`.
    pub fn from_probe(mut rows: Vec<T>, request: &PageRequest) -> Self {
        let size = usize::try_from(request.size()).unwrap_or(usize::MAX);
        let has_next = rows.len() > size;
        rows.truncate(size);
        Self {
            number_of_elements: rows.len(),
            content: rows,
            page: request.page(),
            size: request.size(),
            has_next,
        }
    }
}

/// A window of results together with the total element and page counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: i64,
    pub size: i64,
    pub number_of_elements: usize,
    pub total_elements: i64,
    pub total_pages: i64,
    pub has_next: bool,
}

impl<T> Page<T> {
    /// Combine a probe result with the total count from a separate count query.
    pub fn from_probe(rows: Vec<T>, request: &PageRequest, total_elements: i64) -> Self {
        let slice = Slice::from_probe(rows, request);
        let total_elements = total_elements.max(0);
        let total_pages = total_pages(total_elements, slice.size);
        Self {
            content: slice.content,
            page: slice.page,
            size: slice.size,
            number_of_elements: slice.number_of_elements,
            total_elements,
            total_pages,
            has_next: slice.page < total_pages - 1,
        }
    }
}

/// `ceil(total / size)`; zero elements means zero pages.
pub fn total_pages(total_elements: i64, size: i64) -> i64 {
    if total_elements <= 0 || size <= 0 {
        return 0;
    }
    total_elements / size + i64::from(total_elements % size != 0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
