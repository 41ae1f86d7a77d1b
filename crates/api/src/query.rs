//! Shared query parameter types for API handlers.

use folio_core::error::CoreError;
use folio_core::fetch::FetchMode;
use folio_core::pagination::PageRequest;
use folio_core::projection::Shape;
use folio_core::types::DbId;
use serde::Deserialize;

use crate::config::ServerConfig;
use crate::error::AppError;

/// Pagination parameters (`?page=&size=&sort=title,desc`).
///
/// `page` is zero-based. A missing `size` takes the configured default and
/// larger sizes are clamped to the configured maximum.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort: Option<String>,
}

impl PageParams {
    pub fn to_request(&self, config: &ServerConfig) -> Result<PageRequest, CoreError> {
        PageRequest::from_params(
            self.page,
            self.size,
            self.sort.as_deref(),
            config.default_page_size,
            config.max_page_size,
        )
    }
}

/// Optional `?fetch=eager|lazy` flag, defaulting to eager.
#[derive(Debug, Default, Deserialize)]
pub struct FetchParams {
    pub fetch: Option<String>,
}

impl FetchParams {
    pub fn mode(&self) -> Result<FetchMode, AppError> {
        parse_fetch(self.fetch.as_deref())
    }
}

/// `?first_name=` alone, for listings that never load notes.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FirstNameOnlyParams {
    pub first_name: String,
}

/// `?first_name=` with an optional fetch flag.
#[derive(Debug, Deserialize)]
pub struct FirstNameParams {
    pub first_name: String,
    pub fetch: Option<String>,
}

impl FirstNameParams {
    pub fn mode(&self) -> Result<FetchMode, AppError> {
        parse_fetch(self.fetch.as_deref())
    }
}

/// `?from=&to=` (inclusive) with an optional fetch flag.
#[derive(Debug, Deserialize)]
pub struct IdRangeParams {
    pub from: DbId,
    pub to: DbId,
    pub fetch: Option<String>,
}

impl IdRangeParams {
    pub fn mode(&self) -> Result<FetchMode, AppError> {
        parse_fetch(self.fetch.as_deref())
    }
}

/// `?shape=entity|summary|title`, defaulting to `entity`.
#[derive(Debug, Default, Deserialize)]
pub struct ShapeParams {
    pub shape: Option<String>,
}

impl ShapeParams {
    pub fn shape(&self) -> Result<Shape, CoreError> {
        self.shape.as_deref().map_or(Ok(Shape::Entity), str::parse)
    }
}

fn parse_fetch(raw: Option<&str>) -> Result<FetchMode, AppError> {
    raw.map_or(Ok(FetchMode::default()), |s| {
        s.parse().map_err(AppError::BadRequest)
    })
}
