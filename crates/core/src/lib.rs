//! Domain logic for the folio persons/notes service.
//!
//! Everything here is pure: pagination arithmetic, sort resolution,
//! projection shapes, fetch modes and the in-memory person/note graph.
//! Storage and HTTP live in `folio-db` and `folio-api`.

pub mod entity;
pub mod error;
pub mod fetch;
pub mod graph;
pub mod pagination;
pub mod projection;
pub mod types;
