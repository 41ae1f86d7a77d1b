//! Input DTOs and join-row types.
//!
//! Plain table rows (`Person`, `Note`) and projection outputs live in
//! `folio_core` so the pure layer can work with them; this module holds what
//! only storage needs.

pub mod join;
pub mod note;
pub mod person;
