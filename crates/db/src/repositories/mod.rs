//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod note_repo;
pub mod person_repo;

pub use note_repo::NoteRepo;
pub use person_repo::PersonRepo;
