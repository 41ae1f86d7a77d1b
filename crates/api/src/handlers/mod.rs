pub mod note;
pub mod person;
