//! Person input DTOs.

use serde::Deserialize;

/// DTO for creating a new person.
#[derive(Debug, Deserialize)]
pub struct CreatePerson {
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i32>,
}
