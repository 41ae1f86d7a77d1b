//! Route definitions for the `/persons` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::person;
use crate::state::AppState;

/// Routes mounted at `/persons`.
///
/// ```text
/// GET    /                     -> list (page with total count)
/// POST   /                     -> create
/// GET    /using-slice          -> list_slice
/// GET    /by-first-name        -> list_by_first_name
/// GET    /by-name              -> list_by_name_with_notes
/// GET    /by-id-range          -> list_by_id_range
/// GET    /with-notes-count     -> list_with_note_count
/// GET    /{id}                 -> get_by_id
/// DELETE /{id}                 -> delete
/// GET    /{id}/with-notes      -> get_with_notes
/// POST   /{id}/notes           -> create_note
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(person::list).post(person::create))
        .route("/using-slice", get(person::list_slice))
        .route("/by-first-name", get(person::list_by_first_name))
        .route("/by-name", get(person::list_by_name_with_notes))
        .route("/by-id-range", get(person::list_by_id_range))
        .route("/with-notes-count", get(person::list_with_note_count))
        .route("/{id}", get(person::get_by_id).delete(person::delete))
        .route("/{id}/with-notes", get(person::get_with_notes))
        .route("/{id}/notes", post(person::create_note))
}
