//! Route definitions for the `/notes` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::note;
use crate::state::AppState;

/// Routes mounted at `/notes`.
///
/// ```text
/// GET    /                 -> list (page with total count)
/// POST   /                 -> create
/// GET    /using-slice      -> list_slice
/// GET    /projections      -> list_projected
/// GET    /{id}             -> get_by_id
/// PUT    /{id}/owner       -> assign_owner
/// DELETE /{id}/owner       -> remove_owner
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(note::list).post(note::create))
        .route("/using-slice", get(note::list_slice))
        .route("/projections", get(note::list_projected))
        .route("/{id}", get(note::get_by_id))
        .route(
            "/{id}/owner",
            put(note::assign_owner).delete(note::remove_owner),
        )
}
