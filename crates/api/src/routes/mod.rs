pub mod health;
pub mod note;
pub mod person;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /persons/...     see [`person::router`]
/// /notes/...       see [`note::router`]
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/persons", person::router())
        .nest("/notes", note::router())
}
