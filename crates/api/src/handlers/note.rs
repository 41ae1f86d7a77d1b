//! Handlers for the `/notes` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use folio_core::entity::Note;
use folio_core::error::CoreError;
use folio_core::pagination::{Page, Slice};
use folio_core::projection::ShapeInstance;
use folio_core::types::DbId;
use folio_db::models::note::{AssignOwner, CreateNote};
use folio_db::repositories::{NoteRepo, PersonRepo};

use crate::error::{AppError, AppResult};
use crate::query::{PageParams, ShapeParams};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}

/// GET /api/v1/notes
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Page<Note>>> {
    let request = params.to_request(&state.config)?;
    let page = NoteRepo::page(&state.pool, &request).await?;
    Ok(Json(page))
}

/// GET /api/v1/notes/using-slice
pub async fn list_slice(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Slice<Note>>> {
    let request = params.to_request(&state.config)?;
    let slice = NoteRepo::slice(&state.pool, &request).await?;
    Ok(Json(slice))
}

/// GET /api/v1/notes/projections
pub async fn list_projected(
    State(state): State<AppState>,
    Query(params): Query<ShapeParams>,
) -> AppResult<Json<DataResponse<Vec<ShapeInstance>>>> {
    let shape = params.shape()?;
    let rows = NoteRepo::project(&state.pool, shape).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// POST /api/v1/notes
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateNote>,
) -> AppResult<(StatusCode, Json<Note>)> {
    if let Some(person_id) = input.person_id {
        if PersonRepo::find_by_id(&state.pool, person_id).await?.is_none() {
            return Err(not_found("Person", person_id));
        }
    }
    let note = NoteRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /api/v1/notes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Note>> {
    let note = NoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Note", id))?;
    Ok(Json(note))
}

/// PUT /api/v1/notes/{id}/owner
pub async fn assign_owner(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AssignOwner>,
) -> AppResult<Json<Note>> {
    if let Some(note) = NoteRepo::attach(&state.pool, id, input.person_id).await? {
        tracing::info!(note_id = id, person_id = input.person_id, "Note attached");
        return Ok(Json(note));
    }
    // Nothing was updated: report whichever side is missing.
    if NoteRepo::find_by_id(&state.pool, id).await?.is_none() {
        Err(not_found("Note", id))
    } else {
        Err(not_found("Person", input.person_id))
    }
}

/// DELETE /api/v1/notes/{id}/owner
pub async fn remove_owner(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Note>> {
    let note = NoteRepo::detach(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Note", id))?;
    tracing::info!(note_id = id, "Note detached");
    Ok(Json(note))
}
