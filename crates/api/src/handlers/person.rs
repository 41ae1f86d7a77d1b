//! Handlers for the `/persons` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use folio_core::entity::{Note, Person, PersonWithNotes};
use folio_core::error::CoreError;
use folio_core::pagination::{Page, Slice};
use folio_core::projection::PersonNoteCount;
use folio_core::types::DbId;
use folio_db::dispatch::{PersonFetcher, PersonFilter};
use folio_db::models::note::{CreateNote, CreatePersonNote};
use folio_db::models::person::CreatePerson;
use folio_db::repositories::{NoteRepo, PersonRepo};

use crate::error::{AppError, AppResult};
use crate::query::{FetchParams, FirstNameOnlyParams, FirstNameParams, IdRangeParams, PageParams};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Person",
        id,
    })
}

/// GET /api/v1/persons
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Page<Person>>> {
    let request = params.to_request(&state.config)?;
    let page = PersonRepo::page(&state.pool, &request).await?;
    Ok(Json(page))
}

/// GET /api/v1/persons/using-slice
pub async fn list_slice(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Slice<Person>>> {
    let request = params.to_request(&state.config)?;
    let slice = PersonRepo::slice(&state.pool, &request).await?;
    Ok(Json(slice))
}

/// POST /api/v1/persons
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreatePerson>,
) -> AppResult<(StatusCode, Json<Person>)> {
    let person = PersonRepo::create(&state.pool, &input).await?;
    tracing::info!(person_id = person.id, "Person created");
    Ok((StatusCode::CREATED, Json(person)))
}

/// GET /api/v1/persons/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Person>> {
    let person = PersonRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(person))
}

/// DELETE /api/v1/persons/{id}
///
/// Owned notes are deleted with the person.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if PersonRepo::delete(&state.pool, id).await? {
        tracing::info!(person_id = id, "Person deleted with its notes");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// GET /api/v1/persons/{id}/with-notes
pub async fn get_with_notes(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<FetchParams>,
) -> AppResult<Json<PersonWithNotes>> {
    let person = PersonFetcher::fetch_one(&state.pool, id, params.mode()?)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(person))
}

/// POST /api/v1/persons/{id}/notes
pub async fn create_note(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreatePersonNote>,
) -> AppResult<(StatusCode, Json<Note>)> {
    if PersonRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(not_found(id));
    }
    let note = NoteRepo::create(
        &state.pool,
        &CreateNote {
            title: input.title,
            person_id: Some(id),
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /api/v1/persons/by-first-name
///
/// Persons only; notes are not loaded, so a `fetch` flag is rejected.
pub async fn list_by_first_name(
    State(state): State<AppState>,
    Query(params): Query<FirstNameOnlyParams>,
) -> AppResult<Json<DataResponse<Vec<Person>>>> {
    let persons = PersonRepo::list_by_first_name(&state.pool, &params.first_name).await?;
    Ok(Json(DataResponse { data: persons }))
}

/// GET /api/v1/persons/by-name
pub async fn list_by_name_with_notes(
    State(state): State<AppState>,
    Query(params): Query<FirstNameParams>,
) -> AppResult<Json<DataResponse<Vec<PersonWithNotes>>>> {
    let mode = params.mode()?;
    let filter = PersonFilter::FirstName(params.first_name);
    let outcome = PersonFetcher::fetch(&state.pool, &filter, mode).await?;
    Ok(Json(DataResponse {
        data: outcome.persons,
    }))
}

/// GET /api/v1/persons/by-id-range
pub async fn list_by_id_range(
    State(state): State<AppState>,
    Query(params): Query<IdRangeParams>,
) -> AppResult<Json<DataResponse<Vec<PersonWithNotes>>>> {
    let filter = PersonFilter::IdRange {
        from: params.from,
        to: params.to,
    };
    let outcome = PersonFetcher::fetch(&state.pool, &filter, params.mode()?).await?;
    Ok(Json(DataResponse {
        data: outcome.persons,
    }))
}

/// GET /api/v1/persons/with-notes-count
pub async fn list_with_note_count(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<PersonNoteCount>>>> {
    let counts = PersonRepo::list_with_note_count(&state.pool).await?;
    Ok(Json(DataResponse { data: counts }))
}
