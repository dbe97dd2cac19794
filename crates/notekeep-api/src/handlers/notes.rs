//! Note HTTP handlers.
//!
//! Each handler performs a single store call, except list and search which
//! count the matching notes first and then fetch the requested page. The two
//! calls are not atomic, so under concurrent writes `pagination.total` may
//! disagree with the page contents.

use std::time::Instant;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use notekeep_core::{paginate, NewNote, NoteFilter, NoteId, NotePatch};
use tracing::{debug, info};

use crate::envelope::{MessageEnvelope, NoteEnvelope, NotePageEnvelope};
use crate::error::{ApiError, NoteOp};
use crate::query_types::{ListNotesQuery, NoteBody, SearchNotesQuery};
use crate::AppState;

pub const MISSING_SEARCH_QUERY: &str = "Search query parameter is required";
pub const MISSING_CREATE_FIELDS: &str = "Please provide both title and content for the note";
pub const MISSING_UPDATE_FIELDS: &str = "Please provide title or content to update";
pub const NOTE_DELETED: &str = "Note deleted successfully";

fn malformed(op: NoteOp, detail: String) -> ApiError {
    ApiError::BadRequest {
        message: op.failure_message(),
        detail: Some(detail),
    }
}

fn parse_id(state: &AppState, op: NoteOp, raw: &str) -> Result<NoteId, ApiError> {
    NoteId::parse(raw).map_err(|e| state.fail(op, e))
}

/// Count, paginate, then fetch one page of notes matching `filter`.
async fn fetch_page(
    state: &AppState,
    op: NoteOp,
    filter: NoteFilter,
    page: Option<&str>,
    limit: Option<&str>,
) -> Result<Json<NotePageEnvelope>, ApiError> {
    let start = Instant::now();

    let total = state
        .notes
        .count(&filter)
        .await
        .map_err(|e| state.fail(op, e))?;
    let window = paginate(page, limit, total);
    let notes = state
        .notes
        .list(&filter, window.skip, window.limit)
        .await
        .map_err(|e| state.fail(op, e))?;

    debug!(
        subsystem = "api",
        component = "notes",
        op = op.as_str(),
        query = filter.query().unwrap_or(""),
        total,
        page = window.pagination.current_page,
        result_count = notes.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Served note page"
    );

    Ok(Json(NotePageEnvelope::new(notes, window.pagination)))
}

/// List notes, newest first.
///
/// # Query Parameters
/// - `page`: 1-based page number (default 1)
/// - `limit`: notes per page (default 10)
///
/// # Returns
/// - 200 OK with a page of notes and pagination metadata
/// - 500 Internal Server Error if the store fails
pub async fn list_notes(
    State(state): State<AppState>,
    query: Result<Query<ListNotesQuery>, QueryRejection>,
) -> Result<Json<NotePageEnvelope>, ApiError> {
    let Query(query) = query.map_err(|e| malformed(NoteOp::List, e.body_text()))?;
    fetch_page(
        &state,
        NoteOp::List,
        NoteFilter::All,
        query.page.as_deref(),
        query.limit.as_deref(),
    )
    .await
}

/// Search notes by case-insensitive substring over title and content.
///
/// # Query Parameters
/// - `query`: text to look for (required, non-empty)
/// - `page`, `limit`: as for [`list_notes`]
///
/// # Returns
/// - 200 OK with a page of matching notes
/// - 400 Bad Request if `query` is missing
/// - 500 Internal Server Error if the store fails
pub async fn search_notes(
    State(state): State<AppState>,
    query: Result<Query<SearchNotesQuery>, QueryRejection>,
) -> Result<Json<NotePageEnvelope>, ApiError> {
    let Query(query) = query.map_err(|e| malformed(NoteOp::Search, e.body_text()))?;
    let Some(text) = query.query.filter(|q| !q.is_empty()) else {
        return Err(ApiError::bad_request(MISSING_SEARCH_QUERY));
    };

    fetch_page(
        &state,
        NoteOp::Search,
        NoteFilter::contains(text),
        query.page.as_deref(),
        query.limit.as_deref(),
    )
    .await
}

/// Get a single note.
///
/// # Returns
/// - 200 OK with the note
/// - 400 Bad Request if the id is malformed
/// - 404 Not Found if no note has the id
/// - 500 Internal Server Error if the store fails
pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<NoteEnvelope>, ApiError> {
    let id = parse_id(&state, NoteOp::Get, &id)?;
    let note = state
        .notes
        .fetch(id)
        .await
        .map_err(|e| state.fail(NoteOp::Get, e))?;
    Ok(Json(NoteEnvelope::new(note)))
}

/// Create a note.
///
/// # Request Body
/// `{"title": string, "content": string}`, both required
///
/// # Returns
/// - 201 Created with the stored note
/// - 400 Bad Request if a field is missing, fails validation, or the store
///   rejects the write
pub async fn create_note(
    State(state): State<AppState>,
    body: Result<Json<NoteBody>, JsonRejection>,
) -> Result<(StatusCode, Json<NoteEnvelope>), ApiError> {
    let Json(body) = body.map_err(|e| malformed(NoteOp::Create, e.body_text()))?;
    let (Some(title), Some(content)) = (body.given_title(), body.given_content()) else {
        return Err(ApiError::bad_request(MISSING_CREATE_FIELDS));
    };

    let new_note =
        NewNote::new(Some(title), Some(content)).map_err(|e| state.fail(NoteOp::Create, e.into()))?;
    let note = state
        .notes
        .insert(new_note)
        .await
        .map_err(|e| state.fail(NoteOp::Create, e))?;

    info!(
        subsystem = "api",
        component = "notes",
        op = "create",
        note_id = %note.id,
        "Note created"
    );
    Ok((StatusCode::CREATED, Json(NoteEnvelope::new(note))))
}

/// Update a note's title and/or content.
///
/// # Request Body
/// `{"title"?: string, "content"?: string}`, at least one required
///
/// # Returns
/// - 200 OK with the updated note
/// - 400 Bad Request if neither field is given, the id is malformed, or
///   validation fails
/// - 404 Not Found if no note has the id
pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<NoteBody>, JsonRejection>,
) -> Result<Json<NoteEnvelope>, ApiError> {
    let Json(body) = body.map_err(|e| malformed(NoteOp::Update, e.body_text()))?;
    if body.given_title().is_none() && body.given_content().is_none() {
        return Err(ApiError::bad_request(MISSING_UPDATE_FIELDS));
    }

    let id = parse_id(&state, NoteOp::Update, &id)?;
    let patch = NotePatch::new(body.title.as_deref(), body.content.as_deref())
        .map_err(|e| state.fail(NoteOp::Update, e.into()))?;
    let note = state
        .notes
        .update(id, patch)
        .await
        .map_err(|e| state.fail(NoteOp::Update, e))?;

    info!(
        subsystem = "api",
        component = "notes",
        op = "update",
        note_id = %note.id,
        "Note updated"
    );
    Ok(Json(NoteEnvelope::new(note)))
}

/// Permanently delete a note.
///
/// # Returns
/// - 200 OK with a confirmation message
/// - 400 Bad Request if the id is malformed
/// - 404 Not Found if no note has the id
/// - 500 Internal Server Error if the store fails
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageEnvelope>, ApiError> {
    let id = parse_id(&state, NoteOp::Delete, &id)?;
    state
        .notes
        .delete(id)
        .await
        .map_err(|e| state.fail(NoteOp::Delete, e))?;

    info!(
        subsystem = "api",
        component = "notes",
        op = "delete",
        note_id = %id,
        "Note deleted"
    );
    Ok(Json(MessageEnvelope::new(NOTE_DELETED)))
}
