//! Batch record routes — offline REST access to board history.
//!
//! DESIGN
//! ======
//! This surface reads and writes the same `EventStore` as the realtime
//! gateway, with the same board-id defaulting and the same validation,
//! default-filling, and clamping rules from the sync router, so the two
//! surfaces cannot diverge. It never broadcasts: connected sessions learn
//! about REST writes only through their next replay.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::protocol::{NoteDraft, NoteFields, NoteId, StickyNote, Stroke};
use crate::services::{sync, topic};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BoardQuery {
    pub board_id: Option<String>,
}

impl BoardQuery {
    fn resolve(&self) -> String {
        topic::resolve(self.board_id.as_deref())
    }
}

/// Full-replace update body: every editable field is required, exactly as
/// on the realtime surface.
#[derive(Debug, Deserialize)]
pub struct UpdateNoteBody {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub color: String,
    pub width: i32,
    pub height: i32,
}

impl UpdateNoteBody {
    fn into_fields(self) -> NoteFields {
        NoteFields {
            text: self.text,
            x: self.x,
            y: self.y,
            color: self.color,
            width: self.width,
            height: self.height,
        }
    }
}

// =============================================================================
// STROKES
// =============================================================================

/// `GET /api/strokes` — all strokes for the board, in acceptance order.
pub async fn list_strokes(
    State(state): State<AppState>,
    Query(query): Query<BoardQuery>,
) -> Result<Json<Vec<Stroke>>, StatusCode> {
    let strokes = state
        .store
        .list_strokes(&query.resolve())
        .await
        .map_err(|e| sync_error_to_status(&e.into()))?;
    Ok(Json(strokes))
}

/// `POST /api/strokes` — append one validated stroke.
pub async fn create_stroke(
    State(state): State<AppState>,
    Query(query): Query<BoardQuery>,
    Json(stroke): Json<Stroke>,
) -> Result<(StatusCode, Json<Stroke>), StatusCode> {
    let canonical = sync::canonical_stroke(stroke).map_err(|e| sync_error_to_status(&e))?;
    let stroke = state
        .store
        .append_stroke(&query.resolve(), &canonical)
        .await
        .map_err(|e| sync_error_to_status(&e.into()))?;
    Ok((StatusCode::CREATED, Json(stroke)))
}

// =============================================================================
// STICKY NOTES
// =============================================================================

/// `GET /api/sticky_notes` — all notes for the board, in creation order.
pub async fn list_sticky_notes(
    State(state): State<AppState>,
    Query(query): Query<BoardQuery>,
) -> Result<Json<Vec<StickyNote>>, StatusCode> {
    let notes = state
        .store
        .list_sticky_notes(&query.resolve())
        .await
        .map_err(|e| sync_error_to_status(&e.into()))?;
    Ok(Json(notes))
}

/// `POST /api/sticky_notes` — create a note, filling creation defaults.
pub async fn create_sticky_note(
    State(state): State<AppState>,
    Query(query): Query<BoardQuery>,
    Json(draft): Json<NoteDraft>,
) -> Result<(StatusCode, Json<StickyNote>), StatusCode> {
    let fields = sync::resolve_draft(draft).map_err(|e| sync_error_to_status(&e))?;
    let note = state
        .store
        .upsert_sticky_note(&query.resolve(), None, &fields)
        .await
        .map_err(|e| sync_error_to_status(&e.into()))?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// `PATCH /api/sticky_notes/{id}` — full-field replace; 404 on unknown id.
pub async fn update_sticky_note(
    State(state): State<AppState>,
    Path(id): Path<NoteId>,
    Query(query): Query<BoardQuery>,
    Json(body): Json<UpdateNoteBody>,
) -> Result<Json<StickyNote>, StatusCode> {
    let fields = sync::canonical_note_fields(body.into_fields()).map_err(|e| sync_error_to_status(&e))?;
    let note = state
        .store
        .upsert_sticky_note(&query.resolve(), Some(id), &fields)
        .await
        .map_err(|e| sync_error_to_status(&e.into()))?;
    Ok(Json(note))
}

/// `DELETE /api/sticky_notes/{id}` — idempotent delete; 204 either way.
pub async fn delete_sticky_note(
    State(state): State<AppState>,
    Path(id): Path<NoteId>,
    Query(query): Query<BoardQuery>,
) -> Result<StatusCode, StatusCode> {
    state
        .store
        .delete_sticky_note(&query.resolve(), id)
        .await
        .map_err(|e| sync_error_to_status(&e.into()))?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// BOARD
// =============================================================================

/// `DELETE /api/board` — atomically clear the board's strokes and notes.
pub async fn clear_board(
    State(state): State<AppState>,
    Query(query): Query<BoardQuery>,
) -> Result<StatusCode, StatusCode> {
    state
        .store
        .clear_board(&query.resolve())
        .await
        .map_err(|e| sync_error_to_status(&e.into()))?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// HELPERS
// =============================================================================

fn sync_error_to_status(err: &sync::SyncError) -> StatusCode {
    match err {
        sync::SyncError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        sync::SyncError::NoteNotFound(_) => StatusCode::NOT_FOUND,
        sync::SyncError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

// =============================================================================
// TESTS
// =============================================================================
