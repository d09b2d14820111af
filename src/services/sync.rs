//! Broadcast router — command validation, persistence, canonical events.
//!
//! DESIGN
//! ======
//! Every accepted command follows the same pipeline: validate, persist via
//! the store, and hand back the store's canonical result as the event to
//! fan out (including to the sender, which reconciles it to the
//! authoritative value — events are idempotent to apply, so the echo is
//! deliberate). A rejected command never touches the store and never
//! produces a broadcast; the error goes to the originator alone.
//!
//! ORDERING
//! ========
//! The router holds no locks and keeps no versions. Strokes and note
//! mutations are serialized solely by the store's per-board write ordering;
//! concurrent updates to the same note resolve last-write-wins there.

use crate::protocol::{
    Command, DEFAULT_NOTE_COLOR, DEFAULT_NOTE_HEIGHT, DEFAULT_NOTE_WIDTH, Event, NoteDraft,
    NoteFields, NoteId, Stroke, WORLD_HEIGHT, WORLD_WIDTH,
};
use crate::store::{EventStore, StoreError};

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("{0}")]
    Validation(String),
    #[error("sticky note not found: {0}")]
    NoteNotFound(NoteId),
    #[error("store unavailable: {0}")]
    Store(StoreError),
}

impl SyncError {
    /// Grepable error code, mirrored onto the wire.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "E_VALIDATION",
            Self::NoteNotFound(_) => "E_NOTE_NOT_FOUND",
            Self::Store(_) => "E_STORE_UNAVAILABLE",
        }
    }

    /// Whether the originator may usefully resubmit the same command.
    /// The router itself never retries.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Store(_))
    }

    /// The error event sent to the originating session only.
    #[must_use]
    pub fn to_event(&self) -> Event {
        Event::Error { code: self.code().into(), message: self.to_string(), retryable: self.retryable() }
    }
}

impl From<StoreError> for SyncError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NoteNotFound(id) => Self::NoteNotFound(id),
            other => Self::Store(other),
        }
    }
}

// =============================================================================
// COMMAND PIPELINE
// =============================================================================

/// Validate a command, persist it, and return the canonical event to
/// broadcast to the board's subscribers.
///
/// # Errors
///
/// `Validation` for malformed payloads (nothing persisted), `NoteNotFound`
/// for an update targeting an unknown id (store unchanged), `Store` when
/// persistence fails (originator owns resubmission).
pub async fn apply_command(store: &dyn EventStore, board_id: &str, command: Command) -> Result<Event, SyncError> {
    match command {
        Command::Draw { stroke } => {
            let canonical = canonical_stroke(stroke)?;
            let stroke = store.append_stroke(board_id, &canonical).await?;
            Ok(Event::Draw { stroke })
        }
        Command::Clear => {
            store.clear_board(board_id).await?;
            Ok(Event::Clear)
        }
        Command::AddStickyNote { sticky_note } => {
            let fields = resolve_draft(sticky_note)?;
            let sticky_note = store.upsert_sticky_note(board_id, None, &fields).await?;
            Ok(Event::StickyNoteAdded { sticky_note })
        }
        Command::UpdateStickyNote { sticky_note } => {
            let id = sticky_note.id;
            let fields = canonical_note_fields(sticky_note.fields())?;
            let sticky_note = store.upsert_sticky_note(board_id, Some(id), &fields).await?;
            Ok(Event::StickyNoteUpdated { sticky_note })
        }
        Command::RemoveStickyNote { sticky_note_id } => {
            // Tolerant removal: an absent id is treated as already satisfied
            // and still produces the removal event, so clients holding stale
            // state converge instead of erroring.
            store.delete_sticky_note(board_id, sticky_note_id).await?;
            Ok(Event::StickyNoteRemoved { sticky_note_id })
        }
    }
}

// =============================================================================
// VALIDATION / CLAMPING
// =============================================================================

/// Validate a stroke and clamp both endpoints into world bounds.
///
/// # Errors
///
/// Returns `Validation` for non-finite coordinates, an empty color, or a
/// non-positive line width.
pub fn canonical_stroke(stroke: Stroke) -> Result<Stroke, SyncError> {
    for v in [stroke.x, stroke.y, stroke.prev_x, stroke.prev_y] {
        if !v.is_finite() {
            return Err(SyncError::Validation("stroke coordinates must be finite".into()));
        }
    }
    if stroke.color.is_empty() {
        return Err(SyncError::Validation("stroke color required".into()));
    }
    if stroke.line_width < 1 {
        return Err(SyncError::Validation("stroke lineWidth must be at least 1".into()));
    }

    Ok(Stroke {
        x: stroke.x.clamp(0.0, WORLD_WIDTH),
        y: stroke.y.clamp(0.0, WORLD_HEIGHT),
        prev_x: stroke.prev_x.clamp(0.0, WORLD_WIDTH),
        prev_y: stroke.prev_y.clamp(0.0, WORLD_HEIGHT),
        color: stroke.color,
        line_width: stroke.line_width,
    })
}

/// Fill creation-time defaults for omitted color/width/height, then apply
/// the shared note validation. Defaults never apply anywhere else.
///
/// # Errors
///
/// Returns `Validation` for non-finite coordinates or non-positive sizes.
pub fn resolve_draft(draft: NoteDraft) -> Result<NoteFields, SyncError> {
    canonical_note_fields(NoteFields {
        text: draft.text,
        x: draft.x,
        y: draft.y,
        color: draft.color.unwrap_or_else(|| DEFAULT_NOTE_COLOR.to_owned()),
        width: draft.width.unwrap_or(DEFAULT_NOTE_WIDTH),
        height: draft.height.unwrap_or(DEFAULT_NOTE_HEIGHT),
    })
}

/// Validate note fields and clamp the position so the whole note stays
/// inside the world.
///
/// # Errors
///
/// Returns `Validation` for non-finite coordinates, an empty color, or
/// non-positive dimensions.
pub fn canonical_note_fields(fields: NoteFields) -> Result<NoteFields, SyncError> {
    if !fields.x.is_finite() || !fields.y.is_finite() {
        return Err(SyncError::Validation("sticky note position must be finite".into()));
    }
    if fields.color.is_empty() {
        return Err(SyncError::Validation("sticky note color required".into()));
    }
    if fields.width < 1 || fields.height < 1 {
        return Err(SyncError::Validation("sticky note dimensions must be positive".into()));
    }

    let max_x = (WORLD_WIDTH - f64::from(fields.width)).max(0.0);
    let max_y = (WORLD_HEIGHT - f64::from(fields.height)).max(0.0);
    Ok(NoteFields {
        x: fields.x.clamp(0.0, max_x),
        y: fields.y.clamp(0.0, max_y),
        ..fields
    })
}

#[cfg(test)]
#[path = "sync_test.rs"]
mod tests;
