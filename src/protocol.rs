//! Wire protocol — commands, events, and board constants.
//!
//! DESIGN
//! ======
//! Every message crossing the realtime surface is one of two internally
//! tagged enums: `Command` (client → server) and `Event` (server → client).
//! Replay and live broadcast share the same `Event` shapes, so a client
//! applies both through a single code path.
//!
//! Field casing is part of the contract: strokes travel camelCase
//! (`prevX`, `lineWidth`), sticky notes and envelopes snake_case.

use serde::{Deserialize, Serialize};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Board id used when a client omits one on either surface.
pub const DEFAULT_BOARD_ID: &str = "default";

/// Bounded world space: positions live in `[0, WORLD_WIDTH] x [0, WORLD_HEIGHT]`.
pub const WORLD_WIDTH: f64 = 5000.0;
pub const WORLD_HEIGHT: f64 = 5000.0;

/// Sticky-note defaults, applied exactly once at creation.
pub const DEFAULT_NOTE_COLOR: &str = "#ffeb3b";
pub const DEFAULT_NOTE_WIDTH: i32 = 200;
pub const DEFAULT_NOTE_HEIGHT: i32 = 150;

/// Store-assigned sticky note identifier, unique within a board.
pub type NoteId = i64;

// =============================================================================
// STROKE
// =============================================================================

/// One freehand line segment in world coordinates. Immutable once accepted;
/// removed only by a whole-board clear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub x: f64,
    pub y: f64,
    pub prev_x: f64,
    pub prev_y: f64,
    pub color: String,
    pub line_width: i32,
}

// =============================================================================
// STICKY NOTES
// =============================================================================

/// A persisted sticky note. Updates replace every editable field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickyNote {
    pub id: NoteId,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub color: String,
    pub width: i32,
    pub height: i32,
}

impl StickyNote {
    /// Attach a store-assigned id to resolved note fields.
    #[must_use]
    pub fn from_fields(id: NoteId, fields: NoteFields) -> Self {
        Self {
            id,
            text: fields.text,
            x: fields.x,
            y: fields.y,
            color: fields.color,
            width: fields.width,
            height: fields.height,
        }
    }

    /// The editable fields, without the id.
    #[must_use]
    pub fn fields(&self) -> NoteFields {
        NoteFields {
            text: self.text.clone(),
            x: self.x,
            y: self.y,
            color: self.color.clone(),
            width: self.width,
            height: self.height,
        }
    }
}

/// Inbound sticky-note creation payload. Color and dimensions are optional
/// here and only here; the router fills defaults before persisting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteDraft {
    pub text: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
}

/// Fully resolved note fields as handed to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteFields {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub color: String,
    pub width: i32,
    pub height: i32,
}

// =============================================================================
// COMMANDS (client -> server)
// =============================================================================

/// Inbound command. `update_sticky_note` carries a full `StickyNote`:
/// omitting any field there is malformed, never defaulted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Draw { stroke: Stroke },
    Clear,
    AddStickyNote { sticky_note: NoteDraft },
    UpdateStickyNote { sticky_note: StickyNote },
    RemoveStickyNote { sticky_note_id: NoteId },
}

// =============================================================================
// EVENTS (server -> client)
// =============================================================================

/// Outbound event. The first five variants are broadcast to every session
/// subscribed to the board and are also the replay vocabulary. `Error` is
/// only ever sent to the originating session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Draw { stroke: Stroke },
    Clear,
    StickyNoteAdded { sticky_note: StickyNote },
    StickyNoteUpdated { sticky_note: StickyNote },
    StickyNoteRemoved { sticky_note_id: NoteId },
    Error { code: String, message: String, retryable: bool },
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stroke() -> Stroke {
        Stroke { x: 10.0, y: 20.0, prev_x: 5.0, prev_y: 15.0, color: "#000000".into(), line_width: 2 }
    }

    #[test]
    fn stroke_wire_shape_is_camel_case() {
        let value = serde_json::to_value(stroke()).unwrap();
        assert_eq!(
            value,
            json!({"x": 10.0, "y": 20.0, "prevX": 5.0, "prevY": 15.0, "color": "#000000", "lineWidth": 2})
        );
    }

    #[test]
    fn draw_command_round_trip() {
        let text = r##"{"type":"draw","stroke":{"x":1.0,"y":2.0,"prevX":0.0,"prevY":0.0,"color":"#f00","lineWidth":3}}"##;
        let cmd: Command = serde_json::from_str(text).unwrap();
        let Command::Draw { stroke } = cmd else {
            panic!("expected draw");
        };
        assert_eq!(stroke.color, "#f00");
        assert_eq!(stroke.line_width, 3);
    }

    #[test]
    fn clear_command_has_no_payload() {
        let cmd: Command = serde_json::from_str(r#"{"type":"clear"}"#).unwrap();
        assert!(matches!(cmd, Command::Clear));
        assert_eq!(serde_json::to_value(Command::Clear).unwrap(), json!({"type": "clear"}));
    }

    #[test]
    fn add_command_accepts_omitted_defaults() {
        let text = r#"{"type":"add_sticky_note","sticky_note":{"text":"","x":100.0,"y":200.0}}"#;
        let cmd: Command = serde_json::from_str(text).unwrap();
        let Command::AddStickyNote { sticky_note } = cmd else {
            panic!("expected add_sticky_note");
        };
        assert_eq!(sticky_note.text, "");
        assert!(sticky_note.color.is_none());
        assert!(sticky_note.width.is_none());
        assert!(sticky_note.height.is_none());
    }

    #[test]
    fn add_command_requires_text_field() {
        let text = r#"{"type":"add_sticky_note","sticky_note":{"x":100.0,"y":200.0}}"#;
        assert!(serde_json::from_str::<Command>(text).is_err());
    }

    #[test]
    fn update_command_rejects_omitted_fields() {
        // Full-field replace: a missing width is malformed, not defaulted.
        let text = r##"{"type":"update_sticky_note","sticky_note":{"id":1,"text":"hi","x":0.0,"y":0.0,"color":"#fff","height":150}}"##;
        assert!(serde_json::from_str::<Command>(text).is_err());
    }

    #[test]
    fn remove_command_round_trip() {
        let cmd: Command = serde_json::from_str(r#"{"type":"remove_sticky_note","sticky_note_id":7}"#).unwrap();
        assert!(matches!(cmd, Command::RemoveStickyNote { sticky_note_id: 7 }));
    }

    #[test]
    fn event_wire_shapes() {
        let note = StickyNote {
            id: 3,
            text: "todo".into(),
            x: 50.0,
            y: 60.0,
            color: DEFAULT_NOTE_COLOR.into(),
            width: DEFAULT_NOTE_WIDTH,
            height: DEFAULT_NOTE_HEIGHT,
        };
        let added = serde_json::to_value(Event::StickyNoteAdded { sticky_note: note.clone() }).unwrap();
        assert_eq!(added["type"], "sticky_note_added");
        assert_eq!(added["sticky_note"]["id"], 3);
        assert_eq!(added["sticky_note"]["color"], "#ffeb3b");

        let removed = serde_json::to_value(Event::StickyNoteRemoved { sticky_note_id: 3 }).unwrap();
        assert_eq!(removed, json!({"type": "sticky_note_removed", "sticky_note_id": 3}));

        let draw = serde_json::to_value(Event::Draw { stroke: stroke() }).unwrap();
        assert_eq!(draw["type"], "draw");
        assert_eq!(draw["stroke"]["prevX"], 5.0);
    }

    #[test]
    fn note_fields_round_trip_through_id() {
        let fields = NoteFields {
            text: "a".into(),
            x: 1.0,
            y: 2.0,
            color: "#fff".into(),
            width: 10,
            height: 20,
        };
        let note = StickyNote::from_fields(9, fields.clone());
        assert_eq!(note.id, 9);
        assert_eq!(note.fields(), fields);
    }
}
