//! Drag/edit batching — one update command per gesture.
//!
//! DESIGN
//! ======
//! While a note is being dragged or its text edited, every intermediate
//! value lives in this unsynced shadow; peers see nothing until the gesture
//! ends. `finish` consumes the gesture and yields exactly one
//! `update_sticky_note` command regardless of pointer or keystroke
//! frequency — the system's only deliberate network-volume reduction.
//! Dropping the gesture (escape, disconnect) flushes nothing.

use crate::protocol::{Command, StickyNote, WORLD_HEIGHT, WORLD_WIDTH};
use crate::view::viewport::Point;

/// Unsynced shadow of a note under an active drag or text edit.
pub struct NoteGesture {
    shadow: StickyNote,
}

impl NoteGesture {
    /// Begin a gesture from the note's last synchronized state.
    #[must_use]
    pub fn begin(note: StickyNote) -> Self {
        Self { shadow: note }
    }

    /// Move the shadow to a world position, clamped so the whole note stays
    /// inside the world. Local only; nothing is emitted.
    pub fn move_to(&mut self, world: Point) {
        let max_x = (WORLD_WIDTH - f64::from(self.shadow.width)).max(0.0);
        let max_y = (WORLD_HEIGHT - f64::from(self.shadow.height)).max(0.0);
        self.shadow.x = world.x.clamp(0.0, max_x);
        self.shadow.y = world.y.clamp(0.0, max_y);
    }

    /// Replace the shadow text. Local only; nothing is emitted.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.shadow.text = text.into();
    }

    /// Current shadow state, for rendering the in-flight note.
    #[must_use]
    pub fn preview(&self) -> &StickyNote {
        &self.shadow
    }

    /// End the gesture (pointer release, focus loss, explicit confirm):
    /// the single update command carrying the final shadow state.
    #[must_use]
    pub fn finish(self) -> Command {
        Command::UpdateStickyNote { sticky_note: self.shadow }
    }
}
