//! Local board model — the reconciliation target for replay and broadcast.
//!
//! DESIGN
//! ======
//! One instance per viewer. Replay and live events flow through the same
//! `apply`, which is idempotent for note mutations (upsert/remove by id)
//! and tolerant of out-of-order delivery: an update for an unknown note
//! creates it rather than being dropped. Strokes are never deduplicated
//! because the protocol never re-sends one outside of a full replay into a
//! fresh model.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use std::collections::HashMap;

use crate::protocol::{Event, NoteId, StickyNote, Stroke};

/// In-memory reflection of one board as seen by a single session.
#[derive(Default)]
pub struct BoardModel {
    strokes: Vec<Stroke>,
    notes: HashMap<NoteId, StickyNote>,
}

impl BoardModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one inbound event. Error notices are addressed to the command
    /// sender, not the model, and change nothing here.
    pub fn apply(&mut self, event: &Event) {
        match event {
            Event::Draw { stroke } => self.strokes.push(stroke.clone()),
            Event::Clear => {
                self.strokes.clear();
                self.notes.clear();
            }
            Event::StickyNoteAdded { sticky_note } | Event::StickyNoteUpdated { sticky_note } => {
                self.notes.insert(sticky_note.id, sticky_note.clone());
            }
            Event::StickyNoteRemoved { sticky_note_id } => {
                self.notes.remove(sticky_note_id);
            }
            Event::Error { .. } => {}
        }
    }

    /// All strokes in arrival order (replay order, then live order).
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Look up a note by id.
    #[must_use]
    pub fn note(&self, id: NoteId) -> Option<&StickyNote> {
        self.notes.get(&id)
    }

    /// All notes sorted by id for a stable render order.
    #[must_use]
    pub fn sorted_notes(&self) -> Vec<&StickyNote> {
        let mut notes: Vec<&StickyNote> = self.notes.values().collect();
        notes.sort_by_key(|n| n.id);
        notes
    }

    /// Number of notes currently on the board.
    #[must_use]
    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.notes.is_empty()
    }
}
