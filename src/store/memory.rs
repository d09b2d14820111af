//! In-memory event store.
//!
//! One mutex guards all boards: every operation, including the multi-record
//! `clear_board`, runs inside a single critical section, which gives the
//! same atomicity the Postgres implementation gets from a transaction.
//! Used by tests and available wherever durability isn't required.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::protocol::{NoteFields, NoteId, StickyNote, Stroke};
use crate::store::{EventStore, StoreError};

#[derive(Default)]
struct BoardRecords {
    strokes: Vec<Stroke>,
    // BTreeMap keeps list_sticky_notes in id (creation) order.
    notes: BTreeMap<NoteId, StickyNote>,
}

#[derive(Default)]
struct Inner {
    boards: HashMap<String, BoardRecords>,
    next_note_id: NoteId,
}

/// Mutexed per-board records with a process-wide note id counter.
#[derive(Default)]
pub struct MemoryEventStore {
    inner: Mutex<Inner>,
}

impl MemoryEventStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn append_stroke(&self, board_id: &str, stroke: &Stroke) -> Result<Stroke, StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner
            .boards
            .entry(board_id.to_owned())
            .or_default()
            .strokes
            .push(stroke.clone());
        Ok(stroke.clone())
    }

    async fn list_strokes(&self, board_id: &str) -> Result<Vec<Stroke>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner
            .boards
            .get(board_id)
            .map(|b| b.strokes.clone())
            .unwrap_or_default())
    }

    async fn upsert_sticky_note(
        &self,
        board_id: &str,
        id: Option<NoteId>,
        fields: &NoteFields,
    ) -> Result<StickyNote, StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        let note_id = match id {
            Some(existing) => {
                let known = inner
                    .boards
                    .get(board_id)
                    .is_some_and(|b| b.notes.contains_key(&existing));
                if !known {
                    return Err(StoreError::NoteNotFound(existing));
                }
                existing
            }
            None => {
                inner.next_note_id += 1;
                inner.next_note_id
            }
        };

        let note = StickyNote::from_fields(note_id, fields.clone());
        inner
            .boards
            .entry(board_id.to_owned())
            .or_default()
            .notes
            .insert(note_id, note.clone());
        Ok(note)
    }

    async fn list_sticky_notes(&self, board_id: &str) -> Result<Vec<StickyNote>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner
            .boards
            .get(board_id)
            .map(|b| b.notes.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn delete_sticky_note(&self, board_id: &str, id: NoteId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        if let Some(board) = inner.boards.get_mut(board_id) {
            board.notes.remove(&id);
        }
        Ok(())
    }

    async fn clear_board(&self, board_id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.boards.remove(board_id);
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(x: f64) -> Stroke {
        Stroke { x, y: 0.0, prev_x: x - 1.0, prev_y: 0.0, color: "#000".into(), line_width: 2 }
    }

    fn fields(text: &str) -> NoteFields {
        NoteFields { text: text.into(), x: 10.0, y: 20.0, color: "#ffeb3b".into(), width: 200, height: 150 }
    }

    #[tokio::test]
    async fn strokes_replay_in_acceptance_order() {
        let store = MemoryEventStore::new();
        for i in 0..5 {
            store.append_stroke("default", &stroke(f64::from(i))).await.unwrap();
        }
        let strokes = store.list_strokes("default").await.unwrap();
        assert_eq!(strokes.len(), 5);
        for (i, s) in strokes.iter().enumerate() {
            assert!((s.x - i as f64).abs() < f64::EPSILON);
        }
    }

    #[tokio::test]
    async fn insert_assigns_unique_increasing_ids() {
        let store = MemoryEventStore::new();
        let a = store.upsert_sticky_note("default", None, &fields("a")).await.unwrap();
        let b = store.upsert_sticky_note("default", None, &fields("b")).await.unwrap();
        assert!(b.id > a.id);

        let listed = store.list_sticky_notes("default").await.unwrap();
        assert_eq!(listed, vec![a, b]);
    }

    #[tokio::test]
    async fn replace_requires_existing_id() {
        let store = MemoryEventStore::new();
        let err = store
            .upsert_sticky_note("default", Some(42), &fields("ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NoteNotFound(42)));

        let note = store.upsert_sticky_note("default", None, &fields("real")).await.unwrap();
        let updated = store
            .upsert_sticky_note("default", Some(note.id), &fields("edited"))
            .await
            .unwrap();
        assert_eq!(updated.id, note.id);
        assert_eq!(updated.text, "edited");
    }

    #[tokio::test]
    async fn replace_is_scoped_to_board() {
        let store = MemoryEventStore::new();
        let note = store.upsert_sticky_note("alpha", None, &fields("a")).await.unwrap();
        let err = store
            .upsert_sticky_note("beta", Some(note.id), &fields("b"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NoteNotFound(_)));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryEventStore::new();
        let note = store.upsert_sticky_note("default", None, &fields("a")).await.unwrap();
        store.delete_sticky_note("default", note.id).await.unwrap();
        store.delete_sticky_note("default", note.id).await.unwrap();
        assert!(store.list_sticky_notes("default").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clear_board_leaves_other_boards_alone() {
        let store = MemoryEventStore::new();
        store.append_stroke("alpha", &stroke(1.0)).await.unwrap();
        store.upsert_sticky_note("alpha", None, &fields("a")).await.unwrap();
        store.append_stroke("beta", &stroke(2.0)).await.unwrap();
        store.upsert_sticky_note("beta", None, &fields("b")).await.unwrap();

        store.clear_board("alpha").await.unwrap();

        assert!(store.list_strokes("alpha").await.unwrap().is_empty());
        assert!(store.list_sticky_notes("alpha").await.unwrap().is_empty());
        assert_eq!(store.list_strokes("beta").await.unwrap().len(), 1);
        assert_eq!(store.list_sticky_notes("beta").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn note_ids_stay_unique_after_clear() {
        let store = MemoryEventStore::new();
        let a = store.upsert_sticky_note("default", None, &fields("a")).await.unwrap();
        store.clear_board("default").await.unwrap();
        let b = store.upsert_sticky_note("default", None, &fields("b")).await.unwrap();
        assert!(b.id > a.id);
    }
}
