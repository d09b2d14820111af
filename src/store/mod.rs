//! Durable event store — the sole ordering authority for board history.
//!
//! DESIGN
//! ======
//! Strokes are an append-only log per board; sticky notes are a keyed
//! snapshot per board. Every operation except `clear_board` touches a single
//! record, so concurrent sessions only contend inside the store itself.
//! `clear_board` spans both record kinds and must be atomic with respect to
//! concurrent writes on the same board.
//!
//! The trait is object-safe so `AppState` can hold `Arc<dyn EventStore>` and
//! tests can substitute the in-memory implementation for Postgres.

pub mod memory;
pub mod postgres;

pub use memory::MemoryEventStore;
pub use postgres::PgEventStore;

use async_trait::async_trait;

use crate::protocol::{NoteFields, NoteId, StickyNote, Stroke};

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sticky note not found: {0}")]
    NoteNotFound(NoteId),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

// =============================================================================
// TRAIT
// =============================================================================

/// Per-board persistence contract.
///
/// Implementations must provide read-after-write visibility within the
/// process and serialize concurrent writes to the same board. Delivery and
/// fan-out are someone else's problem; the store only decides order.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Append a stroke to a board's log. Returns the canonical persisted
    /// stroke in its store-accepted form.
    ///
    /// # Errors
    ///
    /// Returns a database error if the write fails.
    async fn append_stroke(&self, board_id: &str, stroke: &Stroke) -> Result<Stroke, StoreError>;

    /// All strokes for a board in acceptance order.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    async fn list_strokes(&self, board_id: &str) -> Result<Vec<Stroke>, StoreError>;

    /// Insert (`id = None`, assigning a fresh id) or fully replace
    /// (`id = Some`) a sticky note. Returns the persisted note.
    ///
    /// # Errors
    ///
    /// Returns `NoteNotFound` when replacing an id that doesn't exist on
    /// this board, or a database error if the write fails.
    async fn upsert_sticky_note(
        &self,
        board_id: &str,
        id: Option<NoteId>,
        fields: &NoteFields,
    ) -> Result<StickyNote, StoreError>;

    /// All sticky notes for a board, in id (creation) order.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails.
    async fn list_sticky_notes(&self, board_id: &str) -> Result<Vec<StickyNote>, StoreError>;

    /// Delete a sticky note. Deliberately a no-op when the id is absent.
    ///
    /// # Errors
    ///
    /// Returns a database error if the delete fails.
    async fn delete_sticky_note(&self, board_id: &str, id: NoteId) -> Result<(), StoreError>;

    /// Atomically remove every stroke and sticky note for one board.
    /// Other boards are untouched.
    ///
    /// # Errors
    ///
    /// Returns a database error if the transaction fails.
    async fn clear_board(&self, board_id: &str) -> Result<(), StoreError>;
}
