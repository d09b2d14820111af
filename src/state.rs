//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the durable event store behind a trait object (so the REST and
//! realtime surfaces share one ordering authority, and tests can swap in the
//! memory store) plus the topic registry: one `Topic` per live board,
//! keeping subscriber state local to that board.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use crate::protocol::Event;
use crate::store::EventStore;

// =============================================================================
// TOPIC
// =============================================================================

/// Capacity of each session's outbound event channel. A session that falls
/// further behind than this starts losing broadcasts (best-effort delivery).
pub const SESSION_CHANNEL_CAPACITY: usize = 256;

/// Live subscriber set for one board. Exists only while at least one
/// session is subscribed; carries no persisted state.
#[derive(Default)]
pub struct Topic {
    /// Subscribed sessions: connection id -> sender for outgoing events.
    pub subscribers: HashMap<Uuid, mpsc::Sender<Event>>,
}

impl Topic {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state. Clone is required by Axum — all inner fields
/// are Arc-wrapped.
///
/// Each topic sits behind its own lock; the outer map is only touched to
/// resolve a board to its topic, so fan-out on one board never blocks
/// another board's sessions.
#[derive(Clone)]
pub struct AppState {
    /// Durable event store; the sole ordering authority for board history.
    pub store: Arc<dyn EventStore>,
    /// Topic registry: board id -> live subscriber set, sharded per board.
    pub topics: Arc<RwLock<HashMap<String, Arc<RwLock<Topic>>>>>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store, topics: Arc::new(RwLock::new(HashMap::new())) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use crate::protocol::{NoteDraft, Stroke};
    use crate::store::MemoryEventStore;

    /// App state backed by the in-memory store. No database required.
    #[must_use]
    pub fn memory_app_state() -> AppState {
        AppState::new(Arc::new(MemoryEventStore::new()))
    }

    /// Register a subscriber channel directly in the registry and return
    /// its session id plus the receiving half.
    pub async fn attach_subscriber(state: &AppState, board_id: &str) -> (Uuid, mpsc::Receiver<Event>) {
        let session_id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(SESSION_CHANNEL_CAPACITY);
        crate::services::topic::subscribe(state, board_id, session_id, tx).await;
        (session_id, rx)
    }

    /// A stroke with distinguishable endpoints for ordering assertions.
    #[must_use]
    pub fn stroke_at(x: f64) -> Stroke {
        Stroke { x, y: 50.0, prev_x: x - 1.0, prev_y: 49.0, color: "#000000".into(), line_width: 2 }
    }

    /// A minimal note draft with all optional fields omitted.
    #[must_use]
    pub fn bare_draft(text: &str) -> NoteDraft {
        NoteDraft { text: text.into(), x: 100.0, y: 200.0, color: None, width: None, height: None }
    }
}
