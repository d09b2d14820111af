//! Topic registry — board naming and subscriber fan-out.
//!
//! DESIGN
//! ======
//! A topic is the logical channel multiplexing one board's events. The
//! registry is pure naming plus a subscriber map: append-on-join,
//! remove-on-leave, evict-when-empty. Each topic carries its own lock;
//! the outer map is held only long enough to resolve a board to its
//! topic, so fan-out stays local to one board. Delivery is best-effort
//! `try_send` with no acknowledgment, retry, or backpressure — a session
//! that misses a broadcast resynchronizes only by unsubscribing and
//! rejoining, which triggers a fresh full replay.

use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::protocol::{DEFAULT_BOARD_ID, Event};
use crate::state::{AppState, Topic};

// =============================================================================
// NAMING
// =============================================================================

/// Resolve a client-supplied board id to its topic name. Absent or empty
/// ids map to the well-known default board.
#[must_use]
pub fn resolve(board_id: Option<&str>) -> String {
    match board_id {
        Some(id) if !id.is_empty() => id.to_owned(),
        _ => DEFAULT_BOARD_ID.to_owned(),
    }
}

// =============================================================================
// SUBSCRIBE / UNSUBSCRIBE
// =============================================================================

/// Register a session on a board's topic, creating the topic on first join.
///
/// Holds the registry lock across the insert so eviction of the same topic
/// cannot race in between.
pub async fn subscribe(state: &AppState, board_id: &str, session_id: Uuid, tx: mpsc::Sender<Event>) {
    let mut topics = state.topics.write().await;
    let topic = Arc::clone(
        topics.entry(board_id.to_owned()).or_insert_with(|| Arc::new(RwLock::new(Topic::new()))),
    );
    let mut topic = topic.write().await;
    topic.subscribers.insert(session_id, tx);
    info!(%board_id, %session_id, subscribers = topic.subscribers.len(), "session subscribed");
}

/// Remove a session from a board's topic. Evicts the topic when the last
/// subscriber leaves. Safe to call at any time, including concurrently with
/// in-flight commands from the same session, and safe to call twice.
pub async fn unsubscribe(state: &AppState, board_id: &str, session_id: Uuid) {
    let mut topics = state.topics.write().await;
    let Some(topic) = topics.get(board_id).map(Arc::clone) else {
        return;
    };

    let remaining = {
        let mut topic = topic.write().await;
        topic.subscribers.remove(&session_id);
        topic.subscribers.len()
    };
    info!(%board_id, %session_id, remaining, "session unsubscribed");

    if remaining == 0 {
        topics.remove(board_id);
        info!(%board_id, "evicted empty topic");
    }
}

// =============================================================================
// FAN-OUT
// =============================================================================

/// Broadcast an event to every session currently subscribed to the board,
/// including the one that caused it. Fire-and-forget: a session whose
/// channel is full or closed simply misses this event. The registry lock
/// is released before fan-out, so other boards are never blocked.
pub async fn broadcast(state: &AppState, board_id: &str, event: &Event) {
    let topic = {
        let topics = state.topics.read().await;
        let Some(topic) = topics.get(board_id).map(Arc::clone) else {
            return;
        };
        topic
    };

    let topic = topic.read().await;
    for (session_id, tx) in &topic.subscribers {
        if tx.try_send(event.clone()).is_err() {
            warn!(%board_id, %session_id, "subscriber lagging or gone, event dropped");
        }
    }
}

/// Number of sessions currently subscribed to a board.
pub async fn subscriber_count(state: &AppState, board_id: &str) -> usize {
    let topic = {
        let topics = state.topics.read().await;
        topics.get(board_id).map(Arc::clone)
    };
    match topic {
        Some(topic) => topic.read().await.subscribers.len(),
        None => 0,
    }
}

// =============================================================================
// TESTS
// =============================================================================
