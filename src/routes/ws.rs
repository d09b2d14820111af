//! WebSocket handler — session gateway for the realtime surface.
//!
//! DESIGN
//! ======
//! On upgrade, the session resolves its board, snapshots the store, registers
//! in the topic registry, and replays current history to its own socket only.
//! It then enters a `select!` loop:
//! - Incoming client text → parse `Command` → sync router → broadcast
//! - Broadcast events from board peers → forward to the socket
//!
//! Replay is written before the peer channel is first drained, so a joiner
//! always observes replay strictly before any live event. The snapshot is
//! taken *before* registration: a joiner can never see a replayed stroke
//! twice, at the cost of missing an event that lands inside the join window
//! (best-effort delivery; recovery is rejoin + replay).
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → resolve board (`?board_id=`, defaulting)
//! 2. Snapshot → subscribe → replay to this socket
//! 3. Command loop; errors go to this socket only, never broadcast
//! 4. Close → unsubscribe (no broadcast, no persistence side effect)

use std::collections::HashMap;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::protocol::{Command, Event};
use crate::services::{sync, topic};
use crate::state::{AppState, SESSION_CHANNEL_CAPACITY};
use crate::store::{EventStore, StoreError};

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Response {
    let board_id = topic::resolve(params.get("board_id").map(String::as_str));
    ws.on_upgrade(move |socket| run_session(socket, state, board_id))
}

// =============================================================================
// SESSION
// =============================================================================

async fn run_session(mut socket: WebSocket, state: AppState, board_id: String) {
    let session_id = Uuid::new_v4();

    // Snapshot before registering (see module docs for the tradeoff).
    let replay = match replay_events(state.store.as_ref(), &board_id).await {
        Ok(events) => events,
        Err(e) => {
            warn!(%session_id, %board_id, error = %e, "ws: replay snapshot failed");
            let err = sync::SyncError::from(e).to_event();
            let _ = send_event(&mut socket, &err).await;
            return;
        }
    };

    // Per-session channel for events fanned out by board peers.
    let (tx, mut rx) = mpsc::channel::<Event>(SESSION_CHANNEL_CAPACITY);
    topic::subscribe(&state, &board_id, session_id, tx).await;
    info!(%session_id, %board_id, strokes_and_notes = replay.len(), "ws: session joined");

    // Replay goes to the joining socket only, never broadcast.
    for event in &replay {
        if send_event(&mut socket, event).await.is_err() {
            topic::unsubscribe(&state, &board_id, session_id).await;
            return;
        }
    }

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(msg) = msg else { break };
                let Ok(msg) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        if let Some(reply) = process_text(&state, &board_id, &text).await {
                            if send_event(&mut socket, &reply).await.is_err() {
                                break;
                            }
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(event) = rx.recv() => {
                if send_event(&mut socket, &event).await.is_err() {
                    break;
                }
            }
        }
    }

    // No part broadcast, no flush: any unsent drag shadow lives client-side
    // and is discarded with the connection.
    topic::unsubscribe(&state, &board_id, session_id).await;
    info!(%session_id, %board_id, "ws: session closed");
}

// =============================================================================
// REPLAY
// =============================================================================

/// Current board history as replay events: every persisted stroke as `draw`
/// in store order, then every sticky note as `sticky_note_added`.
pub(crate) async fn replay_events(store: &dyn EventStore, board_id: &str) -> Result<Vec<Event>, StoreError> {
    let strokes = store.list_strokes(board_id).await?;
    let notes = store.list_sticky_notes(board_id).await?;

    Ok(strokes
        .into_iter()
        .map(|stroke| Event::Draw { stroke })
        .chain(notes.into_iter().map(|sticky_note| Event::StickyNoteAdded { sticky_note }))
        .collect())
}

// =============================================================================
// COMMAND DISPATCH
// =============================================================================

/// Parse and apply one inbound text frame. An accepted command is broadcast
/// to the whole topic (sender included, as a subscriber) and returns `None`;
/// a rejected one returns the error event for the sender alone.
pub(crate) async fn process_text(state: &AppState, board_id: &str, text: &str) -> Option<Event> {
    let command = match serde_json::from_str::<Command>(text) {
        Ok(command) => command,
        Err(e) => {
            warn!(%board_id, error = %e, "ws: malformed command");
            return Some(Event::Error {
                code: "E_VALIDATION".into(),
                message: format!("malformed command: {e}"),
                retryable: false,
            });
        }
    };

    match sync::apply_command(state.store.as_ref(), board_id, command).await {
        Ok(event) => {
            topic::broadcast(state, board_id, &event).await;
            None
        }
        Err(e) => {
            warn!(%board_id, code = e.code(), error = %e, "ws: command rejected");
            Some(e.to_event())
        }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

async fn send_event(socket: &mut WebSocket, event: &Event) -> Result<(), ()> {
    let json = match serde_json::to_string(event) {
        Ok(json) => json,
        Err(e) => {
            warn!(error = %e, "ws: failed to serialize event");
            return Err(());
        }
    };
    socket.send(Message::Text(json.into())).await.map_err(|_| ())
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
