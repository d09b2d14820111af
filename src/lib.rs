//! inkboard — realtime shared-whiteboard synchronization.
//!
//! ARCHITECTURE
//! ============
//! Multiple sessions share one persistent board of freehand strokes and
//! sticky notes. The durable event store is the sole ordering authority;
//! the gateway admits a session, replays current history to it alone, and
//! from then on every accepted command is persisted and fanned out
//! best-effort to the board's topic, sender included. Consistency is
//! last-write-wins by design: no transforms, no merging, no delivery
//! guarantees — a session that misses events rejoins and replays.
//!
//! `view` is the transport-free client half: the per-viewer model,
//! coordinate rules, and gesture batching a host UI builds on.

pub mod db;
pub mod protocol;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod view;
