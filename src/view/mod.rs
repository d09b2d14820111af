//! Client-side state reconciliation.
//!
//! Transport-free, per-viewer model of one board: `model` applies inbound
//! events to a local stroke list and note map, `viewport` owns the
//! world/screen coordinate rules and render culling, and `gesture` batches
//! drag/edit state into a single update command per gesture. A host UI
//! wires these to its socket and canvas; nothing here performs I/O.

pub mod gesture;
pub mod model;
pub mod viewport;
