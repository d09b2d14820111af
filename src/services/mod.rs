//! Core services: topic registry (board naming + fan-out) and the sync
//! router (command validation, persistence, canonical events).

pub mod sync;
pub mod topic;
