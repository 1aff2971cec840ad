//! Runtime orchestration layer for the loot tracker.
//!
//! Drives the polling engine from a tokio task, forwards snapshots to
//! the consumer over a channel, and applies externally issued commands
//! (exclusion edits, price overrides, session resets).

pub mod orchestrator;
