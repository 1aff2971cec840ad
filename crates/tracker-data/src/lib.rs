//! Stateful parsing and aggregation pipeline for the loot tracker.
//!
//! Responsible for tailing the client log incrementally, resolving line
//! timestamps, applying classified events to the aggregation store, and
//! computing derived statistics and rate series over the result.

pub mod engine;
pub mod series;
pub mod stats;
pub mod store;
pub mod tailer;
