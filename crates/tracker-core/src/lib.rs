//! Core types and pure parsing logic for the loot tracker.
//!
//! Everything in this crate is stateless or owns only small lookup state:
//! line classification, token normalization, timestamp correlation,
//! exclusion sets, price resolution and display formatting. The stateful
//! pipeline lives in `tracker-data`.

pub mod classify;
pub mod database;
pub mod error;
pub mod exclusions;
pub mod formatting;
pub mod models;
pub mod normalize;
pub mod pricing;
pub mod settings;
pub mod timestamp;
