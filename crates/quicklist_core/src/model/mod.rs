//! Domain model for the item list.
//!
//! # Invariants
//! - Every persisted item is identified by a store-assigned `ItemId`.
//! - Deletion removes the row; there are no tombstones.

pub mod item;
