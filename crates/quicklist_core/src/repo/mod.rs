//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define data access contracts for the `items` table.
//! - Keep SQL details out of the service layer.
//!
//! # Invariants
//! - Update and delete report rows affected; they never fail on a missing id.

pub mod item_repo;
