//! SQLite store bootstrap and error types.
//!
//! # Responsibility
//! - Own the single connection to the embedded item database.
//! - Ensure the `items` schema exists before any repository call.
//!
//! # Invariants
//! - Schema setup is `CREATE TABLE IF NOT EXISTS` only; there are no migrations.
//! - One statement executes at a time per `Store`.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod store;

pub use store::Store;

pub type StoreResult<T> = Result<T, PersistenceError>;

/// Startup failure: the store cannot be opened or its schema cannot be created.
///
/// Fatal to startup and never retried.
#[derive(Debug)]
pub enum SchemaError {
    Open(rusqlite::Error),
    Initialize(rusqlite::Error),
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open(err) => write!(f, "failed to open item store: {err}"),
            Self::Initialize(err) => write!(f, "failed to initialize items schema: {err}"),
        }
    }
}

impl Error for SchemaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open(err) | Self::Initialize(err) => Some(err),
        }
    }
}

/// Failure of a single CRUD statement or of reading back its rows.
#[derive(Debug)]
pub enum PersistenceError {
    Sqlite(rusqlite::Error),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
