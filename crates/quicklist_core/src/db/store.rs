//! Connection ownership and statement execution.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections and create the `items` table.
//! - Run mutating statements inside a transaction that commits before return.
//! - Run read statements into materialized row vectors.
//!
//! # Invariants
//! - A returned `Store` always has the `items` table.
//! - The connection mutex is held for the whole statement, so statements never
//!   interleave on one handle.

use super::{SchemaError, StoreResult};
use log::{error, info};
use rusqlite::{Connection, Params, Row, Transaction};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

const SCHEMA_SQL: &str = include_str!("schema.sql");
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared handle to the embedded item database.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Opens a database file and ensures the schema exists.
    ///
    /// # Side effects
    /// - Creates the file when missing.
    /// - Emits `db_open` logging events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        open_with("file", move || Connection::open(path))
    }

    /// Opens a private in-memory database and ensures the schema exists.
    pub fn open_in_memory() -> Result<Self, SchemaError> {
        open_with("memory", Connection::open_in_memory)
    }

    /// Creates the `items` table when absent.
    ///
    /// Safe to call on every startup; a second call is a no-op.
    pub fn initialize(&self) -> Result<(), SchemaError> {
        self.lock()
            .execute_batch(SCHEMA_SQL)
            .map_err(SchemaError::Initialize)
    }

    /// Runs one mutating statement in its own transaction.
    ///
    /// Returns the number of rows affected. The change is committed before
    /// this returns `Ok`; on error the transaction is rolled back.
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> StoreResult<usize> {
        self.with_transaction(|tx| Ok(tx.execute(sql, params)?))
    }

    /// Runs `f` inside one transaction and commits when it returns `Ok`.
    pub fn with_transaction<T>(
        &self,
        f: impl FnOnce(&Transaction<'_>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Runs one read statement and maps every row.
    ///
    /// Rows come back in store-native order unless `sql` orders them.
    pub fn query<T, P, F>(&self, sql: &str, params: P, mut map_row: F) -> StoreResult<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> StoreResult<T>,
    {
        let conn = self.lock();
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut mapped = Vec::new();
        while let Some(row) = rows.next()? {
            mapped.push(map_row(row)?);
        }
        Ok(mapped)
    }

    /// Returns whether a table with `name` exists in the schema.
    pub fn table_exists(&self, name: &str) -> StoreResult<bool> {
        let exists: i64 = self.lock().query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [name],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    // A poisoned lock only means a caller panicked mid-statement; the
    // transaction was rolled back on drop, so the connection is still usable.
    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> Result<Store, SchemaError> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let conn = match connect().and_then(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={err}",
                started_at.elapsed().as_millis()
            );
            return Err(SchemaError::Open(err));
        }
    };

    let store = Store {
        conn: Mutex::new(conn),
    };
    if let Err(err) = store.initialize() {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_init_failed error={err}",
            started_at.elapsed().as_millis()
        );
        return Err(err);
    }

    info!(
        "event=db_open module=db status=ok mode={mode} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(store)
}
