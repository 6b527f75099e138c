use acctno::{ScopeKey, SequenceStore, StoreError};
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::to_store_error;

const BUMP_COUNTER: &str = "
INSERT INTO sequence_counters (scope, last_value) VALUES (?1, 1)
ON CONFLICT (scope) DO UPDATE
    SET last_value = last_value + 1,
        updated_at = CURRENT_TIMESTAMP
    WHERE last_value < ?2
RETURNING last_value";

/// [`SequenceStore`] over a borrowed connection.
///
/// Bind it to the [`Transaction`](rusqlite::Transaction) that will also insert
/// the account row: the counter bump and the insert then commit or roll back
/// together. Bound to a connection in autocommit mode it refuses to allocate.
#[derive(Clone, Copy, Debug)]
pub struct SqliteSequences<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteSequences<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// The underlying connection, for inserting the row that consumes the
    /// allocated number.
    pub fn connection(&self) -> &'c Connection {
        self.conn
    }
}

impl SequenceStore for SqliteSequences<'_> {
    fn in_transaction(&self) -> bool {
        !self.conn.is_autocommit()
    }

    fn increment(&mut self, scope: &ScopeKey, ceiling: u32) -> Result<Option<u32>, StoreError> {
        // The upsert reads and writes the counter in one statement under the
        // write lock. No row comes back when the WHERE guard refuses the
        // update, which is how a full scope is reported.
        self.conn
            .prepare_cached(BUMP_COUNTER)
            .and_then(|mut stmt| {
                stmt.query_row(params![scope.as_str(), ceiling], |row| row.get(0))
                    .optional()
            })
            .map_err(to_store_error)
    }
}

/// Last sequence handed out in `scope`, or `None` if nothing was issued.
///
/// # Errors
///
/// Propagates SQLite failures.
pub fn counter_value(conn: &Connection, scope: &ScopeKey) -> rusqlite::Result<Option<u32>> {
    conn.query_row(
        "SELECT last_value FROM sequence_counters WHERE scope = ?1",
        [scope.as_str()],
        |row| row.get(0),
    )
    .optional()
}
