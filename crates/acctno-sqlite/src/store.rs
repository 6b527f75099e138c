use std::{path::Path, time::Duration};

use rusqlite::{Connection, OpenFlags, Transaction, TransactionBehavior};

use crate::{Error, Result, schema};

/// Connection settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SqliteConfig {
    /// How long a writer waits for the database lock before giving up.
    pub busy_timeout: Duration,
    /// Switch file databases to write-ahead logging.
    pub wal: bool,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_secs(5),
            wal: true,
        }
    }
}

/// One SQLite connection.
///
/// A connection serves one transaction at a time. Give each worker thread its
/// own store opened on the same file; SQLite serializes the writers.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path`.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened or a pragma is rejected.
    pub fn open(path: impl AsRef<Path>, config: &SqliteConfig) -> Result<Self> {
        Self::open_with_flags(path, config, OpenFlags::SQLITE_OPEN_CREATE)
    }

    /// Opens the database at `path` without creating it.
    ///
    /// # Errors
    ///
    /// Fails if the file does not exist, cannot be opened, or a pragma is
    /// rejected.
    pub fn open_existing(path: impl AsRef<Path>, config: &SqliteConfig) -> Result<Self> {
        Self::open_with_flags(path, config, OpenFlags::empty())
    }

    fn open_with_flags(
        path: impl AsRef<Path>,
        config: &SqliteConfig,
        extra: OpenFlags,
    ) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX | extra,
        )?;
        conn.busy_timeout(config.busy_timeout)?;
        if config.wal {
            let _mode: String =
                conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(wal = config.wal, busy_timeout = ?config.busy_timeout, "opened sqlite store");

        Ok(Self { conn })
    }

    /// Opens a private in-memory database, mostly for tests.
    ///
    /// # Errors
    ///
    /// Fails only if SQLite cannot allocate the database.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Creates the schema if missing.
    ///
    /// # Errors
    ///
    /// Propagates any SQLite error from the DDL.
    pub fn migrate(&self) -> Result<()> {
        schema::migrate(&self.conn)?;
        Ok(())
    }

    /// Starts a write transaction.
    ///
    /// `BEGIN IMMEDIATE` takes the write lock up front, so two transactions
    /// never both read a counter and then race to upgrade their locks.
    ///
    /// # Errors
    ///
    /// Fails with [`acctno::Error::LockTimeout`] (wrapped in
    /// [`Error::Issuance`](crate::Error::Issuance)) if the lock is not
    /// acquired within [`SqliteConfig::busy_timeout`].
    pub fn begin(&mut self) -> Result<Transaction<'_>> {
        self.conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(Error::from_lock)
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}
