use rusqlite::Connection;

/// Tables used by the sequence store and the account store.
///
/// `sequence_counters.last_value` is the last sequence handed out in a scope;
/// a scope with no row has issued nothing yet.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS sequence_counters (
    scope       TEXT PRIMARY KEY NOT NULL,
    last_value  INTEGER NOT NULL CHECK (last_value BETWEEN 1 AND 999999),
    updated_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS accounts (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    account_number  TEXT NOT NULL UNIQUE,
    name            TEXT NOT NULL,
    account_type    TEXT NOT NULL,
    currency        TEXT NOT NULL,
    status          TEXT NOT NULL DEFAULT 'ACTIVE',
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_accounts_type ON accounts(account_type);
";

/// Creates the tables if they do not exist. Safe to run on every start.
pub fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();
        assert_eq!(tables, ["accounts", "sequence_counters"]);
    }
}
