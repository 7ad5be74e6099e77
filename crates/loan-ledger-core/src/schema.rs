//! SQLite schema for loan records and recycled identifiers.

use log::debug;
use rusqlite::Connection;

use crate::LedgerResult;

pub const LOAN_TABLE: &str = "loan_records";
pub const RECYCLED_TABLE: &str = "recycled_ids";

/// Bumped whenever a migration is appended.
pub const SCHEMA_VERSION: i32 = 1;

const MIGRATIONS: &[&str] = &[include_str!("../migrations/001_loans.sql")];

/// Create both tables if missing. Safe to call on every open.
pub fn ensure_schema(conn: &Connection) -> LedgerResult<()> {
    let current: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    for (idx, sql) in MIGRATIONS.iter().enumerate() {
        let version = idx as i32 + 1;
        if version > current {
            debug!("applying schema migration {version}");
            conn.execute_batch(sql)?;
        }
    }
    if current < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap()
    }

    #[test]
    fn test_creates_both_tables() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        let names = table_names(&conn);
        assert!(names.iter().any(|n| n == LOAN_TABLE));
        assert!(names.iter().any(|n| n == RECYCLED_TABLE));
    }

    #[test]
    fn test_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();
        let version: i32 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }
}
