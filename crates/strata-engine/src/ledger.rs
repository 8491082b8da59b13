//! The persistent ledger of applied migrations

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::Serialize;

/// SQLite expression producing the current time in the same shape as
/// `Date.toISOString()`: `YYYY-MM-DDTHH:MM:SS.sssZ`.
pub(crate) const ISO_TIMESTAMP_SQL: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

/// One applied migration, as recorded in the ledger.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerRow {
    pub name: String,
    pub applied_at: DateTime<Utc>,
}

/// Create the ledger table if it does not exist. Side-effect-free when it
/// already does; runs once per engine construction, before any walk.
pub(crate) fn bootstrap(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS migrations (
            name       TEXT PRIMARY KEY NOT NULL,
            applied_at TEXT NOT NULL DEFAULT ({ISO_TIMESTAMP_SQL})
        );"
    ))
}

/// All ledger rows in application order. Names encode chronology, so
/// name order and insertion order are the same thing by invariant.
pub(crate) fn rows(conn: &Connection) -> rusqlite::Result<Vec<LedgerRow>> {
    let mut stmt = conn.prepare("SELECT name, applied_at FROM migrations ORDER BY name")?;
    let rows = stmt.query_map([], |row| {
        Ok(LedgerRow {
            name: row.get(0)?,
            applied_at: row.get(1)?,
        })
    })?;
    rows.collect()
}

/// Record a unit as applied. Runs in the same transaction as the unit's
/// forward operation.
pub(crate) fn record(conn: &Connection, name: &str) -> rusqlite::Result<()> {
    conn.execute("INSERT INTO migrations (name) VALUES (?1)", params![name])?;
    Ok(())
}

/// Erase a unit's row. Runs in the same transaction as the unit's
/// backward operation.
pub(crate) fn erase(conn: &Connection, name: &str) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM migrations WHERE name = ?1", params![name])?;
    Ok(())
}
