//! Settings database schema.
//!
//! The schema version lives in `schema_migrations`, one row per applied
//! step. Opening a store brings an older file up to date and refuses a file
//! written by a newer release.

use rusqlite::{Connection, Transaction};

use crate::error::{Result, StoreError};

/// Schema steps in application order. Step `n` moves the file to version `n`.
const STEPS: &[(u32, &str)] = &[(
    1,
    r#"
    CREATE TABLE settings (
        key TEXT PRIMARY KEY,             -- one of settings::keys::ALL
        value TEXT NOT NULL,
        updated_at INTEGER NOT NULL       -- Unix ms
    );
    "#,
)];

/// Version a freshly migrated settings file reports.
pub const CURRENT_VERSION: u32 = 1;

/// Bring the settings schema up to [`CURRENT_VERSION`]. Safe to run on every open.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let found = schema_version(conn)?;
    if found > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "settings file is at schema {found}, this build reads up to {CURRENT_VERSION}"
        )));
    }

    let pending: Vec<_> = STEPS.iter().filter(|(version, _)| *version > found).collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, sql) in pending {
        apply_step(&tx, *version, sql)?;
    }
    tx.commit()?;
    Ok(())
}

/// Highest applied schema step, 0 for a new file.
pub fn schema_version(conn: &Connection) -> Result<u32> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

fn apply_step(tx: &Transaction<'_>, version: u32, sql: &str) -> Result<()> {
    tx.execute_batch(sql)?;
    tx.execute(
        "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
        rusqlite::params![version, now_millis()],
    )?;
    tracing::debug!(version, "settings schema step applied");
    Ok(())
}

/// Wall clock in Unix milliseconds; 0 if the clock is before the epoch.
pub(crate) fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
