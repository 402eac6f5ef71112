//! SQLite schema versioning.
//!
//! Migrations are an ordered list of SQL batches. Each applied version is
//! recorded in `schema_migrations`; opening a database runs whatever is
//! missing inside one transaction.

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Result, StoreError};

/// A single forward-only schema step.
struct Migration {
    version: u32,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "key-value entries",
    sql: r#"
        -- One row per persisted value (private key, logs, pending marker)
        CREATE TABLE kv_entries (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL    -- local Unix ms of the last write
        );
    "#,
}];

/// Schema version this build writes.
pub const CURRENT_VERSION: u32 = 1;

/// Bring the schema up to [`CURRENT_VERSION`]. Idempotent.
///
/// A database written by a newer build is refused rather than used with a
/// schema this build does not understand.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at INTEGER NOT NULL
        )",
    )?;

    let current = schema_version(conn)?;
    if current > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "database schema v{current} is newer than supported v{CURRENT_VERSION}"
        )));
    }

    let pending: Vec<&Migration> = MIGRATIONS.iter().filter(|m| m.version > current).collect();
    if pending.is_empty() {
        debug!(version = current, "schema up to date");
        return Ok(());
    }

    let tx = conn.transaction()?;
    for m in &pending {
        tx.execute_batch(m.sql)
            .map_err(|e| StoreError::Migration(format!("v{} ({}): {e}", m.version, m.description)))?;
        tx.execute(
            "INSERT INTO schema_migrations (version, description, applied_at) VALUES (?1, ?2, ?3)",
            params![m.version, m.description, now_millis()],
        )?;
    }
    tx.commit()?;

    info!(from = current, to = CURRENT_VERSION, "schema migrated");
    Ok(())
}

/// Highest applied migration, 0 for a fresh database.
pub fn schema_version(conn: &Connection) -> Result<u32> {
    let version: Option<u32> = conn
        .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| row.get(0))
        .optional()?
        .flatten();
    Ok(version.unwrap_or(0))
}

/// Wall-clock Unix milliseconds, 0 if the clock is before the epoch.
pub(crate) fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
