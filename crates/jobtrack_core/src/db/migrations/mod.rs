//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Apply pending migrations on explicit request (`migrate`).
//! - Drop and recreate the schema on explicit request (`remigrate`).
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - Re-invoking `apply_migrations` on a current database reports
//!   `AlreadyInitialized` instead of failing.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_init.sql"),
}];

const DROP_SQL: &str = "DROP TABLE IF EXISTS events;
DROP TABLE IF EXISTS todos;
DROP TABLE IF EXISTS companies;";

/// Result of an explicit schema creation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateOutcome {
    /// Pending migrations were applied, schema is now at `version`.
    Applied { version: u32 },
    /// The schema was already at the latest version; nothing changed.
    AlreadyInitialized { version: u32 },
}

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations on the provided connection.
pub fn apply_migrations(conn: &Connection) -> DbResult<MigrateOutcome> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(MigrateOutcome::AlreadyInitialized { version: latest });
    }

    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }
        conn.execute_batch(migration.sql)?;
        conn.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }

    info!(
        "event=migrate module=db status=ok from={current_version} to={latest}"
    );
    Ok(MigrateOutcome::Applied { version: latest })
}

/// Drops all tracker tables and reapplies every migration.
///
/// Destructive; callers must collect confirmation before invoking.
pub fn reset_schema(conn: &Connection) -> DbResult<MigrateOutcome> {
    conn.execute_batch(DROP_SQL)?;
    conn.execute_batch("PRAGMA user_version = 0;")?;
    info!("event=remigrate module=db status=dropped");
    apply_migrations(conn)
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
