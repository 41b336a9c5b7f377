//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by core behavior.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - No schema objects are created here; callers run
//!   `migrations::apply_migrations` explicitly.

use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens a SQLite database file.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");

    let conn = match Connection::open(path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode=file duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    configure_connection(&conn)?;
    info!(
        "event=db_open module=db status=ok mode=file duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

/// Opens an in-memory SQLite database.
pub fn open_db_in_memory() -> DbResult<Connection> {
    info!("event=db_open module=db status=start mode=memory");
    let conn = Connection::open_in_memory()?;
    configure_connection(&conn)?;
    info!("event=db_open module=db status=ok mode=memory");
    Ok(conn)
}

fn configure_connection(conn: &Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    Ok(())
}
