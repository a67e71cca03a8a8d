//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas and ensure the catalog schema exists.
//!
//! # Invariants
//! - Returned connections have the schema fully applied.
//! - Bootstrapping an already initialized database changes nothing.

use super::config::{DbConfig, DbTarget};
use super::migrations::apply_migrations;
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens the database selected by `config` and ensures the schema exists.
///
/// Safe to call repeatedly for the same target: the schema step is skipped
/// when the stored version is current, and existing rows are kept.
///
/// # Side effects
/// - Creates the database file when it does not exist.
/// - Emits an `init_db` logging event.
pub fn init_db(config: &DbConfig) -> DbResult<Connection> {
    let result = match &config.target {
        DbTarget::Memory => open_db_in_memory(),
        DbTarget::File(path) => open_db(path),
    };

    match &result {
        Ok(_) => info!("event=init_db module=db status=ok target={}", target_label(config)),
        Err(err) => error!(
            "event=init_db module=db status=error target={} error={}",
            target_label(config),
            err
        ),
    }
    result
}

/// Opens a SQLite database file and applies the schema.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Opens an in-memory SQLite database and applies the schema.
///
/// Each call yields an independent, empty database.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &str,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = match open() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn)?;
    Ok(())
}

fn target_label(config: &DbConfig) -> String {
    match &config.target {
        DbTarget::Memory => "memory".to_string(),
        DbTarget::File(path) => path.display().to_string(),
    }
}
