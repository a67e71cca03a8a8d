//! SQLite storage bootstrap for the product catalog.
//!
//! # Responsibility
//! - Resolve the backing database from configuration.
//! - Open and configure SQLite connections.
//! - Ensure the `products` schema exists before data access.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Repository code must not run against a connection that skipped bootstrap.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod config;
pub mod migrations;
mod open;

pub use config::{DbConfig, DbTarget, DATABASE_URI_ENV, DEFAULT_DATABASE_URI};
pub use open::{init_db, open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    UnsupportedUri(String),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::UnsupportedUri(uri) => {
                write!(f, "unsupported database uri `{uri}`; expected sqlite://<path> or sqlite::memory:")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
            Self::UnsupportedUri(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
