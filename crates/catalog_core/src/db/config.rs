//! Database target configuration.
//!
//! # Responsibility
//! - Resolve the backing database from the `DATABASE_URI` environment
//!   variable, falling back to a local development file.
//!
//! # Invariants
//! - Only SQLite targets are accepted; other URI schemes are rejected rather
//!   than silently mapped to a local file.

use super::{DbError, DbResult};
use std::path::PathBuf;

/// Environment variable that selects the backing database.
pub const DATABASE_URI_ENV: &str = "DATABASE_URI";
/// Target used when `DATABASE_URI` is unset or blank.
pub const DEFAULT_DATABASE_URI: &str = "sqlite://development.db";

const SQLITE_SCHEME: &str = "sqlite://";
const MEMORY_URIS: [&str; 2] = ["sqlite::memory:", ":memory:"];

/// Where the catalog rows live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbTarget {
    Memory,
    File(PathBuf),
}

/// Resolved database configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub target: DbTarget,
}

impl DbConfig {
    /// Builds a config from the process environment.
    ///
    /// A `.env` file in the working directory (or a parent) is loaded first
    /// when present; variables already set in the environment win.
    pub fn from_env() -> DbResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_optional_uri(std::env::var(DATABASE_URI_ENV).ok().as_deref())
    }

    /// Parses an explicit connection string.
    ///
    /// Accepts `sqlite::memory:`, `:memory:`, `sqlite://<path>` and bare paths.
    pub fn from_uri(uri: &str) -> DbResult<Self> {
        let trimmed = uri.trim();
        if trimmed.is_empty() {
            return Err(DbError::UnsupportedUri(uri.to_string()));
        }

        if MEMORY_URIS.contains(&trimmed) {
            return Ok(Self::in_memory());
        }

        if let Some(path) = trimmed.strip_prefix(SQLITE_SCHEME) {
            if path.is_empty() {
                return Err(DbError::UnsupportedUri(uri.to_string()));
            }
            return Ok(Self::file(path));
        }

        if trimmed.contains("://") {
            return Err(DbError::UnsupportedUri(uri.to_string()));
        }

        Ok(Self::file(trimmed))
    }

    pub fn in_memory() -> Self {
        Self {
            target: DbTarget::Memory,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            target: DbTarget::File(path.into()),
        }
    }

    fn from_optional_uri(uri: Option<&str>) -> DbResult<Self> {
        match uri {
            Some(value) if !value.trim().is_empty() => Self::from_uri(value),
            _ => Self::from_uri(DEFAULT_DATABASE_URI),
        }
    }
}
