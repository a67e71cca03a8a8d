//! Product catalog persistence core.
//!
//! A single `Product` entity over a SQLite `products` table, with
//! validation and primitive-mapping (de)serialization at the model boundary.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use db::{init_db, DbConfig, DbError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::Category;
pub use model::product::{DataValidationError, PriceQuery, Product, ProductId};
pub use repo::product_repo::{ProductRepository, RepoError, RepoResult, SqliteProductRepository};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
