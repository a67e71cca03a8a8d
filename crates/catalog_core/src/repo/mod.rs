//! Repository layer for catalog persistence.
//!
//! # Responsibility
//! - Define the data access contract passed to `Product` operations.
//! - Isolate SQLite query details from the domain model.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `Validation`) in
//!   addition to DB transport errors, never in place of them.

pub mod product_repo;
