//! Catalog domain model.
//!
//! # Responsibility
//! - Define the `Product` record and the closed `Category` set.
//! - Own input validation for primitive-typed product mappings.
//!
//! # Invariants
//! - A persisted product always has `Some(id)`.
//! - Categories are exchanged by member name only.

pub mod category;
pub mod product;
