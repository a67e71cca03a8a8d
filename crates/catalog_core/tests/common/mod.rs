#![allow(dead_code)]

use catalog_core::db::open_db_in_memory;
use catalog_core::{Category, Product};
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use rand::seq::SliceRandom;
use rand::Rng;
use rusqlite::Connection;
use rust_decimal::Decimal;

const PRODUCT_NAMES: &[&str] = &[
    "Hat", "Pants", "Shirt", "Apple", "Banana", "Pots", "Towels", "Ford", "Chevy", "Hammer",
    "Wrench",
];

/// Builds a random unpersisted product.
pub fn product_factory() -> Product {
    let mut rng = rand::thread_rng();
    let name = PRODUCT_NAMES
        .choose(&mut rng)
        .copied()
        .unwrap_or("Hat");
    let description: String = Sentence(3..8).fake();
    let price = Decimal::new(rng.gen_range(50..100_000), 2);
    let category = Category::ALL
        .choose(&mut rng)
        .copied()
        .unwrap_or_default();

    Product::new(name, Some(description), price, rng.gen_bool(0.5), category)
}

/// Opens a fresh in-memory catalog database.
pub fn fresh_db() -> Connection {
    open_db_in_memory().unwrap()
}
