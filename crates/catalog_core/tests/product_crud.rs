mod common;

use catalog_core::{
    Category, DataValidationError, Product, ProductRepository, RepoError, SqliteProductRepository,
};
use common::{fresh_db, product_factory};
use rust_decimal::Decimal;
use std::str::FromStr;

#[test]
fn create_assigns_id_and_persists_fields() {
    let conn = fresh_db();
    let repo = SqliteProductRepository::new(&conn);
    assert!(Product::all(&repo).unwrap().is_empty());

    let mut product = product_factory();
    let id = product.create(&repo).unwrap();
    assert_eq!(product.id, Some(id));

    let products = Product::all(&repo).unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0], product);
}

#[test]
fn create_then_find_returns_equal_product() {
    let conn = fresh_db();
    let repo = SqliteProductRepository::new(&conn);

    for _ in 0..5 {
        let mut product = product_factory();
        let id = product.create(&repo).unwrap();
        let found = Product::find(&repo, id).unwrap().unwrap();
        assert_eq!(found, product);
    }
}

#[test]
fn find_returns_none_for_unknown_id() {
    let conn = fresh_db();
    let repo = SqliteProductRepository::new(&conn);
    assert!(Product::find(&repo, 12345).unwrap().is_none());
}

#[test]
fn update_persists_changed_fields() {
    let conn = fresh_db();
    let repo = SqliteProductRepository::new(&conn);

    let mut product = product_factory();
    product.create(&repo).unwrap();
    product.name = "Ferrari".to_string();
    product.category = Category::Automotive;
    product.update(&repo).unwrap();

    let products = Product::all(&repo).unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Ferrari");
    assert_eq!(products[0].category, Category::Automotive);
}

#[test]
fn update_without_id_is_a_validation_error() {
    let conn = fresh_db();
    let repo = SqliteProductRepository::new(&conn);

    let mut product = product_factory();
    product.create(&repo).unwrap();
    product.id = None;

    let err = product.update(&repo).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(DataValidationError::MissingId)
    ));
}

#[test]
fn update_of_removed_row_is_not_found() {
    let conn = fresh_db();
    let repo = SqliteProductRepository::new(&conn);

    let mut product = product_factory();
    let id = product.create(&repo).unwrap();
    product.delete(&repo).unwrap();

    let err = product.update(&repo).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(missing) if missing == id));
}

#[test]
fn delete_removes_row() {
    let conn = fresh_db();
    let repo = SqliteProductRepository::new(&conn);

    let mut product = product_factory();
    product.create(&repo).unwrap();
    assert_eq!(Product::all(&repo).unwrap().len(), 1);

    product.delete(&repo).unwrap();
    assert!(Product::all(&repo).unwrap().is_empty());
    assert!(product.id.is_some());
}

#[test]
fn delete_without_id_is_a_validation_error() {
    let conn = fresh_db();
    let repo = SqliteProductRepository::new(&conn);

    let err = product_factory().delete(&repo).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(DataValidationError::MissingId)
    ));
}

#[test]
fn find_by_name_is_exact_match() {
    let conn = fresh_db();
    let repo = SqliteProductRepository::new(&conn);

    for name in ["p1", "p2", "p3", "p1", "P1"] {
        let mut product = product_factory();
        product.name = name.to_string();
        product.create(&repo).unwrap();
    }

    let found = Product::find_by_name(&repo, "p1").unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|product| product.name == "p1"));
}

#[test]
fn find_by_price_matches_stored_value() {
    let conn = fresh_db();
    let repo = SqliteProductRepository::new(&conn);

    for _ in 0..5 {
        product_factory().create(&repo).unwrap();
    }
    let products = Product::all(&repo).unwrap();
    let last = products.last().unwrap();

    let found = Product::find_by_price(&repo, last.price).unwrap();
    assert!(found.contains(last));
    assert!(found.iter().all(|product| product.price == last.price));
}

#[test]
fn find_by_price_accepts_quoted_string() {
    let conn = fresh_db();
    let repo = SqliteProductRepository::new(&conn);

    for _ in 0..5 {
        product_factory().create(&repo).unwrap();
    }
    let products = Product::all(&repo).unwrap();
    let last = products.last().unwrap();

    let by_text = Product::find_by_price(&repo, format!("\"{}\"", last.price)).unwrap();
    let by_amount = Product::find_by_price(&repo, last.price).unwrap();
    assert_eq!(by_text, by_amount);
    assert!(by_text.contains(last));
}

#[test]
fn find_by_price_normalizes_scale() {
    let conn = fresh_db();
    let repo = SqliteProductRepository::new(&conn);

    let mut product = product_factory();
    product.price = Decimal::from_str("12.5").unwrap();
    product.create(&repo).unwrap();

    assert_eq!(Product::find_by_price(&repo, "12.50").unwrap().len(), 1);
    assert_eq!(Product::find_by_price(&repo, "\"12.5\"").unwrap().len(), 1);
    assert_eq!(
        Product::find_by_price(&repo, Decimal::from_str("12.500").unwrap())
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn find_by_price_rejects_unparsable_text() {
    let conn = fresh_db();
    let repo = SqliteProductRepository::new(&conn);

    let err = Product::find_by_price(&repo, "\"abc\"").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(DataValidationError::InvalidPrice(_))
    ));
}

#[test]
fn find_by_availability_filters_on_flag() {
    let conn = fresh_db();
    let repo = SqliteProductRepository::new(&conn);

    for idx in 0..5 {
        let mut product = product_factory();
        product.available = idx % 2 == 0;
        product.create(&repo).unwrap();
    }

    let available = Product::find_by_availability(&repo, true).unwrap();
    assert_eq!(available.len(), 3);
    let unavailable = Product::find_by_availability(&repo, false).unwrap();
    assert_eq!(unavailable.len(), 2);
}

#[test]
fn find_by_category_filters_on_member() {
    let conn = fresh_db();
    let repo = SqliteProductRepository::new(&conn);

    for category in [
        Category::Automotive,
        Category::Housewares,
        Category::Automotive,
    ] {
        let mut product = product_factory();
        product.category = category;
        product.create(&repo).unwrap();
    }

    let found = Product::find_by_category(&repo, Category::Automotive).unwrap();
    assert_eq!(found.len(), 2);
    assert!(Product::find_by_category(&repo, Category::Food)
        .unwrap()
        .is_empty());
}

#[test]
fn delete_all_clears_table() {
    let conn = fresh_db();
    let repo = SqliteProductRepository::new(&conn);

    for _ in 0..3 {
        product_factory().create(&repo).unwrap();
    }

    assert_eq!(repo.delete_all().unwrap(), 3);
    assert!(Product::all(&repo).unwrap().is_empty());
}

#[test]
fn invalid_persisted_category_is_rejected_on_read() {
    let conn = fresh_db();
    conn.execute_batch(
        "PRAGMA ignore_check_constraints = ON;
         INSERT INTO products (name, description, price, available, category)
         VALUES ('Hat', NULL, '1.00', 1, 'HATS');",
    )
    .unwrap();
    let repo = SqliteProductRepository::new(&conn);

    let err = Product::all(&repo).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("HATS")));
}

#[test]
fn storage_errors_pass_through_unchanged() {
    let conn = fresh_db();
    conn.execute_batch("DROP TABLE products;").unwrap();
    let repo = SqliteProductRepository::new(&conn);

    let err = product_factory().create(&repo).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn repository_is_usable_as_trait_object() {
    let conn = fresh_db();
    let sqlite_repo = SqliteProductRepository::new(&conn);
    let repo: &dyn ProductRepository = &sqlite_repo;

    let mut product = product_factory();
    let id = product.create(repo).unwrap();
    assert_eq!(Product::find(repo, id).unwrap(), Some(product));
}
