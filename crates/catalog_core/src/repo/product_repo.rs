//! Product repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and lookup APIs over the `products` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Prices are written and compared as canonical two-digit decimal text.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Storage errors are returned unmodified inside `RepoError::Db`.

use crate::db::DbError;
use crate::model::category::Category;
use crate::model::product::{
    normalize_price, parse_price_text, DataValidationError, Product, ProductId,
};
use log::{error, info};
use rusqlite::types::Value;
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};

const PRODUCT_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    price,
    available,
    category
FROM products";

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for product persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(DataValidationError),
    Db(DbError),
    NotFound(ProductId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "product not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted product data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DataValidationError> for RepoError {
    fn from(value: DataValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence context for products.
///
/// Passed explicitly to every `Product` operation.
pub trait ProductRepository {
    fn create_product(&self, product: &Product) -> RepoResult<ProductId>;
    fn update_product(&self, product: &Product) -> RepoResult<()>;
    fn delete_product(&self, id: ProductId) -> RepoResult<()>;
    fn get_product(&self, id: ProductId) -> RepoResult<Option<Product>>;
    fn list_products(&self) -> RepoResult<Vec<Product>>;
    fn find_by_name(&self, name: &str) -> RepoResult<Vec<Product>>;
    fn find_by_price(&self, price: Decimal) -> RepoResult<Vec<Product>>;
    fn find_by_availability(&self, available: bool) -> RepoResult<Vec<Product>>;
    fn find_by_category(&self, category: Category) -> RepoResult<Vec<Product>>;
    /// Removes every product row and returns how many were removed.
    fn delete_all(&self) -> RepoResult<usize>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_where(&self, clause: &str, value: Value) -> RepoResult<Vec<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} WHERE {clause} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([value])?;
        let mut products = Vec::new();

        while let Some(row) = rows.next()? {
            products.push(parse_product_row(row)?);
        }

        Ok(products)
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn create_product(&self, product: &Product) -> RepoResult<ProductId> {
        let result = self.conn.execute(
            "INSERT INTO products (
                name,
                description,
                price,
                available,
                category
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                product.name.as_str(),
                product.description.as_deref(),
                price_to_db(product.price),
                product.available,
                product.category.as_str(),
            ],
        );

        if let Err(err) = result {
            error!("event=product_create module=repo status=error error={err}");
            return Err(err.into());
        }

        let id = self.conn.last_insert_rowid();
        info!("event=product_create module=repo status=ok id={id}");
        Ok(id)
    }

    fn update_product(&self, product: &Product) -> RepoResult<()> {
        let id = product.id.ok_or(DataValidationError::MissingId)?;

        let changed = self.conn.execute(
            "UPDATE products
             SET
                name = ?1,
                description = ?2,
                price = ?3,
                available = ?4,
                category = ?5
             WHERE id = ?6;",
            params![
                product.name.as_str(),
                product.description.as_deref(),
                price_to_db(product.price),
                product.available,
                product.category.as_str(),
                id,
            ],
        )?;

        if changed == 0 {
            error!("event=product_update module=repo status=error error_code=not_found id={id}");
            return Err(RepoError::NotFound(id));
        }

        info!("event=product_update module=repo status=ok id={id}");
        Ok(())
    }

    fn delete_product(&self, id: ProductId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM products WHERE id = ?1;", [id])?;
        info!("event=product_delete module=repo status=ok id={id} changed={changed}");
        Ok(())
    }

    fn get_product(&self, id: ProductId) -> RepoResult<Option<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_product_row(row)?));
        }

        Ok(None)
    }

    fn list_products(&self) -> RepoResult<Vec<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut products = Vec::new();

        while let Some(row) = rows.next()? {
            products.push(parse_product_row(row)?);
        }

        Ok(products)
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Vec<Product>> {
        self.query_where("name = ?1", Value::Text(name.to_string()))
    }

    fn find_by_price(&self, price: Decimal) -> RepoResult<Vec<Product>> {
        self.query_where("price = ?1", Value::Text(price_to_db(price)))
    }

    fn find_by_availability(&self, available: bool) -> RepoResult<Vec<Product>> {
        self.query_where("available = ?1", Value::Integer(i64::from(available)))
    }

    fn find_by_category(&self, category: Category) -> RepoResult<Vec<Product>> {
        self.query_where("category = ?1", Value::Text(category.as_str().to_string()))
    }

    fn delete_all(&self) -> RepoResult<usize> {
        let removed = self.conn.execute("DELETE FROM products;", [])?;
        info!("event=product_delete_all module=repo status=ok removed={removed}");
        Ok(removed)
    }
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    let id: ProductId = row.get("id")?;

    let price_text: String = row.get("price")?;
    let price = parse_price_text(&price_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid price `{price_text}` in products.price"))
    })?;

    let category_text: String = row.get("category")?;
    let category = Category::from_name(&category_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in products.category"
        ))
    })?;

    let available = match row.get::<_, i64>("available")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid available value `{other}` in products.available"
            )));
        }
    };

    Ok(Product {
        id: Some(id),
        name: row.get("name")?,
        description: row.get("description")?,
        price,
        available,
        category,
    })
}

fn price_to_db(price: Decimal) -> String {
    normalize_price(price).to_string()
}
