//! Product domain model.
//!
//! # Responsibility
//! - Define the catalog record and its primitive-typed mapping form.
//! - Validate loosely typed input at the deserialization boundary.
//! - Expose entity-style CRUD/query entry points over an explicitly passed
//!   repository.
//!
//! # Invariants
//! - `id` is `None` until the product has been created in storage.
//! - `price` always carries exactly two fractional digits.
//! - `DataValidationError` is the only error produced by this module;
//!   storage failures pass through the repository error unchanged.

use crate::model::category::Category;
use crate::repo::product_repo::{ProductRepository, RepoResult};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Server-generated row identifier.
pub type ProductId = i64;

/// Fractional digits kept for every stored price.
pub const PRICE_SCALE: u32 = 2;

/// Validation failure raised by the product model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataValidationError {
    /// Input was not a key/value mapping.
    NotAnObject,
    /// A required key is absent.
    MissingAttribute(&'static str),
    /// A key holds a value of the wrong primitive type.
    InvalidType {
        attribute: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    /// A key holds a value of the right type that names nothing valid.
    InvalidAttribute {
        attribute: &'static str,
        value: String,
    },
    /// Price text could not be parsed as a decimal.
    InvalidPrice(String),
    /// Operation needs a persisted product but `id` is unset.
    MissingId,
}

impl Display for DataValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject => {
                write!(f, "invalid product: body of request contained bad or no data")
            }
            Self::MissingAttribute(attribute) => {
                write!(f, "invalid product: missing {attribute}")
            }
            Self::InvalidType {
                attribute,
                expected,
                found,
            } => write!(
                f,
                "invalid type for {attribute}: expected {expected}, got {found}"
            ),
            Self::InvalidAttribute { attribute, value } => {
                write!(f, "invalid attribute: {attribute} `{value}`")
            }
            Self::InvalidPrice(value) => write!(f, "invalid price `{value}`"),
            Self::MissingId => {
                write!(f, "product id is empty; create it before update/delete")
            }
        }
    }
}

impl Error for DataValidationError {}

/// Catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: Option<ProductId>,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub available: bool,
    pub category: Category,
}

impl Default for Product {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            description: None,
            price: normalize_price(Decimal::ZERO),
            available: true,
            category: Category::Unknown,
        }
    }
}

impl Display for Product {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Product {} id=[{id}]>", self.name),
            None => write!(f, "<Product {} id=[None]>", self.name),
        }
    }
}

impl Product {
    /// Creates an unpersisted product.
    ///
    /// `price` is rounded to two fractional digits.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        price: Decimal,
        available: bool,
        category: Category,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description,
            price: normalize_price(price),
            available,
            category,
        }
    }

    /// Converts all attributes to primitive JSON values.
    ///
    /// `price` is emitted as a decimal string and `category` as its member
    /// name; an unset `id` becomes `null`.
    pub fn serialize(&self) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("id".to_string(), self.id.map_or(Value::Null, Value::from));
        data.insert("name".to_string(), Value::from(self.name.as_str()));
        data.insert(
            "description".to_string(),
            self.description
                .as_deref()
                .map_or(Value::Null, Value::from),
        );
        data.insert(
            "price".to_string(),
            Value::from(normalize_price(self.price).to_string()),
        );
        data.insert("available".to_string(), Value::Bool(self.available));
        data.insert(
            "category".to_string(),
            Value::from(self.category.as_str()),
        );
        data
    }

    /// Populates fields from a primitive mapping.
    ///
    /// `id` is never read from input. Every field is parsed before any is
    /// assigned, so a failed call leaves `self` untouched.
    ///
    /// # Errors
    /// - `NotAnObject` when `data` is not a mapping.
    /// - `MissingAttribute` when `name`, `price`, `available` or `category`
    ///   is absent.
    /// - `InvalidType` when a value has the wrong primitive type
    ///   (e.g. `available = "asdf"`, `category = 69`).
    /// - `InvalidAttribute` when `category` names no member.
    /// - `InvalidPrice` when `price` does not parse as a decimal.
    pub fn deserialize(&mut self, data: &Value) -> Result<&mut Self, DataValidationError> {
        let object = data.as_object().ok_or(DataValidationError::NotAnObject)?;

        let name = match required(object, "name")? {
            Value::String(name) => name.clone(),
            other => return Err(invalid_type("name", "string", other)),
        };

        let description = match object.get("description") {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text.clone()),
            Some(other) => return Err(invalid_type("description", "string", other)),
        };

        let price = parse_price_value(required(object, "price")?)?;

        let available = match required(object, "available")? {
            Value::Bool(flag) => *flag,
            other => return Err(invalid_type("available", "bool", other)),
        };

        let category = match required(object, "category")? {
            Value::String(text) => Category::from_name(text).ok_or_else(|| {
                DataValidationError::InvalidAttribute {
                    attribute: "category",
                    value: text.clone(),
                }
            })?,
            other => return Err(invalid_type("category", "string", other)),
        };

        self.name = name;
        self.description = description;
        self.price = price;
        self.available = available;
        self.category = category;
        Ok(self)
    }

    /// Inserts this product as a new row and records the generated id.
    ///
    /// Any id already set is ignored by the insert and overwritten.
    pub fn create<R: ProductRepository + ?Sized>(&mut self, repo: &R) -> RepoResult<ProductId> {
        let id = repo.create_product(self)?;
        self.id = Some(id);
        Ok(id)
    }

    /// Persists in-memory fields to the row identified by `id`.
    ///
    /// # Errors
    /// - `Validation(MissingId)` when `id` is unset.
    /// - `NotFound` when no row has this id.
    pub fn update<R: ProductRepository + ?Sized>(&self, repo: &R) -> RepoResult<()> {
        repo.update_product(self)
    }

    /// Removes the row identified by `id`.
    ///
    /// The in-memory value keeps its id after deletion.
    pub fn delete<R: ProductRepository + ?Sized>(&self, repo: &R) -> RepoResult<()> {
        let id = self.id.ok_or(DataValidationError::MissingId)?;
        repo.delete_product(id)
    }

    /// Returns every persisted product.
    pub fn all<R: ProductRepository + ?Sized>(repo: &R) -> RepoResult<Vec<Product>> {
        repo.list_products()
    }

    /// Returns the product with `id`, if any.
    pub fn find<R: ProductRepository + ?Sized>(
        repo: &R,
        id: ProductId,
    ) -> RepoResult<Option<Product>> {
        repo.get_product(id)
    }

    /// Returns products whose name matches exactly (case-sensitive).
    pub fn find_by_name<R: ProductRepository + ?Sized>(
        repo: &R,
        name: &str,
    ) -> RepoResult<Vec<Product>> {
        repo.find_by_name(name)
    }

    /// Returns products whose stored price equals `price`.
    ///
    /// String input may be wrapped in one pair of double quotes.
    pub fn find_by_price<R: ProductRepository + ?Sized>(
        repo: &R,
        price: impl Into<PriceQuery>,
    ) -> RepoResult<Vec<Product>> {
        let query: PriceQuery = price.into();
        repo.find_by_price(query.resolve()?)
    }

    /// Returns products whose availability flag equals `available`.
    pub fn find_by_availability<R: ProductRepository + ?Sized>(
        repo: &R,
        available: bool,
    ) -> RepoResult<Vec<Product>> {
        repo.find_by_availability(available)
    }

    /// Returns products in `category`.
    pub fn find_by_category<R: ProductRepository + ?Sized>(
        repo: &R,
        category: Category,
    ) -> RepoResult<Vec<Product>> {
        repo.find_by_category(category)
    }
}

/// Price lookup input: either a decimal or text that parses to one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceQuery {
    Amount(Decimal),
    Text(String),
}

impl PriceQuery {
    /// Resolves to a normalized decimal.
    ///
    /// Text is trimmed, then one surrounding pair of `"` is stripped.
    pub fn resolve(self) -> Result<Decimal, DataValidationError> {
        match self {
            Self::Amount(amount) => Ok(normalize_price(amount)),
            Self::Text(text) => parse_price_text(strip_quotes(text.trim())),
        }
    }
}

impl From<Decimal> for PriceQuery {
    fn from(value: Decimal) -> Self {
        Self::Amount(value)
    }
}

impl From<&str> for PriceQuery {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PriceQuery {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Rounds half away from zero to `PRICE_SCALE` digits and pads so `12.5`
/// becomes `12.50`.
pub fn normalize_price(price: Decimal) -> Decimal {
    let mut normalized =
        price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    normalized.rescale(PRICE_SCALE);
    normalized
}

pub(crate) fn parse_price_text(text: &str) -> Result<Decimal, DataValidationError> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map(normalize_price)
        .map_err(|_| DataValidationError::InvalidPrice(text.to_string()))
}

fn parse_price_value(value: &Value) -> Result<Decimal, DataValidationError> {
    match value {
        Value::String(text) => parse_price_text(text.trim()),
        Value::Number(number) => parse_price_text(&number.to_string()),
        other => Err(invalid_type("price", "decimal", other)),
    }
}

fn strip_quotes(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(text)
}

fn required<'a>(
    object: &'a Map<String, Value>,
    attribute: &'static str,
) -> Result<&'a Value, DataValidationError> {
    object
        .get(attribute)
        .ok_or(DataValidationError::MissingAttribute(attribute))
}

fn invalid_type(
    attribute: &'static str,
    expected: &'static str,
    found: &Value,
) -> DataValidationError {
    DataValidationError::InvalidType {
        attribute,
        expected,
        found: json_type_name(found),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_price, strip_quotes, PriceQuery};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn normalize_price_pads_and_rounds_to_two_digits() {
        assert_eq!(normalize_price(Decimal::new(125, 1)).to_string(), "12.50");
        assert_eq!(normalize_price(Decimal::new(12345, 3)).to_string(), "12.35");
        assert_eq!(normalize_price(Decimal::from(7)).to_string(), "7.00");
    }

    #[test]
    fn strip_quotes_removes_only_one_surrounding_pair() {
        assert_eq!(strip_quotes("\"12.50\""), "12.50");
        assert_eq!(strip_quotes("\"\"12.50\"\""), "\"12.50\"");
        assert_eq!(strip_quotes("\"12.50"), "\"12.50");
        assert_eq!(strip_quotes("12.50"), "12.50");
    }

    #[test]
    fn price_query_resolves_quoted_text_like_bare_amount() {
        let from_text = PriceQuery::from("\"12.50\"").resolve().unwrap();
        let from_amount = PriceQuery::from(Decimal::from_str("12.5").unwrap())
            .resolve()
            .unwrap();
        assert_eq!(from_text, from_amount);
        assert_eq!(from_text.to_string(), "12.50");
    }

    #[test]
    fn price_query_rejects_non_numeric_text() {
        assert!(PriceQuery::from("twelve").resolve().is_err());
        assert!(PriceQuery::from("'12.50'").resolve().is_err());
    }
}
