//! Product domain model.
//!
//! # Responsibility
//! - Define the canonical catalog record and its category set.
//! - Convert between `Product` and its key-value mapping form.
//!
//! # Invariants
//! - `id` is storage-assigned; mapping input never sets it.
//! - `deserialize` is all-or-nothing: a failed call leaves the product
//!   untouched.
//! - `category` is always a member of the closed `Category` set.

use crate::model::price::{check_price, parse_price, price_text};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Storage-generated product identifier.
pub type ProductId = i64;

const NAME_MAX_CHARS: usize = 100;
const DESCRIPTION_MAX_CHARS: usize = 250;

/// Closed classification of a product.
///
/// Symbolic names (`CLOTHS`, `FOOD`, ...) are used both on the wire and in
/// storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    #[default]
    Unknown,
    Cloths,
    Food,
    Housewares,
    Automotive,
    Tools,
}

impl Category {
    const ALL: [Category; 6] = [
        Category::Unknown,
        Category::Cloths,
        Category::Food,
        Category::Housewares,
        Category::Automotive,
        Category::Tools,
    ];

    /// Returns every category in declaration order.
    pub fn all() -> &'static [Category] {
        &Self::ALL
    }

    /// Returns the symbolic name, e.g. `HOUSEWARES`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Cloths => "CLOTHS",
            Self::Food => "FOOD",
            Self::Housewares => "HOUSEWARES",
            Self::Automotive => "AUTOMOTIVE",
            Self::Tools => "TOOLS",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = DataValidationError;

    /// Matches symbolic names exactly; `cloths` is not `CLOTHS`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.name() == value)
            .ok_or_else(|| DataValidationError::InvalidCategory(value.to_string()))
    }
}

/// Validation failures for product fields and lifecycle transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataValidationError {
    /// A required mapping key is absent.
    MissingAttribute(&'static str),
    /// A mapping value has the wrong JSON type.
    InvalidType {
        attribute: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    InvalidCategory(String),
    InvalidPrice(String),
    PriceOutOfRange(Decimal),
    EmptyName,
    FieldTooLong {
        attribute: &'static str,
        max_chars: usize,
    },
    /// Update/delete of a product that was never persisted.
    MissingId,
    /// Create of a product that already carries a storage id.
    IdAlreadyAssigned(ProductId),
}

impl Display for DataValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingAttribute(attribute) => {
                write!(f, "invalid product: missing {attribute}")
            }
            Self::InvalidType {
                attribute,
                expected,
                found,
            } => write!(
                f,
                "invalid type for {expected} [{attribute}]: found {found}"
            ),
            Self::InvalidCategory(value) => write!(f, "invalid category `{value}`"),
            Self::InvalidPrice(value) => write!(f, "invalid price `{value}`: not a decimal"),
            Self::PriceOutOfRange(value) => {
                write!(f, "price {value} does not fit NUMERIC(14,2)")
            }
            Self::EmptyName => write!(f, "product name cannot be empty"),
            Self::FieldTooLong {
                attribute,
                max_chars,
            } => write!(f, "{attribute} exceeds {max_chars} characters"),
            Self::MissingId => write!(f, "called with empty id field; product is not persisted"),
            Self::IdAlreadyAssigned(id) => {
                write!(f, "product already persisted with id {id}")
            }
        }
    }
}

impl Error for DataValidationError {}

/// Failure of `Product::deserialize`.
///
/// `NotAMapping` is a type-level fault (the input is not an object at all)
/// and is kept apart from field validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeserializeError {
    NotAMapping { found: &'static str },
    Invalid(DataValidationError),
}

impl Display for DeserializeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAMapping { found } => write!(
                f,
                "invalid product: body of request contained bad or no data (expected object, found {found})"
            ),
            Self::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DeserializeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotAMapping { .. } => None,
            Self::Invalid(err) => Some(err),
        }
    }
}

impl From<DataValidationError> for DeserializeError {
    fn from(value: DataValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// Catalog product record.
///
/// `Debug` doubles as the detailed representation (id and every field);
/// `Display` is the short `<Product name id=[..]>` form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    /// Exact decimal; serialized as canonical two-digit text.
    #[serde(serialize_with = "serialize_price")]
    pub price: Decimal,
    pub available: bool,
    pub category: Category,
}

impl Product {
    /// Creates an unpersisted product (`id == None`).
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        available: bool,
        category: Category,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            price,
            available,
            category,
        }
    }

    /// Returns whether storage has assigned an id.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Checks field-level invariants required before any write.
    pub fn validate(&self) -> Result<(), DataValidationError> {
        if self.name.trim().is_empty() {
            return Err(DataValidationError::EmptyName);
        }
        if self.name.chars().count() > NAME_MAX_CHARS {
            return Err(DataValidationError::FieldTooLong {
                attribute: "name",
                max_chars: NAME_MAX_CHARS,
            });
        }
        if self.description.chars().count() > DESCRIPTION_MAX_CHARS {
            return Err(DataValidationError::FieldTooLong {
                attribute: "description",
                max_chars: DESCRIPTION_MAX_CHARS,
            });
        }
        check_price(self.price)?;
        Ok(())
    }

    /// Returns the canonical mapping form.
    ///
    /// Keys: `id`, `name`, `description`, `price` (two-digit decimal
    /// string), `available`, `category` (symbolic name).
    pub fn serialize(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "price": price_text(self.price),
            "available": self.available,
            "category": self.category.name(),
        })
    }

    /// Populates fields from a key-value mapping.
    ///
    /// `id` is never read from `data`. Missing `description` becomes an
    /// empty string and missing `category` becomes `UNKNOWN`; `name`,
    /// `price` and `available` are required.
    ///
    /// # Errors
    /// - `NotAMapping` when `data` is not a JSON object.
    /// - `Invalid(..)` naming the offending attribute otherwise. On error no
    ///   field of `self` is modified.
    pub fn deserialize(&mut self, data: &Value) -> Result<&mut Self, DeserializeError> {
        let map = data.as_object().ok_or(DeserializeError::NotAMapping {
            found: json_type_name(data),
        })?;

        let candidate = Product {
            id: self.id,
            name: required_string(map, "name")?,
            description: optional_string(map, "description")?.unwrap_or_default(),
            price: required_price(map)?,
            available: required_bool(map, "available")?,
            category: match optional_string(map, "category")? {
                Some(name) => name.parse::<Category>()?,
                None => Category::Unknown,
            },
        };
        candidate.validate()?;

        *self = candidate;
        Ok(self)
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

fn serialize_price<S: Serializer>(price: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&price_text(*price))
}

fn required_string(
    map: &Map<String, Value>,
    attribute: &'static str,
) -> Result<String, DataValidationError> {
    optional_string(map, attribute)?.ok_or(DataValidationError::MissingAttribute(attribute))
}

fn optional_string(
    map: &Map<String, Value>,
    attribute: &'static str,
) -> Result<Option<String>, DataValidationError> {
    match map.get(attribute) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(other) => Err(DataValidationError::InvalidType {
            attribute,
            expected: "string",
            found: json_type_name(other),
        }),
    }
}

fn required_bool(
    map: &Map<String, Value>,
    attribute: &'static str,
) -> Result<bool, DataValidationError> {
    match map.get(attribute) {
        None => Err(DataValidationError::MissingAttribute(attribute)),
        Some(Value::Bool(value)) => Ok(*value),
        Some(other) => Err(DataValidationError::InvalidType {
            attribute,
            expected: "boolean",
            found: json_type_name(other),
        }),
    }
}

fn required_price(map: &Map<String, Value>) -> Result<Decimal, DataValidationError> {
    match map.get("price") {
        None => Err(DataValidationError::MissingAttribute("price")),
        Some(Value::String(raw)) => parse_price(raw),
        // `arbitrary_precision` keeps the literal digits of JSON numbers.
        Some(Value::Number(number)) => {
            let literal = number.to_string();
            if literal.contains(['e', 'E']) {
                let value = Decimal::from_scientific(&literal)
                    .map_err(|_| DataValidationError::InvalidPrice(literal.clone()))?;
                check_price(value)
            } else {
                parse_price(&literal)
            }
        }
        Some(other) => Err(DataValidationError::InvalidType {
            attribute: "price",
            expected: "decimal",
            found: json_type_name(other),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{json_type_name, Category, DataValidationError};
    use serde_json::json;

    #[test]
    fn category_names_round_trip_through_from_str() {
        for category in Category::all() {
            assert_eq!(category.name().parse::<Category>().unwrap(), *category);
        }
    }

    #[test]
    fn category_parse_is_case_sensitive() {
        let err = "cloths".parse::<Category>().unwrap_err();
        assert_eq!(err, DataValidationError::InvalidCategory("cloths".to_string()));
    }

    #[test]
    fn category_serde_uses_symbolic_names() {
        assert_eq!(
            serde_json::to_value(Category::Housewares).unwrap(),
            json!("HOUSEWARES")
        );
    }

    #[test]
    fn json_type_names_are_stable() {
        assert_eq!(json_type_name(&json!("x")), "string");
        assert_eq!(json_type_name(&json!(1)), "number");
        assert_eq!(json_type_name(&json!([])), "array");
    }
}
