//! Product repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/update/delete and lookup APIs over the `products` table.
//! - Keep SQL and column encodings inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Product::validate()` before SQL mutations.
//! - `update`/`delete` on an unpersisted product fail before any SQL runs.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Category is stored by symbolic name, price as two-digit decimal text.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::price::{price_text, IntoPrice};
use crate::model::product::{Category, DataValidationError, Product, ProductId};
use crate::repo::product_query::{ProductFilter, ProductQuery};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};

const PRODUCTS_TABLE: &str = "products";
const REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "name",
    "description",
    "price",
    "available",
    "category",
];

const PRODUCT_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    price,
    available,
    category
FROM products";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for product persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(DataValidationError),
    Db(DbError),
    NotFound(ProductId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "product not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted product data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
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

/// Product store operations.
///
/// Finders return a lazy `ProductQuery`; implementors only provide the two
/// execution primitives (`list_matching`, `count_matching`).
pub trait ProductRepository {
    /// Inserts `product` and writes the generated id back onto it.
    fn create(&self, product: &mut Product) -> RepoResult<ProductId>;
    /// Persists every field of an already-created product.
    fn update(&self, product: &Product) -> RepoResult<()>;
    /// Removes the row backing `product`; missing rows are not an error.
    fn delete(&self, product: &Product) -> RepoResult<()>;
    /// Returns every product in id (insertion) order.
    fn all(&self) -> RepoResult<Vec<Product>>;
    fn find(&self, id: ProductId) -> RepoResult<Option<Product>>;
    fn list_matching(&self, filter: &ProductFilter, limit: Option<u32>)
        -> RepoResult<Vec<Product>>;
    fn count_matching(&self, filter: &ProductFilter) -> RepoResult<u64>;

    /// Unfiltered query over the whole store.
    fn query(&self) -> ProductQuery<'_, Self> {
        ProductQuery::new(self, ProductFilter::default())
    }

    fn find_by_name(&self, name: &str) -> ProductQuery<'_, Self> {
        ProductQuery::new(self, ProductFilter::default().with_name(name))
    }

    fn find_by_availability(&self, available: bool) -> ProductQuery<'_, Self> {
        ProductQuery::new(self, ProductFilter::default().with_available(available))
    }

    fn find_by_category(&self, category: Category) -> ProductQuery<'_, Self> {
        ProductQuery::new(self, ProductFilter::default().with_category(category))
    }

    /// Accepts a `Decimal` or its string form; both normalize identically.
    ///
    /// # Errors
    /// - `Validation(InvalidPrice)` when a string form is not a decimal.
    /// - `Validation(PriceOutOfRange)` when the value cannot be stored.
    fn find_by_price<P: IntoPrice>(&self, price: P) -> RepoResult<ProductQuery<'_, Self>>
    where
        Self: Sized,
    {
        let price = price.into_price()?;
        Ok(ProductQuery::new(
            self,
            ProductFilter::default().with_price(price),
        ))
    }
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not match what this binary expects.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn create(&self, product: &mut Product) -> RepoResult<ProductId> {
        if let Some(id) = product.id {
            return Err(DataValidationError::IdAlreadyAssigned(id).into());
        }
        product.validate()?;

        self.conn.execute(
            "INSERT INTO products (
                name,
                description,
                price,
                available,
                category
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                product.name.as_str(),
                product.description.as_str(),
                price_text(product.price),
                bool_to_int(product.available),
                product.category.name(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        product.id = Some(id);
        debug!("event=product_create module=repo status=ok id={id}");
        Ok(id)
    }

    fn update(&self, product: &Product) -> RepoResult<()> {
        let id = product.id.ok_or(DataValidationError::MissingId)?;
        product.validate()?;

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
                product.description.as_str(),
                price_text(product.price),
                bool_to_int(product.available),
                product.category.name(),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        debug!("event=product_update module=repo status=ok id={id}");
        Ok(())
    }

    fn delete(&self, product: &Product) -> RepoResult<()> {
        let id = product.id.ok_or(DataValidationError::MissingId)?;
        let changed = self
            .conn
            .execute("DELETE FROM products WHERE id = ?1;", [id])?;
        debug!("event=product_delete module=repo status=ok id={id} rows={changed}");
        Ok(())
    }

    fn all(&self) -> RepoResult<Vec<Product>> {
        self.list_matching(&ProductFilter::default(), None)
    }

    fn find(&self, id: ProductId) -> RepoResult<Option<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} WHERE id = ?1;"))?;
        let row = stmt
            .query_row([id], |row| Ok(parse_product_row(row)))
            .optional()?;
        row.transpose()
    }

    fn list_matching(
        &self,
        filter: &ProductFilter,
        limit: Option<u32>,
    ) -> RepoResult<Vec<Product>> {
        let (where_sql, mut bind_values) = where_clause(filter);
        let mut sql = format!("{PRODUCT_SELECT_SQL}{where_sql} ORDER BY id ASC");
        if let Some(limit) = limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut products = Vec::new();

        while let Some(row) = rows.next()? {
            products.push(parse_product_row(row)?);
        }

        debug!(
            "event=product_query module=repo status=ok rows={}",
            products.len()
        );
        Ok(products)
    }

    fn count_matching(&self, filter: &ProductFilter) -> RepoResult<u64> {
        let (where_sql, bind_values) = where_clause(filter);
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM products{where_sql};"),
            params_from_iter(bind_values),
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}

fn where_clause(filter: &ProductFilter) -> (String, Vec<Value>) {
    let mut conditions: Vec<&'static str> = Vec::new();
    let mut bind_values: Vec<Value> = Vec::new();

    if let Some(name) = &filter.name {
        conditions.push("name = ?");
        bind_values.push(Value::Text(name.clone()));
    }
    if let Some(available) = filter.available {
        conditions.push("available = ?");
        bind_values.push(Value::Integer(bool_to_int(available)));
    }
    if let Some(category) = filter.category {
        conditions.push("category = ?");
        bind_values.push(Value::Text(category.name().to_string()));
    }
    if let Some(price) = filter.price {
        conditions.push("price = ?");
        bind_values.push(Value::Text(price_text(price)));
    }

    if conditions.is_empty() {
        (String::new(), bind_values)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), bind_values)
    }
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    let category_text: String = row.get("category")?;
    let category = category_text.parse::<Category>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in products.category"
        ))
    })?;

    let price_value: String = row.get("price")?;
    let price = Decimal::from_str_exact(&price_value).map_err(|_| {
        RepoError::InvalidData(format!("invalid price `{price_value}` in products.price"))
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
        id: Some(row.get("id")?),
        name: row.get("name")?,
        description: row.get("description")?,
        price,
        available,
        category,
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [PRODUCTS_TABLE],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(RepoError::MissingRequiredTable(PRODUCTS_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([PRODUCTS_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(column) = REQUIRED_COLUMNS
        .iter()
        .copied()
        .find(|required| !columns.iter().any(|existing| existing == required))
    {
        return Err(RepoError::MissingRequiredColumn {
            table: PRODUCTS_TABLE,
            column,
        });
    }

    Ok(())
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
