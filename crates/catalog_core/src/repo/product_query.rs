//! Lazy attribute queries over the product store.
//!
//! # Responsibility
//! - Describe attribute filters independently of the storage backend.
//! - Defer execution until the caller asks for a count or rows.
//!
//! # Invariants
//! - Building or narrowing a `ProductQuery` never touches storage.
//! - All filters combine with AND semantics.
//! - Name matching is exact and case-sensitive.

use crate::model::price::price_text;
use crate::model::product::{Category, Product};
use crate::repo::product_repo::{ProductRepository, RepoResult};
use rust_decimal::Decimal;

/// Backend-agnostic attribute filter.
///
/// An empty filter matches every product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub available: Option<bool>,
    pub category: Option<Category>,
    /// Compared by numeric value; `12.5` matches `12.50`.
    pub price: Option<Decimal>,
}

impl ProductFilter {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_available(mut self, available: bool) -> Self {
        self.available = Some(available);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// Evaluates the filter against an in-memory product.
    pub fn matches(&self, product: &Product) -> bool {
        self.name.as_ref().map_or(true, |name| *name == product.name)
            && self
                .available
                .map_or(true, |available| available == product.available)
            && self
                .category
                .map_or(true, |category| category == product.category)
            && self
                .price
                .map_or(true, |price| price_text(price) == price_text(product.price))
    }
}

/// Deferred query returned by the `find_by_*` finders.
///
/// Execution happens on `count`, `all`, or `first`; each call re-runs
/// against current storage state.
pub struct ProductQuery<'repo, R: ?Sized> {
    repo: &'repo R,
    filter: ProductFilter,
}

impl<'repo, R: ProductRepository + ?Sized> ProductQuery<'repo, R> {
    pub fn new(repo: &'repo R, filter: ProductFilter) -> Self {
        Self { repo, filter }
    }

    /// Returns the filter this query will execute.
    pub fn filter(&self) -> &ProductFilter {
        &self.filter
    }

    /// Narrows the query to products with the given availability.
    pub fn and_available(mut self, available: bool) -> Self {
        self.filter.available = Some(available);
        self
    }

    /// Narrows the query to products in `category`.
    pub fn and_category(mut self, category: Category) -> Self {
        self.filter.category = Some(category);
        self
    }

    /// Counts matching products without loading them.
    pub fn count(&self) -> RepoResult<u64> {
        self.repo.count_matching(&self.filter)
    }

    /// Loads every matching product in id order.
    pub fn all(&self) -> RepoResult<Vec<Product>> {
        self.repo.list_matching(&self.filter, None)
    }

    /// Loads the lowest-id matching product, if any.
    pub fn first(&self) -> RepoResult<Option<Product>> {
        Ok(self.repo.list_matching(&self.filter, Some(1))?.into_iter().next())
    }
}
