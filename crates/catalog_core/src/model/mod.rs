//! Catalog domain model.
//!
//! # Responsibility
//! - Define the canonical `Product` record and its closed `Category` set.
//! - Own field validation and the key-value (JSON mapping) representation.
//!
//! # Invariants
//! - `Product::id` is `None` until storage assigns one.
//! - Prices are exact decimals that fit `NUMERIC(14,2)`.

pub mod price;
pub mod product;
