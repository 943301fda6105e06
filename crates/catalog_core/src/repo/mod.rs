//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the product store contract used by services and callers.
//! - Isolate SQLite query details from business orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Product::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `Validation`) in
//!   addition to storage transport errors.

pub mod product_query;
pub mod product_repo;
