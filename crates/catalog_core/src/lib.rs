//! Core data-access layer for the product catalog.
//! This crate is the single source of truth for product invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, DatabaseTarget, StoreConfig};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use model::price::{IntoPrice, PRICE_SCALE};
pub use model::product::{Category, DataValidationError, DeserializeError, Product, ProductId};
pub use repo::product_query::{ProductFilter, ProductQuery};
pub use repo::product_repo::{ProductRepository, RepoError, RepoResult, SqliteProductRepository};
pub use service::product_service::{ProductService, ServiceError, ServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
