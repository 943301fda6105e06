//! Product use-case service.
//!
//! # Responsibility
//! - Turn key-value request bodies into persisted products.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Mapping input never chooses a product id.
//! - A body that fails deserialization never reaches storage.

use crate::model::product::{DeserializeError, Product, ProductId};
use crate::repo::product_repo::{ProductRepository, RepoError};
use log::info;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service-level error: either the body was rejected or storage failed.
#[derive(Debug)]
pub enum ServiceError {
    Deserialize(DeserializeError),
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deserialize(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Deserialize(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<DeserializeError> for ServiceError {
    fn from(value: DeserializeError) -> Self {
        Self::Deserialize(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case wrapper around a product repository.
pub struct ProductService<R: ProductRepository> {
    repo: R,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Borrows the underlying repository for direct queries.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Deserializes `data` into a new product and persists it.
    ///
    /// Any `id` key in `data` is ignored; the stored id is returned on the
    /// product.
    pub fn create_from_mapping(&self, data: &Value) -> ServiceResult<Product> {
        let mut product = Product::default();
        product.deserialize(data)?;
        let id = self.repo.create(&mut product)?;
        info!("event=product_created module=service status=ok id={id}");
        Ok(product)
    }

    /// Replaces the fields of product `id` with those in `data`.
    ///
    /// # Errors
    /// - `Repo(NotFound)` when no product has `id`.
    /// - `Deserialize(..)` when `data` is rejected; storage is untouched.
    pub fn update_from_mapping(&self, id: ProductId, data: &Value) -> ServiceResult<Product> {
        let mut product = self.repo.find(id)?.ok_or(RepoError::NotFound(id))?;
        product.deserialize(data)?;
        self.repo.update(&product)?;
        info!("event=product_updated module=service status=ok id={id}");
        Ok(product)
    }

    /// Fetches one product by id.
    pub fn get(&self, id: ProductId) -> ServiceResult<Option<Product>> {
        Ok(self.repo.find(id)?)
    }

    /// Lists every product in id order.
    pub fn list_all(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.repo.all()?)
    }

    /// Deletes product `id`; returns whether a product existed.
    pub fn delete_by_id(&self, id: ProductId) -> ServiceResult<bool> {
        match self.repo.find(id)? {
            Some(product) => {
                self.repo.delete(&product)?;
                info!("event=product_deleted module=service status=ok id={id}");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
