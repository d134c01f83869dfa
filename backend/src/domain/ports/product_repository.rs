//! Port for product inventory persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Product;

use super::define_port_error;

define_port_error! {
    /// Errors raised by product repository adapters.
    pub enum ProductRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "product repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "product repository query failed: {message}",
        /// Another product already carries this name.
        DuplicateName { name: String } =>
            "product name already in use: {name}",
    }
}

/// Port for reading and writing the product inventory.
///
/// Mutation methods that target a single row return `false` (or `None`) when
/// the row does not exist; callers turn that into a not-found error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// List all products in name order.
    async fn list(&self) -> Result<Vec<Product>, ProductRepositoryError>;

    /// Find a product by id.
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Product>, ProductRepositoryError>;

    /// Resolve several products at once, preserving the requested order.
    ///
    /// Unknown ids are simply absent from the result; the caller decides
    /// whether that is an error.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, ProductRepositoryError>;

    /// Persist a new product.
    async fn insert(&self, product: &Product) -> Result<(), ProductRepositoryError>;

    /// Replace an existing product. Returns `false` when the id is unknown.
    async fn update(&self, product: &Product) -> Result<bool, ProductRepositoryError>;

    /// Delete a product and its sandwich memberships. Returns `false` when
    /// the id is unknown.
    async fn delete(&self, id: &Uuid) -> Result<bool, ProductRepositoryError>;

    /// Add units to a product's stock, returning the updated row.
    async fn add_stock(
        &self,
        id: &Uuid,
        amount: i32,
    ) -> Result<Option<Product>, ProductRepositoryError>;
}
