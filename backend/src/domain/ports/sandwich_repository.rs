//! Port for sandwich menu persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Sandwich;

use super::define_port_error;

define_port_error! {
    /// Errors raised by sandwich repository adapters.
    pub enum SandwichRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "sandwich repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "sandwich repository query failed: {message}",
        /// Another sandwich already carries this name.
        DuplicateName { name: String } =>
            "sandwich name already in use: {name}",
        /// Existing orders reference the sandwich.
        Referenced => "sandwich is referenced by existing orders",
    }
}

/// Port for reading and writing the sandwich menu.
///
/// Sandwiches are stored with their member products resolved; the stored
/// totals always reflect the membership persisted alongside them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SandwichRepository: Send + Sync {
    /// List all sandwiches in name order, members resolved.
    async fn list(&self) -> Result<Vec<Sandwich>, SandwichRepositoryError>;

    /// Find a sandwich by id, members resolved.
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Sandwich>, SandwichRepositoryError>;

    /// Persist a new sandwich and its membership rows.
    async fn insert(&self, sandwich: &Sandwich) -> Result<(), SandwichRepositoryError>;

    /// Replace an existing sandwich, membership included. Returns `false`
    /// when the id is unknown.
    async fn update(&self, sandwich: &Sandwich) -> Result<bool, SandwichRepositoryError>;

    /// Delete a sandwich. Returns `false` when the id is unknown and
    /// [`SandwichRepositoryError::Referenced`] when orders still point at it.
    async fn delete(&self, id: &Uuid) -> Result<bool, SandwichRepositoryError>;

    /// List the sandwiches that contain a given product.
    async fn list_containing_product(
        &self,
        product_id: &Uuid,
    ) -> Result<Vec<Sandwich>, SandwichRepositoryError>;
}
