//! Port for order persistence and atomic completion.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Order;
use crate::domain::stock::StockDebit;

use super::define_port_error;

define_port_error! {
    /// Errors raised by order repository adapters.
    pub enum OrderRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "order repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "order repository query failed: {message}",
        /// Another order already carries this barcode.
        DuplicateBarcode { barcode: String } =>
            "order barcode already in use: {barcode}",
        /// A stock debit would take a product below zero.
        InsufficientStock { product: String } =>
            "insufficient stock for product: {product}",
    }
}

/// Port for reading and writing orders.
///
/// Completion is a distinct operation because it couples a status write to
/// the stock draw-down: both happen atomically or not at all, and stock
/// never goes negative.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// List all orders, newest first.
    async fn list(&self) -> Result<Vec<Order>, OrderRepositoryError>;

    /// Find an order by id.
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Order>, OrderRepositoryError>;

    /// Persist a new order.
    async fn insert(&self, order: &Order) -> Result<(), OrderRepositoryError>;

    /// Replace an existing order. Returns `false` when the id is unknown.
    async fn update(&self, order: &Order) -> Result<bool, OrderRepositoryError>;

    /// Delete an order. Returns `false` when the id is unknown.
    async fn delete(&self, id: &Uuid) -> Result<bool, OrderRepositoryError>;

    /// Persist a completed order and apply its stock debits in one
    /// transaction.
    ///
    /// The order carries its final state, done status included. Any debit
    /// that would take a product below zero aborts the whole operation with
    /// [`OrderRepositoryError::InsufficientStock`], leaving the order and
    /// every stock level untouched.
    async fn complete(
        &self,
        order: &Order,
        debits: &[StockDebit],
    ) -> Result<(), OrderRepositoryError>;
}
