//! Stock snapshot payloads shared by the REST API and the WebSocket feed.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::product::Product;

/// Stock level of a single product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    /// Product identifier.
    pub id: Uuid,
    /// Product display name.
    pub name: String,
    /// Units currently in stock.
    pub quantity: i32,
}

/// Point-in-time stock levels across the whole inventory.
///
/// This is the payload broadcast to every stock feed subscriber after a
/// stock-affecting mutation, and returned by the REST stock endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockSnapshot {
    /// Per-product stock levels, in product listing order.
    pub products: Vec<StockLevel>,
    /// Sum of all product quantities.
    pub total_quantity: i64,
}

impl StockSnapshot {
    /// Build a snapshot from the current product inventory.
    ///
    /// # Examples
    /// ```
    /// use kiosk_backend::domain::StockSnapshot;
    ///
    /// let snapshot = StockSnapshot::from_products(&[]);
    /// assert_eq!(snapshot.total_quantity, 0);
    /// ```
    pub fn from_products(products: &[Product]) -> Self {
        let levels: Vec<StockLevel> = products
            .iter()
            .map(|p| StockLevel {
                id: p.id,
                name: p.name.clone(),
                quantity: p.quantity_in_stock,
            })
            .collect();
        let total_quantity = levels.iter().map(|level| i64::from(level.quantity)).sum();
        Self {
            products: levels,
            total_quantity,
        }
    }
}

/// A planned stock draw-down for one product.
///
/// Order completion turns into a list of debits, one per member product,
/// applied atomically by the order repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockDebit {
    /// Product to draw down.
    pub product_id: Uuid,
    /// Units to remove from stock.
    pub amount: i32,
}
