//! Order lifecycle domain service.
//!
//! Implements order CRUD, status changes, and weight verification. The
//! service owns the completion guard: entering the done state builds a
//! per-product debit plan for the ordered sandwich and hands it to the
//! order repository, which applies the status change and the stock
//! draw-down atomically. Stock snapshots are pushed to subscribers after
//! completions and status changes.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::domain::port_error_mapping::{
    map_order_repository_error, map_sandwich_repository_error,
};
use crate::domain::ports::{
    OrderRepository, ProductRepository, SandwichRepository, StockPublisher,
};
use crate::domain::{
    Error, Order, OrderDraft, OrderStatus, Sandwich, StockDebit, StockSnapshot,
};

/// Driving port for the order desk.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderDesk: Send + Sync {
    /// List all orders, newest first.
    async fn list_orders(&self) -> Result<Vec<Order>, Error>;

    /// Fetch a single order.
    async fn get_order(&self, id: Uuid) -> Result<Order, Error>;

    /// Create an order from a draft.
    ///
    /// Totals derive from the referenced sandwich. A draft arriving directly
    /// in the done state is stored as such without drawing stock.
    async fn create_order(&self, draft: OrderDraft) -> Result<Order, Error>;

    /// Replace an order, recomputing totals; a status moving into done
    /// draws stock exactly as a status change would.
    async fn update_order(&self, id: Uuid, draft: OrderDraft) -> Result<Order, Error>;

    /// Delete an order.
    async fn delete_order(&self, id: Uuid) -> Result<(), Error>;

    /// Move an order to the given workflow state.
    async fn change_status(&self, id: Uuid, status: OrderStatus) -> Result<Order, Error>;

    /// Check a scale reading against the order's stored weight.
    ///
    /// A reading within tolerance completes the order; anything else sends
    /// it back to pending.
    async fn verify_weight(&self, id: Uuid, measured_grams: i32) -> Result<Order, Error>;
}

/// Order desk service implementing the driving port.
#[derive(Clone)]
pub struct OrderDeskService<O, S, P, B> {
    order_repo: Arc<O>,
    sandwich_repo: Arc<S>,
    product_repo: Arc<P>,
    stock_publisher: Arc<B>,
    clock: Arc<dyn Clock>,
}

impl<O, S, P, B> OrderDeskService<O, S, P, B> {
    /// Create a new service over the order, sandwich, and product
    /// repositories.
    pub fn new(
        order_repo: Arc<O>,
        sandwich_repo: Arc<S>,
        product_repo: Arc<P>,
        stock_publisher: Arc<B>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            order_repo,
            sandwich_repo,
            product_repo,
            stock_publisher,
            clock,
        }
    }
}

impl<O, S, P, B> OrderDeskService<O, S, P, B>
where
    O: OrderRepository,
    S: SandwichRepository,
    P: ProductRepository,
    B: StockPublisher,
{
    async fn find_order(&self, id: &Uuid) -> Result<Order, Error> {
        self.order_repo
            .find_by_id(id)
            .await
            .map_err(map_order_repository_error)?
            .ok_or_else(|| Error::not_found(format!("order {id} not found")))
    }

    /// Resolve the sandwich named by a draft.
    ///
    /// An unknown id rejects the draft rather than reporting the order as
    /// missing.
    async fn resolve_draft_sandwich(&self, id: &Uuid) -> Result<Sandwich, Error> {
        self.sandwich_repo
            .find_by_id(id)
            .await
            .map_err(map_sandwich_repository_error)?
            .ok_or_else(|| {
                Error::invalid_request(format!("unknown sandwich: {id}"))
                    .with_details(json!({ "field": "sandwichId", "code": "unknown" }))
            })
    }

    /// Resolve the sandwich an existing order references.
    ///
    /// Sandwich deletion is blocked while orders reference it, so absence
    /// here is data corruption, not a caller mistake.
    async fn resolve_order_sandwich(&self, order: &Order) -> Result<Sandwich, Error> {
        self.sandwich_repo
            .find_by_id(&order.sandwich_id)
            .await
            .map_err(map_sandwich_repository_error)?
            .ok_or_else(|| {
                Error::internal(format!(
                    "order {} references missing sandwich {}",
                    order.id, order.sandwich_id
                ))
            })
    }

    /// Persist an order whose status change crosses into done.
    ///
    /// One debit of `order.quantity` units per sandwich member; the
    /// repository applies the debits and the order atomically.
    async fn complete(&self, order: &Order, sandwich: &Sandwich) -> Result<(), Error> {
        let debits: Vec<StockDebit> = sandwich
            .products
            .iter()
            .map(|member| StockDebit {
                product_id: member.id,
                amount: order.quantity,
            })
            .collect();
        self.order_repo
            .complete(order, &debits)
            .await
            .map_err(map_order_repository_error)
    }

    /// Move a loaded order to `status`, refreshing totals on the way.
    async fn transition(&self, existing: Order, status: OrderStatus) -> Result<Order, Error> {
        let sandwich = self.resolve_order_sandwich(&existing).await?;
        let mut updated = existing.clone();
        updated.refresh_totals(&sandwich)?;
        updated.status = status;

        if existing.completes_with(status) {
            self.complete(&updated, &sandwich).await?;
        } else {
            let found = self
                .order_repo
                .update(&updated)
                .await
                .map_err(map_order_repository_error)?;
            if !found {
                return Err(Error::not_found(format!("order {} not found", updated.id)));
            }
        }
        self.publish_stock().await;
        Ok(updated)
    }

    /// Push the current stock snapshot to subscribers.
    ///
    /// Broadcast is best effort: a failed stock read is logged and skipped
    /// rather than failing the transition that triggered it.
    async fn publish_stock(&self) {
        match self.product_repo.list().await {
            Ok(products) => {
                self.stock_publisher
                    .publish(StockSnapshot::from_products(&products))
                    .await;
            }
            Err(error) => {
                warn!(error = %error, "skipping stock broadcast after failed stock read");
            }
        }
    }
}

#[async_trait]
impl<O, S, P, B> OrderDesk for OrderDeskService<O, S, P, B>
where
    O: OrderRepository,
    S: SandwichRepository,
    P: ProductRepository,
    B: StockPublisher,
{
    async fn list_orders(&self) -> Result<Vec<Order>, Error> {
        self.order_repo
            .list()
            .await
            .map_err(map_order_repository_error)
    }

    async fn get_order(&self, id: Uuid) -> Result<Order, Error> {
        self.find_order(&id).await
    }

    async fn create_order(&self, draft: OrderDraft) -> Result<Order, Error> {
        let sandwich = self.resolve_draft_sandwich(&draft.sandwich_id).await?;
        let order = Order::from_draft(Uuid::new_v4(), draft, &sandwich, self.clock.utc())?;
        self.order_repo
            .insert(&order)
            .await
            .map_err(map_order_repository_error)?;
        Ok(order)
    }

    async fn update_order(&self, id: Uuid, draft: OrderDraft) -> Result<Order, Error> {
        let existing = self.find_order(&id).await?;
        let sandwich = self.resolve_draft_sandwich(&draft.sandwich_id).await?;
        let updated = Order::from_draft(id, draft, &sandwich, existing.created_at)?;

        if existing.completes_with(updated.status) {
            self.complete(&updated, &sandwich).await?;
            self.publish_stock().await;
        } else {
            let found = self
                .order_repo
                .update(&updated)
                .await
                .map_err(map_order_repository_error)?;
            if !found {
                return Err(Error::not_found(format!("order {id} not found")));
            }
        }
        Ok(updated)
    }

    async fn delete_order(&self, id: Uuid) -> Result<(), Error> {
        let found = self
            .order_repo
            .delete(&id)
            .await
            .map_err(map_order_repository_error)?;
        if !found {
            return Err(Error::not_found(format!("order {id} not found")));
        }
        Ok(())
    }

    async fn change_status(&self, id: Uuid, status: OrderStatus) -> Result<Order, Error> {
        let existing = self.find_order(&id).await?;
        self.transition(existing, status).await
    }

    async fn verify_weight(&self, id: Uuid, measured_grams: i32) -> Result<Order, Error> {
        let existing = self.find_order(&id).await?;
        let status = if existing.weight_matches(measured_grams) {
            OrderStatus::Done
        } else {
            OrderStatus::Pending
        };
        self.transition(existing, status).await
    }
}

#[cfg(test)]
#[path = "order_desk_tests.rs"]
mod tests;
