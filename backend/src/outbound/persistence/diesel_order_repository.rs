//! PostgreSQL-backed `OrderRepository` implementation using Diesel ORM.
//!
//! Plain CRUD runs as single statements. Completion is the exception: the
//! final order state and its stock debits are applied in one transaction,
//! with each debit guarded so stock can never go negative. Any shortfall
//! rolls the whole transaction back.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{OrderRepository, OrderRepositoryError};
use crate::domain::{Order, StockDebit};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error_with, map_pool_error_with};
use super::models::{NewOrderRow, OrderRow, OrderUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{orders, products};

/// Diesel-backed implementation of the order repository port.
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside the completion transaction. A shortfall names the first
/// product whose stock could not cover its debit.
#[derive(Debug)]
enum CompleteTxError {
    Diesel(diesel::result::Error),
    Shortfall(String),
}

impl From<diesel::result::Error> for CompleteTxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> OrderRepositoryError {
    map_pool_error_with(error, |message| OrderRepositoryError::connection(message))
}

/// Map Diesel errors to domain repository errors.
fn map_diesel_error(error: diesel::result::Error) -> OrderRepositoryError {
    map_diesel_error_with(
        error,
        OrderRepositoryError::query,
        OrderRepositoryError::connection,
    )
}

/// Map write errors, surfacing the unique barcode index as a duplicate.
/// NULL barcodes never collide, so the violation implies one was set.
fn map_write_error(barcode: Option<&str>, error: diesel::result::Error) -> OrderRepositoryError {
    if is_unique_violation(&error) {
        OrderRepositoryError::duplicate_barcode(barcode.unwrap_or_default())
    } else {
        map_diesel_error(error)
    }
}

/// Map completion transaction errors to domain repository errors.
fn map_complete_error(barcode: Option<&str>, error: CompleteTxError) -> OrderRepositoryError {
    match error {
        CompleteTxError::Diesel(error) => map_write_error(barcode, error),
        CompleteTxError::Shortfall(product) => OrderRepositoryError::insufficient_stock(product),
    }
}

/// Convert a database row into a domain order.
fn row_to_order(row: OrderRow) -> Result<Order, OrderRepositoryError> {
    row.into_domain().map_err(OrderRepositoryError::query)
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn list(&self) -> Result<Vec<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<OrderRow> = orders::table
            .order((orders::created_at.desc(), orders::id.desc()))
            .select(OrderRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_order).collect()
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .first::<OrderRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_order).transpose()
    }

    async fn insert(&self, order: &Order) -> Result<(), OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewOrderRow {
            id: order.id,
            sandwich_id: order.sandwich_id,
            quantity: order.quantity,
            weight_total_grams: order.weight_total_grams,
            cook_time_total_seconds: order.cook_time_total_seconds,
            status: order.status.as_str(),
            barcode: order.barcode.as_deref(),
            created_at: order.created_at,
        };

        diesel::insert_into(orders::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|error| map_write_error(order.barcode.as_deref(), error))
    }

    async fn update(&self, order: &Order) -> Result<bool, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = OrderUpdate {
            sandwich_id: order.sandwich_id,
            quantity: order.quantity,
            weight_total_grams: order.weight_total_grams,
            cook_time_total_seconds: order.cook_time_total_seconds,
            status: order.status.as_str(),
            barcode: Some(order.barcode.as_deref()),
        };

        let updated = diesel::update(orders::table.filter(orders::id.eq(order.id)))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(|error| map_write_error(order.barcode.as_deref(), error))?;

        Ok(updated > 0)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(orders::table.filter(orders::id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }

    async fn complete(
        &self,
        order: &Order,
        debits: &[StockDebit],
    ) -> Result<(), OrderRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = OrderUpdate {
            sandwich_id: order.sandwich_id,
            quantity: order.quantity,
            weight_total_grams: order.weight_total_grams,
            cook_time_total_seconds: order.cook_time_total_seconds,
            status: order.status.as_str(),
            barcode: Some(order.barcode.as_deref()),
        };
        let id = order.id;
        let debits = debits.to_vec();

        conn.transaction(|conn| {
            async move {
                let updated = diesel::update(orders::table.filter(orders::id.eq(id)))
                    .set(&changes)
                    .execute(conn)
                    .await?;
                if updated == 0 {
                    return Err(CompleteTxError::from(diesel::result::Error::NotFound));
                }

                for debit in &debits {
                    // The predicate keeps the decrement from ever taking
                    // stock below zero; zero rows means the guard refused.
                    let debited = diesel::update(
                        products::table.filter(
                            products::id
                                .eq(debit.product_id)
                                .and(products::quantity_in_stock.ge(debit.amount)),
                        ),
                    )
                    .set(
                        products::quantity_in_stock.eq(products::quantity_in_stock - debit.amount),
                    )
                    .execute(conn)
                    .await?;

                    if debited == 0 {
                        let name: Option<String> = products::table
                            .filter(products::id.eq(debit.product_id))
                            .select(products::name)
                            .first::<String>(conn)
                            .await
                            .optional()?;
                        let product = name.unwrap_or_else(|| debit.product_id.to_string());
                        return Err(CompleteTxError::Shortfall(product));
                    }
                }

                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|error| map_complete_error(order.barcode.as_deref(), error))
    }
}
