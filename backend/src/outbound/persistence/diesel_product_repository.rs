//! PostgreSQL-backed `ProductRepository` implementation using Diesel ORM.
//!
//! This adapter persists inventory products and decodes their enum-valued
//! columns back through the domain parsers.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::Product;
use crate::domain::ports::{ProductRepository, ProductRepositoryError};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error_with, map_pool_error_with};
use super::models::{NewProductRow, ProductRow, ProductUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::products;

/// Diesel-backed implementation of the product repository port.
#[derive(Clone)]
pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> ProductRepositoryError {
    map_pool_error_with(error, |message| {
        ProductRepositoryError::connection(message)
    })
}

/// Map Diesel errors to domain repository errors.
fn map_diesel_error(error: diesel::result::Error) -> ProductRepositoryError {
    map_diesel_error_with(
        error,
        ProductRepositoryError::query,
        ProductRepositoryError::connection,
    )
}

/// Map write errors, surfacing the unique name constraint as a duplicate.
fn map_write_error(name: &str, error: diesel::result::Error) -> ProductRepositoryError {
    if is_unique_violation(&error) {
        ProductRepositoryError::duplicate_name(name)
    } else {
        map_diesel_error(error)
    }
}

/// Convert a database row into a domain product.
fn row_to_product(row: ProductRow) -> Result<Product, ProductRepositoryError> {
    row.into_domain().map_err(ProductRepositoryError::query)
}

#[async_trait]
impl ProductRepository for DieselProductRepository {
    async fn list(&self) -> Result<Vec<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ProductRow> = products::table
            .order(products::name.asc())
            .select(ProductRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_product).collect()
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = products::table
            .filter(products::id.eq(id))
            .select(ProductRow::as_select())
            .first::<ProductRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_product).transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, ProductRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ProductRow> = products::table
            .filter(products::id.eq_any(ids))
            .select(ProductRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut found = rows
            .into_iter()
            .map(|row| row_to_product(row).map(|product| (product.id, product)))
            .collect::<Result<HashMap<_, _>, _>>()?;

        // Callers rely on results following the requested id order.
        Ok(ids.iter().filter_map(|id| found.remove(id)).collect())
    }

    async fn insert(&self, product: &Product) -> Result<(), ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewProductRow {
            id: product.id,
            name: &product.name,
            size: product.size.as_str(),
            colour: product.colour.as_str(),
            weight_grams: product.weight_grams,
            quantity_in_stock: product.quantity_in_stock,
            cook_time_seconds: product.cook_time_seconds,
        };

        diesel::insert_into(products::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|error| map_write_error(&product.name, error))
    }

    async fn update(&self, product: &Product) -> Result<bool, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = ProductUpdate {
            name: &product.name,
            size: product.size.as_str(),
            colour: product.colour.as_str(),
            weight_grams: product.weight_grams,
            quantity_in_stock: product.quantity_in_stock,
            cook_time_seconds: product.cook_time_seconds,
        };

        let updated = diesel::update(products::table.filter(products::id.eq(product.id)))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(|error| map_write_error(&product.name, error))?;

        Ok(updated > 0)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Memberships in sandwich_products go with the product through ON
        // DELETE CASCADE; the catalog service recomputes affected sandwich
        // totals afterwards.
        let deleted = diesel::delete(products::table.filter(products::id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }

    async fn add_stock(
        &self,
        id: &Uuid,
        amount: i32,
    ) -> Result<Option<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::update(products::table.filter(products::id.eq(id)))
            .set(products::quantity_in_stock.eq(products::quantity_in_stock + amount))
            .returning(ProductRow::as_returning())
            .get_result::<ProductRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_product).transpose()
    }
}
