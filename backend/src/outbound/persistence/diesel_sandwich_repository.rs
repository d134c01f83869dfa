//! PostgreSQL-backed `SandwichRepository` implementation using Diesel ORM.
//!
//! A sandwich spans two tables: the sandwiches row carries the stored
//! totals and the sandwich_products rows carry the ordered membership.
//! Reads stitch the two back together; writes replace both inside a single
//! transaction so the stored totals and the membership never drift apart.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::ports::{SandwichRepository, SandwichRepositoryError};
use crate::domain::{Product, Sandwich};

use super::diesel_error_mapping::{
    is_foreign_key_violation, is_unique_violation, map_diesel_error_with, map_pool_error_with,
};
use super::models::{NewSandwichProductRow, NewSandwichRow, ProductRow, SandwichRow, SandwichUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{products, sandwich_products, sandwiches};

/// Diesel-backed implementation of the sandwich repository port.
#[derive(Clone)]
pub struct DieselSandwichRepository {
    pool: DbPool,
}

impl DieselSandwichRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> SandwichRepositoryError {
    map_pool_error_with(error, |message| {
        SandwichRepositoryError::connection(message)
    })
}

/// Map Diesel errors to domain repository errors.
fn map_diesel_error(error: diesel::result::Error) -> SandwichRepositoryError {
    map_diesel_error_with(
        error,
        SandwichRepositoryError::query,
        SandwichRepositoryError::connection,
    )
}

/// Map write errors, surfacing the unique name constraint as a duplicate.
fn map_write_error(name: &str, error: diesel::result::Error) -> SandwichRepositoryError {
    if is_unique_violation(&error) {
        SandwichRepositoryError::duplicate_name(name)
    } else {
        map_diesel_error(error)
    }
}

/// Map delete errors, surfacing the orders foreign key as `Referenced`.
fn map_delete_error(error: diesel::result::Error) -> SandwichRepositoryError {
    if is_foreign_key_violation(&error) {
        SandwichRepositoryError::referenced()
    } else {
        map_diesel_error(error)
    }
}

/// Convert a member product row into a domain product.
fn row_to_product(row: ProductRow) -> Result<Product, SandwichRepositoryError> {
    row.into_domain().map_err(SandwichRepositoryError::query)
}

/// Attach the loaded members to a sandwich row and decode it.
fn assemble(
    row: SandwichRow,
    members: &mut HashMap<Uuid, Vec<Product>>,
) -> Result<Sandwich, SandwichRepositoryError> {
    let products = members.remove(&row.id).unwrap_or_default();
    row.into_domain(products)
        .map_err(SandwichRepositoryError::query)
}

/// Membership rows for a sandwich, positions following the product order.
fn membership_rows(sandwich: &Sandwich) -> Vec<NewSandwichProductRow> {
    sandwich
        .products
        .iter()
        .zip(0i32..)
        .map(|(product, position)| NewSandwichProductRow {
            sandwich_id: sandwich.id,
            product_id: product.id,
            position,
        })
        .collect()
}

/// Load the member products for the given sandwiches, keyed by sandwich id
/// and ordered by stored position.
async fn load_members(
    conn: &mut AsyncPgConnection,
    sandwich_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Product>>, SandwichRepositoryError> {
    if sandwich_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(Uuid, ProductRow)> = sandwich_products::table
        .inner_join(products::table)
        .filter(sandwich_products::sandwich_id.eq_any(sandwich_ids))
        .order((
            sandwich_products::sandwich_id.asc(),
            sandwich_products::position.asc(),
        ))
        .select((sandwich_products::sandwich_id, ProductRow::as_select()))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;

    let mut members: HashMap<Uuid, Vec<Product>> = HashMap::new();
    for (sandwich_id, row) in rows {
        members
            .entry(sandwich_id)
            .or_default()
            .push(row_to_product(row)?);
    }
    Ok(members)
}

#[async_trait]
impl SandwichRepository for DieselSandwichRepository {
    async fn list(&self) -> Result<Vec<Sandwich>, SandwichRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<SandwichRow> = sandwiches::table
            .order(sandwiches::name.asc())
            .select(SandwichRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut members = load_members(&mut conn, &ids).await?;

        rows.into_iter()
            .map(|row| assemble(row, &mut members))
            .collect()
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Sandwich>, SandwichRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = sandwiches::table
            .filter(sandwiches::id.eq(id))
            .select(SandwichRow::as_select())
            .first::<SandwichRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut members = load_members(&mut conn, std::slice::from_ref(id)).await?;

        assemble(row, &mut members).map(Some)
    }

    async fn insert(&self, sandwich: &Sandwich) -> Result<(), SandwichRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewSandwichRow {
            id: sandwich.id,
            name: &sandwich.name,
            size: sandwich.size.as_str(),
            weight_total_grams: sandwich.weight_total_grams,
            cook_time_seconds: sandwich.cook_time_seconds,
        };
        let member_rows = membership_rows(sandwich);

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(sandwiches::table)
                    .values(&new_row)
                    .execute(conn)
                    .await?;

                diesel::insert_into(sandwich_products::table)
                    .values(&member_rows)
                    .execute(conn)
                    .await?;

                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|error| map_write_error(&sandwich.name, error))
    }

    async fn update(&self, sandwich: &Sandwich) -> Result<bool, SandwichRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = SandwichUpdate {
            name: &sandwich.name,
            size: sandwich.size.as_str(),
            weight_total_grams: sandwich.weight_total_grams,
            cook_time_seconds: sandwich.cook_time_seconds,
        };
        let member_rows = membership_rows(sandwich);
        let id = sandwich.id;

        conn.transaction(|conn| {
            async move {
                let updated = diesel::update(sandwiches::table.filter(sandwiches::id.eq(id)))
                    .set(&changes)
                    .execute(conn)
                    .await?;

                if updated == 0 {
                    return Ok(false);
                }

                // Membership is replaced wholesale; positions restart at zero.
                diesel::delete(
                    sandwich_products::table.filter(sandwich_products::sandwich_id.eq(id)),
                )
                .execute(conn)
                .await?;

                diesel::insert_into(sandwich_products::table)
                    .values(&member_rows)
                    .execute(conn)
                    .await?;

                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(|error| map_write_error(&sandwich.name, error))
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, SandwichRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Memberships cascade with the sandwich; live orders keep it around
        // through the RESTRICT foreign key, surfaced here as Referenced.
        let deleted = diesel::delete(sandwiches::table.filter(sandwiches::id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(map_delete_error)?;

        Ok(deleted > 0)
    }

    async fn list_containing_product(
        &self,
        product_id: &Uuid,
    ) -> Result<Vec<Sandwich>, SandwichRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let containing: Vec<Uuid> = sandwich_products::table
            .filter(sandwich_products::product_id.eq(product_id))
            .select(sandwich_products::sandwich_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if containing.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<SandwichRow> = sandwiches::table
            .filter(sandwiches::id.eq_any(&containing))
            .order(sandwiches::name.asc())
            .select(SandwichRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut members = load_members(&mut conn, &ids).await?;

        rows.into_iter()
            .map(|row| assemble(row, &mut members))
            .collect()
    }
}
