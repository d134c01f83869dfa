//! Product inventory domain service.
//!
//! Implements product CRUD, stock top-up, and the stock snapshot read.
//! Product mutations ripple into the derived totals of every sandwich
//! containing the product, and every stock-affecting mutation ends by
//! pushing a fresh snapshot through the stock publisher.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;
use uuid::Uuid;

use crate::domain::port_error_mapping::{
    map_product_repository_error, map_sandwich_repository_error,
};
use crate::domain::ports::{ProductRepository, SandwichRepository, StockPublisher};
use crate::domain::{Error, Product, ProductDraft, Sandwich, StockSnapshot};

/// Driving port for the product inventory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// List all products in name order.
    async fn list_products(&self) -> Result<Vec<Product>, Error>;

    /// Fetch a single product.
    async fn get_product(&self, id: Uuid) -> Result<Product, Error>;

    /// Create a product from a draft.
    async fn create_product(&self, draft: ProductDraft) -> Result<Product, Error>;

    /// Replace a product, refreshing the totals of sandwiches that contain it.
    async fn update_product(&self, id: Uuid, draft: ProductDraft) -> Result<Product, Error>;

    /// Delete a product, dropping it from any sandwich that contained it.
    async fn delete_product(&self, id: Uuid) -> Result<(), Error>;

    /// Add delivered units to a product's stock.
    async fn top_up_stock(&self, id: Uuid, amount: i32) -> Result<Product, Error>;

    /// Read the current per-product stock snapshot.
    async fn stock_snapshot(&self) -> Result<StockSnapshot, Error>;
}

/// Product inventory service implementing the driving port.
#[derive(Clone)]
pub struct ProductCatalogService<P, S, B> {
    product_repo: Arc<P>,
    sandwich_repo: Arc<S>,
    stock_publisher: Arc<B>,
}

impl<P, S, B> ProductCatalogService<P, S, B> {
    /// Create a new service over the product and sandwich repositories.
    pub fn new(product_repo: Arc<P>, sandwich_repo: Arc<S>, stock_publisher: Arc<B>) -> Self {
        Self {
            product_repo,
            sandwich_repo,
            stock_publisher,
        }
    }
}

impl<P, S, B> ProductCatalogService<P, S, B>
where
    P: ProductRepository,
    S: SandwichRepository,
    B: StockPublisher,
{
    /// Push the current stock snapshot to subscribers.
    ///
    /// Broadcast is best effort: a failed stock read is logged and skipped
    /// rather than failing the mutation that triggered it.
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

    /// Recompose the given sandwiches from their current member products.
    ///
    /// Member products are re-read from the repository so the recomposed
    /// totals reflect the mutation that just landed, including a member that
    /// no longer exists.
    async fn recompose_sandwiches(&self, sandwiches: Vec<Sandwich>) -> Result<(), Error> {
        for sandwich in sandwiches {
            let member_ids: Vec<Uuid> = sandwich.products.iter().map(|p| p.id).collect();
            let members = self
                .product_repo
                .find_by_ids(&member_ids)
                .await
                .map_err(map_product_repository_error)?;
            let recomposed =
                Sandwich::compose(sandwich.id, sandwich.name, sandwich.size, members);
            self.sandwich_repo
                .update(&recomposed)
                .await
                .map_err(map_sandwich_repository_error)?;
        }
        Ok(())
    }
}

#[async_trait]
impl<P, S, B> ProductCatalog for ProductCatalogService<P, S, B>
where
    P: ProductRepository,
    S: SandwichRepository,
    B: StockPublisher,
{
    async fn list_products(&self) -> Result<Vec<Product>, Error> {
        self.product_repo
            .list()
            .await
            .map_err(map_product_repository_error)
    }

    async fn get_product(&self, id: Uuid) -> Result<Product, Error> {
        self.product_repo
            .find_by_id(&id)
            .await
            .map_err(map_product_repository_error)?
            .ok_or_else(|| Error::not_found(format!("product {id} not found")))
    }

    async fn create_product(&self, draft: ProductDraft) -> Result<Product, Error> {
        let product = Product::from_draft(Uuid::new_v4(), draft);
        self.product_repo
            .insert(&product)
            .await
            .map_err(map_product_repository_error)?;
        self.publish_stock().await;
        Ok(product)
    }

    async fn update_product(&self, id: Uuid, draft: ProductDraft) -> Result<Product, Error> {
        let product = Product::from_draft(id, draft);
        let found = self
            .product_repo
            .update(&product)
            .await
            .map_err(map_product_repository_error)?;
        if !found {
            return Err(Error::not_found(format!("product {id} not found")));
        }
        let affected = self
            .sandwich_repo
            .list_containing_product(&id)
            .await
            .map_err(map_sandwich_repository_error)?;
        self.recompose_sandwiches(affected).await?;
        self.publish_stock().await;
        Ok(product)
    }

    async fn delete_product(&self, id: Uuid) -> Result<(), Error> {
        // Memberships are read before the delete removes them.
        let affected = self
            .sandwich_repo
            .list_containing_product(&id)
            .await
            .map_err(map_sandwich_repository_error)?;
        let found = self
            .product_repo
            .delete(&id)
            .await
            .map_err(map_product_repository_error)?;
        if !found {
            return Err(Error::not_found(format!("product {id} not found")));
        }
        self.recompose_sandwiches(affected).await?;
        self.publish_stock().await;
        Ok(())
    }

    async fn top_up_stock(&self, id: Uuid, amount: i32) -> Result<Product, Error> {
        let product = self
            .product_repo
            .add_stock(&id, amount)
            .await
            .map_err(map_product_repository_error)?
            .ok_or_else(|| Error::not_found(format!("product {id} not found")))?;
        self.publish_stock().await;
        Ok(product)
    }

    async fn stock_snapshot(&self) -> Result<StockSnapshot, Error> {
        let products = self
            .product_repo
            .list()
            .await
            .map_err(map_product_repository_error)?;
        Ok(StockSnapshot::from_products(&products))
    }
}

#[cfg(test)]
#[path = "product_catalog_tests.rs"]
mod tests;
