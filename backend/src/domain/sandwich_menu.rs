//! Sandwich menu domain service.
//!
//! Implements sandwich CRUD. Every write resolves the member product set
//! from the inventory and recomputes the derived totals, so a sandwich
//! never persists totals the current membership does not support.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use crate::domain::port_error_mapping::{
    map_product_repository_error, map_sandwich_repository_error,
};
use crate::domain::ports::{ProductRepository, SandwichRepository};
use crate::domain::{Error, Product, Sandwich, SandwichDraft};

/// Driving port for the sandwich menu.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SandwichMenu: Send + Sync {
    /// List all sandwiches in name order.
    async fn list_sandwiches(&self) -> Result<Vec<Sandwich>, Error>;

    /// Fetch a single sandwich.
    async fn get_sandwich(&self, id: Uuid) -> Result<Sandwich, Error>;

    /// Create a sandwich from a draft.
    async fn create_sandwich(&self, draft: SandwichDraft) -> Result<Sandwich, Error>;

    /// Replace a sandwich, recomputing totals from the new member set.
    async fn update_sandwich(&self, id: Uuid, draft: SandwichDraft) -> Result<Sandwich, Error>;

    /// Delete a sandwich. Fails with a conflict while orders reference it.
    async fn delete_sandwich(&self, id: Uuid) -> Result<(), Error>;
}

/// Sandwich menu service implementing the driving port.
#[derive(Clone)]
pub struct SandwichMenuService<S, P> {
    sandwich_repo: Arc<S>,
    product_repo: Arc<P>,
}

impl<S, P> SandwichMenuService<S, P> {
    /// Create a new service over the sandwich and product repositories.
    pub fn new(sandwich_repo: Arc<S>, product_repo: Arc<P>) -> Self {
        Self {
            sandwich_repo,
            product_repo,
        }
    }
}

impl<S, P> SandwichMenuService<S, P>
where
    S: SandwichRepository,
    P: ProductRepository,
{
    /// Resolve draft product ids to inventory products.
    ///
    /// Duplicate ids collapse to a single membership. Unknown ids reject the
    /// whole draft, naming every missing id in the error details.
    async fn resolve_members(&self, product_ids: &[Uuid]) -> Result<Vec<Product>, Error> {
        let mut requested: Vec<Uuid> = Vec::with_capacity(product_ids.len());
        for id in product_ids {
            if !requested.contains(id) {
                requested.push(*id);
            }
        }

        let members = self
            .product_repo
            .find_by_ids(&requested)
            .await
            .map_err(map_product_repository_error)?;
        if members.len() != requested.len() {
            let found: Vec<Uuid> = members.iter().map(|p| p.id).collect();
            let missing: Vec<String> = requested
                .iter()
                .filter(|id| !found.contains(id))
                .map(Uuid::to_string)
                .collect();
            return Err(Error::invalid_request("unknown product ids in sandwich")
                .with_details(json!({
                    "missingProductIds": missing,
                    "code": "unknown_products",
                })));
        }
        Ok(members)
    }
}

#[async_trait]
impl<S, P> SandwichMenu for SandwichMenuService<S, P>
where
    S: SandwichRepository,
    P: ProductRepository,
{
    async fn list_sandwiches(&self) -> Result<Vec<Sandwich>, Error> {
        self.sandwich_repo
            .list()
            .await
            .map_err(map_sandwich_repository_error)
    }

    async fn get_sandwich(&self, id: Uuid) -> Result<Sandwich, Error> {
        self.sandwich_repo
            .find_by_id(&id)
            .await
            .map_err(map_sandwich_repository_error)?
            .ok_or_else(|| Error::not_found(format!("sandwich {id} not found")))
    }

    async fn create_sandwich(&self, draft: SandwichDraft) -> Result<Sandwich, Error> {
        let members = self.resolve_members(&draft.product_ids).await?;
        let sandwich = Sandwich::compose(Uuid::new_v4(), draft.name, draft.size, members);
        self.sandwich_repo
            .insert(&sandwich)
            .await
            .map_err(map_sandwich_repository_error)?;
        Ok(sandwich)
    }

    async fn update_sandwich(&self, id: Uuid, draft: SandwichDraft) -> Result<Sandwich, Error> {
        let members = self.resolve_members(&draft.product_ids).await?;
        let sandwich = Sandwich::compose(id, draft.name, draft.size, members);
        let found = self
            .sandwich_repo
            .update(&sandwich)
            .await
            .map_err(map_sandwich_repository_error)?;
        if !found {
            return Err(Error::not_found(format!("sandwich {id} not found")));
        }
        Ok(sandwich)
    }

    async fn delete_sandwich(&self, id: Uuid) -> Result<(), Error> {
        let found = self
            .sandwich_repo
            .delete(&id)
            .await
            .map_err(map_sandwich_repository_error)?;
        if !found {
            return Err(Error::not_found(format!("sandwich {id} not found")));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "sandwich_menu_tests.rs"]
mod tests;
