//! In-memory implementations of the repository ports.
//!
//! One shared store backs all five ports so the server can run without a
//! database. Cross-entity rules behave the way the PostgreSQL adapters do:
//! names and barcodes stay unique, deleting a product drops it from
//! sandwich memberships, live orders block sandwich deletion, and order
//! completion checks every stock debit before applying any of them.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use crate::domain::ports::{
    ClimateReadingRepository, ClimateReadingRepositoryError, OrderRepository,
    OrderRepositoryError, ProductRepository, ProductRepositoryError, SandwichRepository,
    SandwichRepositoryError, ScanRepository, ScanRepositoryError,
};
use crate::domain::{ClimateReading, Order, Product, Sandwich, Scan, StockDebit};

/// Shared in-memory store implementing every repository port.
///
/// Clones share the same state, mirroring how the Diesel adapters share a
/// connection pool.
#[derive(Clone, Default)]
pub struct MemoryRepositories {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    products: HashMap<Uuid, Product>,
    sandwiches: HashMap<Uuid, Sandwich>,
    orders: HashMap<Uuid, Order>,
    climate_readings: HashMap<Uuid, ClimateReading>,
    scans: HashMap<Uuid, Scan>,
}

impl MemoryRepositories {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> Result<MutexGuard<'_, MemoryState>, &'static str> {
        self.state.lock().map_err(|_| "memory store poisoned")
    }
}

fn duplicate_product_name(state: &MemoryState, id: Uuid, name: &str) -> bool {
    state
        .products
        .values()
        .any(|product| product.id != id && product.name == name)
}

fn duplicate_sandwich_name(state: &MemoryState, id: Uuid, name: &str) -> bool {
    state
        .sandwiches
        .values()
        .any(|sandwich| sandwich.id != id && sandwich.name == name)
}

fn duplicate_order_barcode(state: &MemoryState, id: Uuid, barcode: &str) -> bool {
    state
        .orders
        .values()
        .any(|order| order.id != id && order.barcode.as_deref() == Some(barcode))
}

/// Mirror a product write into stored sandwich memberships, the way the
/// membership join reflects the products table. Stored totals are left
/// alone; recomputing them is the services' job.
fn reflect_product(state: &mut MemoryState, product: &Product) {
    for sandwich in state.sandwiches.values_mut() {
        for member in sandwich.products.iter_mut() {
            if member.id == product.id {
                *member = product.clone();
            }
        }
    }
}

#[async_trait]
impl ProductRepository for MemoryRepositories {
    async fn list(&self) -> Result<Vec<Product>, ProductRepositoryError> {
        let state = self.guard().map_err(ProductRepositoryError::connection)?;
        let mut products: Vec<Product> = state.products.values().cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(products)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Product>, ProductRepositoryError> {
        let state = self.guard().map_err(ProductRepositoryError::connection)?;
        Ok(state.products.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, ProductRepositoryError> {
        let state = self.guard().map_err(ProductRepositoryError::connection)?;
        Ok(ids
            .iter()
            .filter_map(|id| state.products.get(id).cloned())
            .collect())
    }

    async fn insert(&self, product: &Product) -> Result<(), ProductRepositoryError> {
        let mut state = self.guard().map_err(ProductRepositoryError::connection)?;
        if duplicate_product_name(&state, product.id, &product.name) {
            return Err(ProductRepositoryError::duplicate_name(
                product.name.as_str(),
            ));
        }
        state.products.insert(product.id, product.clone());
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<bool, ProductRepositoryError> {
        let mut state = self.guard().map_err(ProductRepositoryError::connection)?;
        if !state.products.contains_key(&product.id) {
            return Ok(false);
        }
        if duplicate_product_name(&state, product.id, &product.name) {
            return Err(ProductRepositoryError::duplicate_name(
                product.name.as_str(),
            ));
        }
        state.products.insert(product.id, product.clone());
        reflect_product(&mut state, product);
        Ok(true)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, ProductRepositoryError> {
        let mut state = self.guard().map_err(ProductRepositoryError::connection)?;
        if state.products.remove(id).is_none() {
            return Ok(false);
        }
        for sandwich in state.sandwiches.values_mut() {
            sandwich.products.retain(|member| member.id != *id);
        }
        Ok(true)
    }

    async fn add_stock(
        &self,
        id: &Uuid,
        amount: i32,
    ) -> Result<Option<Product>, ProductRepositoryError> {
        let mut state = self.guard().map_err(ProductRepositoryError::connection)?;
        let updated = match state.products.get_mut(id) {
            Some(product) => {
                let next = product
                    .quantity_in_stock
                    .checked_add(amount)
                    .ok_or_else(|| ProductRepositoryError::query("stock level out of range"))?;
                product.quantity_in_stock = next;
                product.clone()
            }
            None => return Ok(None),
        };
        reflect_product(&mut state, &updated);
        Ok(Some(updated))
    }
}

#[async_trait]
impl SandwichRepository for MemoryRepositories {
    async fn list(&self) -> Result<Vec<Sandwich>, SandwichRepositoryError> {
        let state = self.guard().map_err(SandwichRepositoryError::connection)?;
        let mut sandwiches: Vec<Sandwich> = state.sandwiches.values().cloned().collect();
        sandwiches.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(sandwiches)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Sandwich>, SandwichRepositoryError> {
        let state = self.guard().map_err(SandwichRepositoryError::connection)?;
        Ok(state.sandwiches.get(id).cloned())
    }

    async fn insert(&self, sandwich: &Sandwich) -> Result<(), SandwichRepositoryError> {
        let mut state = self.guard().map_err(SandwichRepositoryError::connection)?;
        if duplicate_sandwich_name(&state, sandwich.id, &sandwich.name) {
            return Err(SandwichRepositoryError::duplicate_name(
                sandwich.name.as_str(),
            ));
        }
        state.sandwiches.insert(sandwich.id, sandwich.clone());
        Ok(())
    }

    async fn update(&self, sandwich: &Sandwich) -> Result<bool, SandwichRepositoryError> {
        let mut state = self.guard().map_err(SandwichRepositoryError::connection)?;
        if !state.sandwiches.contains_key(&sandwich.id) {
            return Ok(false);
        }
        if duplicate_sandwich_name(&state, sandwich.id, &sandwich.name) {
            return Err(SandwichRepositoryError::duplicate_name(
                sandwich.name.as_str(),
            ));
        }
        state.sandwiches.insert(sandwich.id, sandwich.clone());
        Ok(true)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, SandwichRepositoryError> {
        let mut state = self.guard().map_err(SandwichRepositoryError::connection)?;
        if state.orders.values().any(|order| order.sandwich_id == *id) {
            return Err(SandwichRepositoryError::referenced());
        }
        Ok(state.sandwiches.remove(id).is_some())
    }

    async fn list_containing_product(
        &self,
        product_id: &Uuid,
    ) -> Result<Vec<Sandwich>, SandwichRepositoryError> {
        let state = self.guard().map_err(SandwichRepositoryError::connection)?;
        let mut containing: Vec<Sandwich> = state
            .sandwiches
            .values()
            .filter(|sandwich| sandwich.products.iter().any(|member| member.id == *product_id))
            .cloned()
            .collect();
        containing.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(containing)
    }
}

#[async_trait]
impl OrderRepository for MemoryRepositories {
    async fn list(&self) -> Result<Vec<Order>, OrderRepositoryError> {
        let state = self.guard().map_err(OrderRepositoryError::connection)?;
        let mut orders: Vec<Order> = state.orders.values().cloned().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Order>, OrderRepositoryError> {
        let state = self.guard().map_err(OrderRepositoryError::connection)?;
        Ok(state.orders.get(id).cloned())
    }

    async fn insert(&self, order: &Order) -> Result<(), OrderRepositoryError> {
        let mut state = self.guard().map_err(OrderRepositoryError::connection)?;
        if let Some(barcode) = order.barcode.as_deref() {
            if duplicate_order_barcode(&state, order.id, barcode) {
                return Err(OrderRepositoryError::duplicate_barcode(barcode));
            }
        }
        state.orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn update(&self, order: &Order) -> Result<bool, OrderRepositoryError> {
        let mut state = self.guard().map_err(OrderRepositoryError::connection)?;
        if !state.orders.contains_key(&order.id) {
            return Ok(false);
        }
        if let Some(barcode) = order.barcode.as_deref() {
            if duplicate_order_barcode(&state, order.id, barcode) {
                return Err(OrderRepositoryError::duplicate_barcode(barcode));
            }
        }
        state.orders.insert(order.id, order.clone());
        Ok(true)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, OrderRepositoryError> {
        let mut state = self.guard().map_err(OrderRepositoryError::connection)?;
        Ok(state.orders.remove(id).is_some())
    }

    async fn complete(
        &self,
        order: &Order,
        debits: &[StockDebit],
    ) -> Result<(), OrderRepositoryError> {
        let mut state = self.guard().map_err(OrderRepositoryError::connection)?;

        if !state.orders.contains_key(&order.id) {
            return Err(OrderRepositoryError::query("record not found"));
        }
        if let Some(barcode) = order.barcode.as_deref() {
            if duplicate_order_barcode(&state, order.id, barcode) {
                return Err(OrderRepositoryError::duplicate_barcode(barcode));
            }
        }

        // Check every debit before touching anything so a shortfall leaves
        // the store untouched.
        for debit in debits {
            let covered = state
                .products
                .get(&debit.product_id)
                .is_some_and(|product| product.quantity_in_stock >= debit.amount);
            if !covered {
                let product = state
                    .products
                    .get(&debit.product_id)
                    .map(|product| product.name.clone())
                    .unwrap_or_else(|| debit.product_id.to_string());
                return Err(OrderRepositoryError::insufficient_stock(product));
            }
        }

        for debit in debits {
            let updated = match state.products.get_mut(&debit.product_id) {
                Some(product) => {
                    product.quantity_in_stock -= debit.amount;
                    product.clone()
                }
                None => continue,
            };
            reflect_product(&mut state, &updated);
        }
        state.orders.insert(order.id, order.clone());
        Ok(())
    }
}

#[async_trait]
impl ClimateReadingRepository for MemoryRepositories {
    async fn list(&self) -> Result<Vec<ClimateReading>, ClimateReadingRepositoryError> {
        let state = self
            .guard()
            .map_err(ClimateReadingRepositoryError::connection)?;
        let mut readings: Vec<ClimateReading> = state.climate_readings.values().cloned().collect();
        readings.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at).then(b.id.cmp(&a.id)));
        Ok(readings)
    }

    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<ClimateReading>, ClimateReadingRepositoryError> {
        let state = self
            .guard()
            .map_err(ClimateReadingRepositoryError::connection)?;
        Ok(state.climate_readings.get(id).cloned())
    }

    async fn insert(&self, reading: &ClimateReading) -> Result<(), ClimateReadingRepositoryError> {
        let mut state = self
            .guard()
            .map_err(ClimateReadingRepositoryError::connection)?;
        state.climate_readings.insert(reading.id, reading.clone());
        Ok(())
    }

    async fn update(
        &self,
        reading: &ClimateReading,
    ) -> Result<bool, ClimateReadingRepositoryError> {
        let mut state = self
            .guard()
            .map_err(ClimateReadingRepositoryError::connection)?;
        if !state.climate_readings.contains_key(&reading.id) {
            return Ok(false);
        }
        state.climate_readings.insert(reading.id, reading.clone());
        Ok(true)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, ClimateReadingRepositoryError> {
        let mut state = self
            .guard()
            .map_err(ClimateReadingRepositoryError::connection)?;
        Ok(state.climate_readings.remove(id).is_some())
    }
}

#[async_trait]
impl ScanRepository for MemoryRepositories {
    async fn list(&self) -> Result<Vec<Scan>, ScanRepositoryError> {
        let state = self.guard().map_err(ScanRepositoryError::connection)?;
        let mut scans: Vec<Scan> = state.scans.values().cloned().collect();
        scans.sort_by(|a, b| b.scanned_at.cmp(&a.scanned_at).then(b.id.cmp(&a.id)));
        Ok(scans)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Scan>, ScanRepositoryError> {
        let state = self.guard().map_err(ScanRepositoryError::connection)?;
        Ok(state.scans.get(id).cloned())
    }

    async fn insert(&self, scan: &Scan) -> Result<(), ScanRepositoryError> {
        let mut state = self.guard().map_err(ScanRepositoryError::connection)?;
        state.scans.insert(scan.id, scan.clone());
        Ok(())
    }

    async fn update(&self, scan: &Scan) -> Result<bool, ScanRepositoryError> {
        let mut state = self.guard().map_err(ScanRepositoryError::connection)?;
        if !state.scans.contains_key(&scan.id) {
            return Ok(false);
        }
        state.scans.insert(scan.id, scan.clone());
        Ok(true)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, ScanRepositoryError> {
        let mut state = self.guard().map_err(ScanRepositoryError::connection)?;
        Ok(state.scans.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the relational rules the in-memory store mirrors.

    use chrono::Utc;

    use crate::domain::{Colour, OrderStatus, Size};

    use super::*;

    fn product(name: &str, stock: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            size: Size::M,
            weight_grams: 120,
            colour: Colour::Yellow,
            quantity_in_stock: stock,
            cook_time_seconds: Some(90),
        }
    }

    fn sandwich(name: &str, products: Vec<Product>) -> Sandwich {
        Sandwich::compose(Uuid::new_v4(), name.to_string(), Size::M, products)
    }

    fn order_for(sandwich: &Sandwich, quantity: i32) -> Order {
        Order {
            id: Uuid::new_v4(),
            sandwich_id: sandwich.id,
            quantity,
            weight_total_grams: sandwich.weight_total_grams * quantity,
            cook_time_total_seconds: sandwich.cook_time_seconds * quantity,
            status: OrderStatus::Pending,
            barcode: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn products_list_sorts_by_name() {
        let repo = MemoryRepositories::new();
        ProductRepository::insert(&repo, &product("rye", 5))
            .await
            .unwrap();
        ProductRepository::insert(&repo, &product("brioche", 5))
            .await
            .unwrap();

        let products = ProductRepository::list(&repo).await.unwrap();

        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["brioche", "rye"]);
    }

    #[tokio::test]
    async fn duplicate_product_names_are_rejected() {
        let repo = MemoryRepositories::new();
        ProductRepository::insert(&repo, &product("rye", 5))
            .await
            .unwrap();

        let error = ProductRepository::insert(&repo, &product("rye", 9))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            ProductRepositoryError::DuplicateName { ref name } if name == "rye"
        ));
    }

    #[tokio::test]
    async fn find_by_ids_follows_requested_order() {
        let repo = MemoryRepositories::new();
        let first = product("rye", 5);
        let second = product("brioche", 5);
        ProductRepository::insert(&repo, &first).await.unwrap();
        ProductRepository::insert(&repo, &second).await.unwrap();

        let found = repo
            .find_by_ids(&[first.id, Uuid::new_v4(), second.id])
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, first.id);
        assert_eq!(found[1].id, second.id);
    }

    #[tokio::test]
    async fn deleting_a_product_drops_it_from_memberships() {
        let repo = MemoryRepositories::new();
        let toast = product("toast", 5);
        let ham = product("ham", 5);
        ProductRepository::insert(&repo, &toast).await.unwrap();
        ProductRepository::insert(&repo, &ham).await.unwrap();
        let croque = sandwich("croque", vec![toast.clone(), ham.clone()]);
        SandwichRepository::insert(&repo, &croque).await.unwrap();

        assert!(ProductRepository::delete(&repo, &ham.id).await.unwrap());

        let stored = SandwichRepository::find_by_id(&repo, &croque.id)
            .await
            .unwrap()
            .expect("sandwich still present");
        assert_eq!(stored.products.len(), 1);
        assert_eq!(stored.products[0].id, toast.id);
    }

    #[tokio::test]
    async fn product_updates_reflect_into_memberships() {
        let repo = MemoryRepositories::new();
        let mut toast = product("toast", 5);
        ProductRepository::insert(&repo, &toast).await.unwrap();
        let croque = sandwich("croque", vec![toast.clone()]);
        SandwichRepository::insert(&repo, &croque).await.unwrap();

        toast.weight_grams = 200;
        assert!(ProductRepository::update(&repo, &toast).await.unwrap());

        let stored = SandwichRepository::find_by_id(&repo, &croque.id)
            .await
            .unwrap()
            .expect("sandwich still present");
        assert_eq!(stored.products[0].weight_grams, 200);
        // Stored totals are untouched until a service recomposes them.
        assert_eq!(stored.weight_total_grams, croque.weight_total_grams);
    }

    #[tokio::test]
    async fn sandwich_delete_is_blocked_while_orders_reference_it() {
        let repo = MemoryRepositories::new();
        let croque = sandwich("croque", vec![]);
        SandwichRepository::insert(&repo, &croque).await.unwrap();
        let order = order_for(&croque, 1);
        OrderRepository::insert(&repo, &order).await.unwrap();

        let error = SandwichRepository::delete(&repo, &croque.id)
            .await
            .unwrap_err();
        assert_eq!(error, SandwichRepositoryError::Referenced);

        assert!(OrderRepository::delete(&repo, &order.id).await.unwrap());
        assert!(SandwichRepository::delete(&repo, &croque.id).await.unwrap());
    }

    #[tokio::test]
    async fn complete_applies_every_debit_and_stores_the_order() {
        let repo = MemoryRepositories::new();
        let toast = product("toast", 10);
        let ham = product("ham", 10);
        ProductRepository::insert(&repo, &toast).await.unwrap();
        ProductRepository::insert(&repo, &ham).await.unwrap();
        let croque = sandwich("croque", vec![toast.clone(), ham.clone()]);
        SandwichRepository::insert(&repo, &croque).await.unwrap();
        let mut order = order_for(&croque, 3);
        OrderRepository::insert(&repo, &order).await.unwrap();

        order.status = OrderStatus::Done;
        let debits = [
            StockDebit {
                product_id: toast.id,
                amount: 3,
            },
            StockDebit {
                product_id: ham.id,
                amount: 3,
            },
        ];
        repo.complete(&order, &debits).await.unwrap();

        let toast_after = ProductRepository::find_by_id(&repo, &toast.id)
            .await
            .unwrap()
            .expect("toast present");
        assert_eq!(toast_after.quantity_in_stock, 7);
        let stored = OrderRepository::find_by_id(&repo, &order.id)
            .await
            .unwrap()
            .expect("order present");
        assert_eq!(stored.status, OrderStatus::Done);
    }

    #[tokio::test]
    async fn complete_shortfall_leaves_the_store_untouched() {
        let repo = MemoryRepositories::new();
        let toast = product("toast", 10);
        let ham = product("ham", 2);
        ProductRepository::insert(&repo, &toast).await.unwrap();
        ProductRepository::insert(&repo, &ham).await.unwrap();
        let croque = sandwich("croque", vec![toast.clone(), ham.clone()]);
        SandwichRepository::insert(&repo, &croque).await.unwrap();
        let mut order = order_for(&croque, 3);
        OrderRepository::insert(&repo, &order).await.unwrap();

        order.status = OrderStatus::Done;
        let debits = [
            StockDebit {
                product_id: toast.id,
                amount: 3,
            },
            StockDebit {
                product_id: ham.id,
                amount: 3,
            },
        ];
        let error = repo.complete(&order, &debits).await.unwrap_err();

        assert!(matches!(
            error,
            OrderRepositoryError::InsufficientStock { ref product } if product == "ham"
        ));
        let toast_after = ProductRepository::find_by_id(&repo, &toast.id)
            .await
            .unwrap()
            .expect("toast present");
        assert_eq!(toast_after.quantity_in_stock, 10);
        let stored = OrderRepository::find_by_id(&repo, &order.id)
            .await
            .unwrap()
            .expect("order present");
        assert_eq!(stored.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn complete_rejects_unknown_orders() {
        let repo = MemoryRepositories::new();
        let croque = sandwich("croque", vec![]);
        let mut order = order_for(&croque, 1);
        order.status = OrderStatus::Done;

        let error = repo.complete(&order, &[]).await.unwrap_err();

        assert!(matches!(error, OrderRepositoryError::Query { .. }));
    }

    #[tokio::test]
    async fn duplicate_barcodes_are_rejected() {
        let repo = MemoryRepositories::new();
        let croque = sandwich("croque", vec![]);
        SandwichRepository::insert(&repo, &croque).await.unwrap();
        let mut first = order_for(&croque, 1);
        first.barcode = Some("KSK-0042".to_string());
        OrderRepository::insert(&repo, &first).await.unwrap();
        let mut second = order_for(&croque, 1);
        second.barcode = Some("KSK-0042".to_string());

        let error = OrderRepository::insert(&repo, &second).await.unwrap_err();

        assert!(matches!(
            error,
            OrderRepositoryError::DuplicateBarcode { ref barcode } if barcode == "KSK-0042"
        ));
    }

    #[tokio::test]
    async fn scans_list_newest_first() {
        let repo = MemoryRepositories::new();
        let older = Scan {
            id: Uuid::new_v4(),
            code: "A-1".to_string(),
            weight_grams: 140,
            scanned_at: Utc::now() - chrono::Duration::minutes(5),
        };
        let newer = Scan {
            id: Uuid::new_v4(),
            code: "A-2".to_string(),
            weight_grams: 150,
            scanned_at: Utc::now(),
        };
        ScanRepository::insert(&repo, &older).await.unwrap();
        ScanRepository::insert(&repo, &newer).await.unwrap();

        let scans = ScanRepository::list(&repo).await.unwrap();

        assert_eq!(scans[0].code, "A-2");
        assert_eq!(scans[1].code, "A-1");
    }

    #[tokio::test]
    async fn add_stock_on_unknown_product_returns_none() {
        let repo = MemoryRepositories::new();

        let updated = repo.add_stock(&Uuid::new_v4(), 5).await.unwrap();

        assert!(updated.is_none());
    }
}
