//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use mockable::DefaultClock;

use crate::domain::{OrderDeskService, ProductCatalogService, SandwichMenuService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::persistence::MemoryRepositories;
use crate::outbound::stock_feed::StockFeed;

/// Build an [`HttpState`] wired to real services over a fresh in-memory store.
///
/// The stock feed is returned alongside so tests can subscribe to broadcasts.
pub fn memory_state() -> (HttpState, Arc<StockFeed>) {
    let store = Arc::new(MemoryRepositories::new());
    let feed = Arc::new(StockFeed::default());
    let ports = HttpStatePorts {
        products: Arc::new(ProductCatalogService::new(
            store.clone(),
            store.clone(),
            feed.clone(),
        )),
        sandwiches: Arc::new(SandwichMenuService::new(store.clone(), store.clone())),
        orders: Arc::new(OrderDeskService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            feed.clone(),
            Arc::new(DefaultClock),
        )),
        climate: store.clone(),
        scans: store,
    };
    (HttpState::new(ports), feed)
}
