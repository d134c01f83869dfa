//! WebSocket-focused test helpers.
//!
//! Integration tests under `backend/tests/` compile as separate crates, so
//! sharing small WebSocket setup helpers helps avoid copy/paste drift.

use std::sync::Arc;

use kiosk_backend::domain::ProductCatalogService;
use kiosk_backend::inbound::ws::state::WsState;
use kiosk_backend::outbound::persistence::MemoryRepositories;
use kiosk_backend::outbound::stock_feed::StockFeed;

/// Build a `WsState` over a fresh in-memory catalog and broadcast hub.
///
/// This helper hides the repetitive service wiring and keeps setup consistent
/// across integration test crates.
pub fn ws_state() -> WsState {
    let store = Arc::new(MemoryRepositories::new());
    let feed = Arc::new(StockFeed::default());
    let catalog = Arc::new(ProductCatalogService::new(
        store.clone(),
        store,
        feed.clone(),
    ));
    WsState::new(feed, catalog)
}
