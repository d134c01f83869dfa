//! Shared WebSocket adapter state.
//!
//! WebSocket entry points depend on the broadcast hub and the catalog port
//! instead of constructing domain services directly. This keeps the adapter
//! testable with in-memory state and keeps side effects out of the session
//! loop.

use std::sync::Arc;

use crate::domain::ProductCatalog;
use crate::outbound::stock_feed::StockFeed;

/// Dependency bundle for WebSocket handlers.
#[derive(Clone)]
pub struct WsState {
    /// Hub every session subscribes to for snapshot broadcasts.
    pub feed: Arc<StockFeed>,
    /// Catalog port backing the initial snapshot sent on connect.
    pub catalog: Arc<dyn ProductCatalog>,
}

impl WsState {
    /// Construct state from the feed and the catalog port.
    pub fn new(feed: Arc<StockFeed>, catalog: Arc<dyn ProductCatalog>) -> Self {
        Self { feed, catalog }
    }
}
