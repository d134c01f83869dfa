//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ClimateReadingRepository, ScanRepository};
use crate::domain::{OrderDesk, ProductCatalog, SandwichMenu};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub products: Arc<dyn ProductCatalog>,
    pub sandwiches: Arc<dyn SandwichMenu>,
    pub orders: Arc<dyn OrderDesk>,
    pub climate: Arc<dyn ClimateReadingRepository>,
    pub scans: Arc<dyn ScanRepository>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub products: Arc<dyn ProductCatalog>,
    pub sandwiches: Arc<dyn SandwichMenu>,
    pub orders: Arc<dyn OrderDesk>,
    pub climate: Arc<dyn ClimateReadingRepository>,
    pub scans: Arc<dyn ScanRepository>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use kiosk_backend::domain::{
    ///     OrderDeskService, ProductCatalogService, SandwichMenuService,
    /// };
    /// use kiosk_backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use kiosk_backend::outbound::persistence::MemoryRepositories;
    /// use kiosk_backend::outbound::stock_feed::StockFeed;
    ///
    /// let store = Arc::new(MemoryRepositories::new());
    /// let feed = Arc::new(StockFeed::default());
    /// let ports = HttpStatePorts {
    ///     products: Arc::new(ProductCatalogService::new(
    ///         store.clone(),
    ///         store.clone(),
    ///         feed.clone(),
    ///     )),
    ///     sandwiches: Arc::new(SandwichMenuService::new(store.clone(), store.clone())),
    ///     orders: Arc::new(OrderDeskService::new(
    ///         store.clone(),
    ///         store.clone(),
    ///         store.clone(),
    ///         feed,
    ///         Arc::new(DefaultClock),
    ///     )),
    ///     climate: store.clone(),
    ///     scans: store,
    /// };
    /// let state = HttpState::new(ports);
    /// let _products = state.products.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            products,
            sandwiches,
            orders,
            climate,
            scans,
        } = ports;
        Self {
            products,
            sandwiches,
            orders,
            climate,
            scans,
        }
    }
}
