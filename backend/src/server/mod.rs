//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;

pub use config::ServerConfig;

#[cfg(feature = "metrics")]
use metrics::MetricsLayer;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::{OrderDeskService, ProductCatalogService, SandwichMenuService};
use crate::inbound::http::climate::{
    create_climate_reading, delete_climate_reading, get_climate_reading, list_climate_readings,
    update_climate_reading,
};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::orders::{
    change_status, create_order, delete_order, get_order, list_orders, update_order, verify_weight,
};
use crate::inbound::http::products::{
    add_stock, create_product, current_stock, delete_product, get_product, list_products,
    update_product,
};
use crate::inbound::http::sandwiches::{
    create_sandwich, delete_sandwich, get_sandwich, list_sandwiches, update_sandwich,
};
use crate::inbound::http::scans::{create_scan, delete_scan, get_scan, list_scans, update_scan};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::ws;
use crate::inbound::ws::state::WsState;
use crate::middleware::Trace;
use crate::outbound::persistence::{
    DieselClimateReadingRepository, DieselOrderRepository, DieselProductRepository,
    DieselSandwichRepository, DieselScanRepository, MemoryRepositories,
};
use crate::outbound::stock_feed::StockFeed;
use mockable::DefaultClock;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

/// Build the shared HTTP state, selecting the persistence adapters.
///
/// Uses the Diesel-backed repositories when a pool is available, otherwise
/// every port is served from a fresh in-memory store. Both variants publish
/// stock snapshots through the given feed so the WebSocket side observes
/// mutations regardless of the backing store.
fn build_http_state(config: &ServerConfig, feed: Arc<StockFeed>) -> web::Data<HttpState> {
    let ports = match &config.db_pool {
        Some(pool) => {
            let products = Arc::new(DieselProductRepository::new(pool.clone()));
            let sandwiches = Arc::new(DieselSandwichRepository::new(pool.clone()));
            let orders = Arc::new(DieselOrderRepository::new(pool.clone()));
            HttpStatePorts {
                products: Arc::new(ProductCatalogService::new(
                    products.clone(),
                    sandwiches.clone(),
                    feed.clone(),
                )),
                sandwiches: Arc::new(SandwichMenuService::new(
                    sandwiches.clone(),
                    products.clone(),
                )),
                orders: Arc::new(OrderDeskService::new(
                    orders,
                    sandwiches,
                    products,
                    feed,
                    Arc::new(DefaultClock),
                )),
                climate: Arc::new(DieselClimateReadingRepository::new(pool.clone())),
                scans: Arc::new(DieselScanRepository::new(pool.clone())),
            }
        }
        None => {
            let store = Arc::new(MemoryRepositories::new());
            HttpStatePorts {
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
                    feed,
                    Arc::new(DefaultClock),
                )),
                climate: store.clone(),
                scans: store,
            }
        }
    };
    web::Data::new(HttpState::new(ports))
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    ws_state: web::Data<WsState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        ws_state,
    } = deps;

    let api = web::scope("/api/v1")
        .service(list_products)
        .service(create_product)
        .service(get_product)
        .service(update_product)
        .service(delete_product)
        .service(add_stock)
        .service(current_stock)
        .service(list_sandwiches)
        .service(create_sandwich)
        .service(get_sandwich)
        .service(update_sandwich)
        .service(delete_sandwich)
        .service(list_orders)
        .service(create_order)
        .service(get_order)
        .service(update_order)
        .service(delete_order)
        .service(change_status)
        .service(verify_weight)
        .service(list_climate_readings)
        .service(create_climate_reading)
        .service(get_climate_reading)
        .service(update_climate_reading)
        .service(delete_climate_reading)
        .service(list_scans)
        .service(create_scan)
        .service(get_scan)
        .service(update_scan)
        .service(delete_scan);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(ws_state)
        .wrap(Trace)
        .service(api)
        .service(ws::ws_entry)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] containing binding, persistence, and
///   optional metrics settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let feed = Arc::new(StockFeed::default());
    let http_state = build_http_state(&config, feed.clone());
    let ws_state = web::Data::new(WsState::new(feed, http_state.products.clone()));
    let ServerConfig {
        bind_addr,
        db_pool: _,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(prometheus);

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            ws_state: ws_state.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
