//! Shared helper utilities for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, which
//! makes it awkward to share small helpers without copy/paste. This module
//! hosts the in-memory application harness and JSON request plumbing the
//! suites have in common.

use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, rt, web};
use awc::Client;
use mockable::DefaultClock;
use serde_json::Value;

use kiosk_backend::Trace;
use kiosk_backend::domain::{OrderDeskService, ProductCatalogService, SandwichMenuService};
use kiosk_backend::inbound::http::climate::{
    create_climate_reading, delete_climate_reading, get_climate_reading, list_climate_readings,
    update_climate_reading,
};
use kiosk_backend::inbound::http::health::{HealthState, live, ready};
use kiosk_backend::inbound::http::orders::{
    change_status, create_order, delete_order, get_order, list_orders, update_order, verify_weight,
};
use kiosk_backend::inbound::http::products::{
    add_stock, create_product, current_stock, delete_product, get_product, list_products,
    update_product,
};
use kiosk_backend::inbound::http::sandwiches::{
    create_sandwich, delete_sandwich, get_sandwich, list_sandwiches, update_sandwich,
};
use kiosk_backend::inbound::http::scans::{
    create_scan, delete_scan, get_scan, list_scans, update_scan,
};
use kiosk_backend::inbound::http::state::{HttpState, HttpStatePorts};
use kiosk_backend::inbound::ws;
use kiosk_backend::inbound::ws::state::WsState;
use kiosk_backend::outbound::persistence::MemoryRepositories;
use kiosk_backend::outbound::stock_feed::StockFeed;

/// Build an [`HttpState`] wired to real services over a fresh in-memory store.
///
/// The stock feed is returned alongside so tests can subscribe to broadcasts
/// or wire a `WsState` against the same hub.
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

/// Running application bound to an ephemeral loopback port.
pub struct TestApp {
    pub base_url: String,
    pub server: ServerHandle,
    pub health: web::Data<HealthState>,
}

/// Spawn the full application over an in-memory store.
///
/// The server runs on the current Actix system; tests reach it through
/// `base_url`. Readiness is marked before returning, matching production
/// startup.
pub async fn spawn_app() -> TestApp {
    let (state, feed) = memory_state();
    let http_data = web::Data::new(state);
    let ws_data = web::Data::new(WsState::new(feed, http_data.products.clone()));
    let health_data = web::Data::new(HealthState::new());

    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("listener address");

    let app_health = health_data.clone();
    let server = HttpServer::new(move || {
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

        App::new()
            .app_data(app_health.clone())
            .app_data(http_data.clone())
            .app_data(ws_data.clone())
            .wrap(Trace)
            .service(api)
            .service(ws::ws_entry)
            .service(ready)
            .service(live)
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .expect("listen on ephemeral port")
    .run();

    let handle = server.handle();
    rt::spawn(server);
    health_data.mark_ready();

    TestApp {
        base_url: format!("http://{addr}"),
        server: handle,
        health: health_data,
    }
}

fn decode_body(body: &[u8]) -> Value {
    if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(body).expect("json body")
    }
}

/// GET a path and return the status with the decoded body.
pub async fn get_json(base_url: &str, path: &str) -> (u16, Value) {
    let mut response = Client::default()
        .get(format!("{base_url}{path}"))
        .send()
        .await
        .expect("get request");
    let body = response.body().await.expect("response body");
    (response.status().as_u16(), decode_body(&body))
}

/// POST a JSON payload and return the status with the decoded body.
pub async fn post_json(base_url: &str, path: &str, payload: &Value) -> (u16, Value) {
    let mut response = Client::default()
        .post(format!("{base_url}{path}"))
        .send_json(payload)
        .await
        .expect("post request");
    let body = response.body().await.expect("response body");
    (response.status().as_u16(), decode_body(&body))
}

/// PUT a JSON payload and return the status with the decoded body.
pub async fn put_json(base_url: &str, path: &str, payload: &Value) -> (u16, Value) {
    let mut response = Client::default()
        .put(format!("{base_url}{path}"))
        .send_json(payload)
        .await
        .expect("put request");
    let body = response.body().await.expect("response body");
    (response.status().as_u16(), decode_body(&body))
}

/// DELETE a path and return the response status.
pub async fn delete(base_url: &str, path: &str) -> u16 {
    let response = Client::default()
        .delete(format!("{base_url}{path}"))
        .send()
        .await
        .expect("delete request");
    response.status().as_u16()
}

/// Extract the `id` field from a JSON payload.
pub fn id_of(value: &Value) -> String {
    value
        .get("id")
        .and_then(Value::as_str)
        .expect("payload id")
        .to_owned()
}
