//! Tests for the server bootstrap, covering state wiring and readiness
//! signalling.

use super::*;
use rstest::{fixture, rstest};

#[fixture]
fn health_state() -> web::Data<HealthState> {
    web::Data::new(HealthState::new())
}

#[fixture]
fn loopback_config() -> ServerConfig {
    ServerConfig::new("127.0.0.1:0".parse().expect("loopback address parses"))
}

#[rstest]
fn config_reports_bind_addr(loopback_config: ServerConfig) {
    assert_eq!(loopback_config.bind_addr().to_string(), "127.0.0.1:0");
}

#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready(
    health_state: web::Data<HealthState>,
    loopback_config: ServerConfig,
) {
    assert!(!health_state.is_ready(), "state should start unready");

    let _server =
        create_server(health_state.clone(), loopback_config).expect("server should build");

    assert!(
        health_state.is_ready(),
        "server creation should mark readiness"
    );
}

#[cfg(feature = "metrics")]
#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready_with_metrics(
    health_state: web::Data<HealthState>,
    loopback_config: ServerConfig,
) {
    use actix_web_prom::PrometheusMetricsBuilder;

    let prometheus = PrometheusMetricsBuilder::new("test")
        .endpoint("/metrics")
        .build()
        .expect("metrics should build for tests");

    let _server = create_server(
        health_state.clone(),
        loopback_config.with_metrics(Some(prometheus)),
    )
    .expect("server should build with metrics");

    assert!(
        health_state.is_ready(),
        "server creation should mark readiness"
    );
}

#[rstest]
#[actix_rt::test]
async fn state_without_pool_serves_in_memory_ports(loopback_config: ServerConfig) {
    let state = build_http_state(&loopback_config, Arc::new(StockFeed::default()));

    let products = state
        .products
        .list_products()
        .await
        .expect("product port should answer");
    assert!(products.is_empty(), "fresh store should hold no products");

    let snapshot = state
        .products
        .stock_snapshot()
        .await
        .expect("stock port should answer");
    assert_eq!(snapshot.total_quantity, 0);
}

#[rstest]
#[actix_rt::test]
async fn state_mutations_reach_feed_subscribers(loopback_config: ServerConfig) {
    use crate::domain::{Colour, ProductDraft, Size};

    let feed = Arc::new(StockFeed::default());
    let state = build_http_state(&loopback_config, feed.clone());
    let mut updates = feed.subscribe();

    state
        .products
        .create_product(ProductDraft {
            name: "Cheddar".to_owned(),
            size: Size::M,
            weight_grams: 25,
            colour: Colour::Yellow,
            quantity_in_stock: 8,
            cook_time_seconds: None,
        })
        .await
        .expect("product should be created");

    let snapshot = updates.recv().await.expect("snapshot should broadcast");
    assert_eq!(snapshot.total_quantity, 8);
}
