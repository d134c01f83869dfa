//! End-to-end order lifecycle tests over a live HTTP server.
//!
//! Drives the real Actix handlers over real sockets against the in-memory
//! repositories: building the menu, taking orders, completing them at the
//! hatch, and holding the stock invariant when completion is impossible.

#[expect(
    dead_code,
    reason = "Shared harness has extra helpers used by other integration suites."
)]
#[path = "support/mod.rs"]
mod support;

use rstest::rstest;
use serde_json::{Value, json};

use support::{TestApp, get_json, id_of, post_json, put_json, spawn_app};

fn product_payload(name: &str, weight_grams: i32, quantity: i32, cook_time: Option<i32>) -> Value {
    json!({
        "name": name,
        "size": "M",
        "weightGrams": weight_grams,
        "colour": "yellow",
        "quantityInStock": quantity,
        "cookTimeSeconds": cook_time,
    })
}

async fn seed_product(
    app: &TestApp,
    name: &str,
    weight_grams: i32,
    quantity: i32,
    cook_time: Option<i32>,
) -> String {
    let payload = product_payload(name, weight_grams, quantity, cook_time);
    let (status, body) = post_json(&app.base_url, "/api/v1/products", &payload).await;
    assert_eq!(status, 201, "{body}");
    id_of(&body)
}

async fn seed_sandwich(app: &TestApp, name: &str, product_ids: &[&str]) -> Value {
    let payload = json!({ "name": name, "size": "L", "productIds": product_ids });
    let (status, body) = post_json(&app.base_url, "/api/v1/sandwiches", &payload).await;
    assert_eq!(status, 201, "{body}");
    body
}

async fn seed_order(app: &TestApp, sandwich_id: &str, quantity: i32) -> Value {
    let payload = json!({ "sandwichId": sandwich_id, "quantity": quantity });
    let (status, body) = post_json(&app.base_url, "/api/v1/orders", &payload).await;
    assert_eq!(status, 201, "{body}");
    body
}

async fn stock_snapshot(app: &TestApp) -> Value {
    let (status, body) = get_json(&app.base_url, "/api/v1/stock").await;
    assert_eq!(status, 200, "{body}");
    body
}

async fn quantity_of(app: &TestApp, product_id: &str) -> i64 {
    let snapshot = stock_snapshot(app).await;
    snapshot["products"]
        .as_array()
        .expect("stock levels array")
        .iter()
        .find(|level| level["id"] == product_id)
        .and_then(|level| level["quantity"].as_i64())
        .expect("known product level")
}

#[rstest]
fn completing_an_order_draws_member_stock_once() {
    actix_rt::System::new().block_on(async move {
        let app = spawn_app().await;
        let bread = seed_product(&app, "Sourdough", 100, 10, Some(120)).await;
        let cheese = seed_product(&app, "Comté", 25, 8, Some(90)).await;

        let sandwich = seed_sandwich(&app, "Grilled Cheese", &[&bread, &cheese]).await;
        assert_eq!(sandwich["weightTotalGrams"], 125);
        assert_eq!(sandwich["cookTimeSeconds"], 120);

        let order = seed_order(&app, &id_of(&sandwich), 2).await;
        assert_eq!(order["status"], "pending");
        assert_eq!(order["weightTotalGrams"], 250);
        assert_eq!(order["cookTimeTotalSeconds"], 240);

        let transition = format!("/api/v1/orders/{}/change-status", id_of(&order));

        let (status, body) =
            post_json(&app.base_url, &transition, &json!({ "status": "cooking" })).await;
        assert_eq!(status, 200, "{body}");
        assert_eq!(body["status"], "cooking");
        assert_eq!(stock_snapshot(&app).await["totalQuantity"], 18);

        let (status, body) =
            post_json(&app.base_url, &transition, &json!({ "status": "done" })).await;
        assert_eq!(status, 200, "{body}");
        assert_eq!(body["status"], "done");
        assert_eq!(quantity_of(&app, &bread).await, 8);
        assert_eq!(quantity_of(&app, &cheese).await, 6);

        // Saving an already-done order must not draw a second time.
        let (status, body) =
            post_json(&app.base_url, &transition, &json!({ "status": "done" })).await;
        assert_eq!(status, 200, "{body}");
        assert_eq!(stock_snapshot(&app).await["totalQuantity"], 14);

        app.server.stop(true).await;
    });
}

#[rstest]
fn shortfall_rejects_completion_and_preserves_state() {
    actix_rt::System::new().block_on(async move {
        let app = spawn_app().await;
        let brie = seed_product(&app, "Brie", 30, 1, None).await;
        let sandwich = seed_sandwich(&app, "Brie Baguette", &[&brie]).await;
        let order_id = id_of(&seed_order(&app, &id_of(&sandwich), 3).await);

        let (status, body) = post_json(
            &app.base_url,
            &format!("/api/v1/orders/{order_id}/change-status"),
            &json!({ "status": "done" }),
        )
        .await;
        assert_eq!(status, 409, "{body}");
        assert_eq!(body["code"], "conflict");
        assert_eq!(body["details"]["code"], "insufficient_stock");
        assert_eq!(body["details"]["product"], "Brie");

        let (status, fetched) =
            get_json(&app.base_url, &format!("/api/v1/orders/{order_id}")).await;
        assert_eq!(status, 200, "{fetched}");
        assert_eq!(fetched["status"], "pending");
        assert_eq!(quantity_of(&app, &brie).await, 1);

        app.server.stop(true).await;
    });
}

#[rstest]
fn scale_reading_completes_or_requeues_the_order() {
    actix_rt::System::new().block_on(async move {
        let app = spawn_app().await;
        let ham = seed_product(&app, "Ham", 100, 10, Some(60)).await;
        let sandwich_id = id_of(&seed_sandwich(&app, "Ham Single", &[&ham]).await);

        let confirmed = seed_order(&app, &sandwich_id, 2).await;
        let (status, body) = post_json(
            &app.base_url,
            "/api/v1/verify-weight",
            &json!({ "orderId": id_of(&confirmed), "measuredGrams": 204 }),
        )
        .await;
        assert_eq!(status, 200, "{body}");
        assert_eq!(body["status"], "done");
        assert_eq!(quantity_of(&app, &ham).await, 8);

        let requeued = seed_order(&app, &sandwich_id, 1).await;
        let (status, body) = post_json(
            &app.base_url,
            "/api/v1/verify-weight",
            &json!({ "orderId": id_of(&requeued), "measuredGrams": 110 }),
        )
        .await;
        assert_eq!(status, 200, "{body}");
        assert_eq!(body["status"], "pending");
        assert_eq!(quantity_of(&app, &ham).await, 8);

        app.server.stop(true).await;
    });
}

#[rstest]
fn replacement_crossing_into_done_draws_stock() {
    actix_rt::System::new().block_on(async move {
        let app = spawn_app().await;
        let tuna = seed_product(&app, "Tuna", 80, 5, None).await;
        let sandwich_id = id_of(&seed_sandwich(&app, "Tuna Melt", &[&tuna]).await);
        let order_id = id_of(&seed_order(&app, &sandwich_id, 1).await);

        let (status, body) = put_json(
            &app.base_url,
            &format!("/api/v1/orders/{order_id}"),
            &json!({ "sandwichId": sandwich_id, "quantity": 1, "status": "done" }),
        )
        .await;
        assert_eq!(status, 200, "{body}");
        assert_eq!(body["status"], "done");
        assert_eq!(quantity_of(&app, &tuna).await, 4);

        app.server.stop(true).await;
    });
}

#[rstest]
fn order_created_directly_done_does_not_draw_stock() {
    actix_rt::System::new().block_on(async move {
        let app = spawn_app().await;
        let egg = seed_product(&app, "Egg", 50, 5, None).await;
        let sandwich_id = id_of(&seed_sandwich(&app, "Egg Mayo", &[&egg]).await);

        let payload = json!({ "sandwichId": sandwich_id, "quantity": 2, "status": "done" });
        let (status, body) = post_json(&app.base_url, "/api/v1/orders", &payload).await;
        assert_eq!(status, 201, "{body}");
        assert_eq!(body["status"], "done");
        assert_eq!(quantity_of(&app, &egg).await, 5);

        app.server.stop(true).await;
    });
}

#[rstest]
fn order_for_unknown_sandwich_is_rejected() {
    actix_rt::System::new().block_on(async move {
        let app = spawn_app().await;

        let payload = json!({
            "sandwichId": "5f64a0ac-6f24-4ec6-97a2-0b5bb9d579f6",
            "quantity": 1,
        });
        let (status, body) = post_json(&app.base_url, "/api/v1/orders", &payload).await;
        assert_eq!(status, 400, "{body}");
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], "sandwichId");

        app.server.stop(true).await;
    });
}
