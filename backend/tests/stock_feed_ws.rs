//! Stock feed WebSocket tests over a live server.
//!
//! Connects real clients to the upgrade endpoint and checks the feed
//! contract: a snapshot on connect, a broadcast after every stock-affecting
//! mutation, and an acknowledgement for client text frames.

#[expect(
    dead_code,
    reason = "Shared harness has extra helpers used by other integration suites."
)]
#[path = "support/mod.rs"]
mod support;

use actix_web::http::header;
use awc::ws::{Frame, Message};
use futures_util::{SinkExt, StreamExt};
use rstest::rstest;
use serde_json::{Value, json};

use support::{TestApp, id_of, post_json, spawn_app};

type WsSocket = actix_codec::Framed<awc::BoxedSocket, awc::ws::Codec>;

async fn connect(app: &TestApp) -> WsSocket {
    let (_response, socket) = awc::Client::default()
        .ws(format!("{}/ws/stock", app.base_url))
        .set_header(header::ORIGIN, "http://localhost:3000")
        .connect()
        .await
        .expect("websocket connect");
    socket
}

/// Read frames until the next text frame, answering pings on the way.
async fn next_json(socket: &mut WsSocket) -> Value {
    loop {
        let frame = socket.next().await.expect("ws frame").expect("ws frame ok");
        match frame {
            Frame::Text(bytes) => return serde_json::from_slice(&bytes).expect("ws json"),
            Frame::Ping(payload) => {
                socket
                    .send(Message::Pong(payload))
                    .await
                    .expect("send pong");
            }
            Frame::Pong(_) => {}
            other => panic!("unexpected ws frame: {other:?}"),
        }
    }
}

fn cheddar_payload(quantity: i32) -> Value {
    json!({
        "name": "Cheddar",
        "size": "M",
        "weightGrams": 25,
        "colour": "yellow",
        "quantityInStock": quantity,
        "cookTimeSeconds": null,
    })
}

#[rstest]
fn connection_opens_with_the_current_snapshot() {
    actix_rt::System::new().block_on(async move {
        let app = spawn_app().await;
        // Seed before connecting so the greeting reflects existing stock.
        let (status, body) =
            post_json(&app.base_url, "/api/v1/products", &cheddar_payload(8)).await;
        assert_eq!(status, 201, "{body}");

        let mut socket = connect(&app).await;
        let snapshot = next_json(&mut socket).await;
        assert_eq!(snapshot["totalQuantity"], 8);
        let levels = snapshot["products"].as_array().expect("stock levels array");
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0]["name"], "Cheddar");
        assert_eq!(levels[0]["quantity"], 8);

        app.server.stop(true).await;
    });
}

#[rstest]
fn stock_mutations_reach_connected_clients() {
    actix_rt::System::new().block_on(async move {
        let app = spawn_app().await;
        let mut socket = connect(&app).await;
        let greeting = next_json(&mut socket).await;
        assert_eq!(greeting["totalQuantity"], 0);

        let (status, body) =
            post_json(&app.base_url, "/api/v1/products", &cheddar_payload(12)).await;
        assert_eq!(status, 201, "{body}");
        let update = next_json(&mut socket).await;
        assert_eq!(update["totalQuantity"], 12);

        let top_up = format!("/api/v1/products/{}/add-stock", id_of(&body));
        let (status, body) = post_json(&app.base_url, &top_up, &json!({ "amount": 3 })).await;
        assert_eq!(status, 200, "{body}");
        let update = next_json(&mut socket).await;
        assert_eq!(update["totalQuantity"], 15);

        app.server.stop(true).await;
    });
}

#[rstest]
fn text_frames_are_acknowledged() {
    actix_rt::System::new().block_on(async move {
        let app = spawn_app().await;
        let mut socket = connect(&app).await;
        let _greeting = next_json(&mut socket).await;

        socket
            .send(Message::Text("scale offline".into()))
            .await
            .expect("send text");
        let ack = next_json(&mut socket).await;
        assert_eq!(ack["message"], "received: scale offline");

        app.server.stop(true).await;
    });
}
