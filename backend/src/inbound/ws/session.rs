//! Per-connection WebSocket handler.
//!
//! Keeps WebSocket framing and heartbeats at the edge. A session pushes the
//! current stock snapshot on connect, forwards every broadcast snapshot,
//! and acknowledges client text frames. The public WebSocket contract pings
//! every 5s and considers a connection idle after 10s without client
//! traffic. Tests shorten these intervals to speed up feedback; adjust the
//! constants below if SLAs change so clients and intermediaries stay
//! aligned.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::sync::broadcast;
use tokio::time;
use tracing::warn;

use crate::domain::{ProductCatalog, StockSnapshot};
use crate::inbound::ws::messages::ReceivedResponse;
use crate::outbound::stock_feed::StockFeed;

/// Time between heartbeats to the client (5s in production, shorter in tests).
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client (10s in production, shorter in tests).
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

pub(super) async fn handle_ws_session(
    catalog: Arc<dyn ProductCatalog>,
    feed: Arc<StockFeed>,
    session: Session,
    stream: MessageStream,
) {
    WsSession::new(catalog, feed).run(session, stream).await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    Network(Closed),
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

struct WsSession {
    catalog: Arc<dyn ProductCatalog>,
    feed: Arc<StockFeed>,
}

impl WsSession {
    fn new(catalog: Arc<dyn ProductCatalog>, feed: Arc<StockFeed>) -> Self {
        Self { catalog, feed }
    }

    async fn run(&self, mut session: Session, mut stream: MessageStream) {
        // Subscribe before the initial send so a snapshot published in
        // between is not lost.
        let mut updates = self.feed.subscribe();

        if let Err(error) = self.send_initial_snapshot(&mut session).await {
            self.shut_down(session, &error).await;
            return;
        }

        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    self.handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                update = updates.recv() => {
                    self.handle_stock_update(&mut session, update).await
                }
                message = stream.recv() => {
                    self.handle_stream_message(&mut session, &mut last_heartbeat, message)
                        .await
                }
            };

            if let Err(error) = result {
                self.shut_down(session, &error).await;
                return;
            }
        }
    }

    /// Send the current snapshot so late subscribers start from a
    /// consistent view.
    ///
    /// A failed stock read is logged and skipped; the session stays up and
    /// catches up from the next broadcast.
    async fn send_initial_snapshot(&self, session: &mut Session) -> Result<(), SessionError> {
        match self.catalog.stock_snapshot().await {
            Ok(snapshot) => self
                .send_json(session, &snapshot)
                .await
                .map_err(SessionError::Network),
            Err(error) => {
                warn!(error = %error, "skipping initial stock snapshot after failed stock read");
                Ok(())
            }
        }
    }

    async fn handle_heartbeat_tick(
        &self,
        session: &mut Session,
        last_heartbeat: &Instant,
    ) -> Result<(), SessionError> {
        if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
            return Err(SessionError::HeartbeatTimeout);
        }

        session.ping(b"").await.map_err(SessionError::Network)
    }

    /// Forward a broadcast snapshot to the client.
    ///
    /// A lagged receiver drops the missed snapshots: the next one received
    /// is always the freshest state, so there is nothing worth replaying.
    async fn handle_stock_update(
        &self,
        session: &mut Session,
        update: Result<StockSnapshot, broadcast::error::RecvError>,
    ) -> Result<(), SessionError> {
        match update {
            Ok(snapshot) => self
                .send_json(session, &snapshot)
                .await
                .map_err(SessionError::Network),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "stock feed receiver lagged; continuing from the next snapshot");
                Ok(())
            }
            Err(broadcast::error::RecvError::Closed) => Err(SessionError::StreamClosed),
        }
    }

    async fn handle_stream_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let Some(message) = message else {
            return Err(SessionError::StreamClosed);
        };

        match message {
            Ok(message) => self.handle_message(session, last_heartbeat, message).await,
            Err(error) => Err(SessionError::Protocol(error)),
        }
    }

    async fn handle_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Message,
    ) -> Result<(), SessionError> {
        match message {
            Message::Ping(payload) => {
                *last_heartbeat = Instant::now();
                session
                    .pong(&payload)
                    .await
                    .map_err(SessionError::Network)?;
                Ok(())
            }
            Message::Text(text) => {
                *last_heartbeat = Instant::now();
                self.handle_text_message(session, text.as_ref()).await
            }
            Message::Pong(_) | Message::Binary(_) | Message::Continuation(_) | Message::Nop => {
                *last_heartbeat = Instant::now();
                Ok(())
            }
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        }
    }

    async fn handle_text_message(
        &self,
        session: &mut Session,
        text: &str,
    ) -> Result<(), SessionError> {
        let response = ReceivedResponse::acknowledging(text);
        self.send_json(session, &response)
            .await
            .map_err(SessionError::Network)
    }

    async fn send_json<T: serde::Serialize>(
        &self,
        session: &mut Session,
        payload: &T,
    ) -> Result<(), Closed> {
        match serde_json::to_string(payload) {
            Ok(body) => session.text(body).await,
            Err(error) => {
                warn!(error = %error, "Failed to serialise WebSocket payload");
                Ok(())
            }
        }
    }

    async fn shut_down(&self, session: Session, error: &SessionError) {
        self.log_shutdown_reason(error);
        let close_action = self.close_action_for(error);
        self.close_session_if_needed(session, close_action).await;
    }

    fn log_shutdown_reason(&self, error: &SessionError) {
        match error {
            SessionError::HeartbeatTimeout => {
                warn!("WebSocket heartbeat timeout; closing connection");
            }
            SessionError::Protocol(error) => {
                warn!(error = %error, "WebSocket protocol error");
            }
            SessionError::Network(error) => {
                warn!(error = %error, "WebSocket send failed; closing connection");
            }
            SessionError::ClientClosed(_) | SessionError::StreamClosed => {}
        }
    }

    fn close_action_for(&self, error: &SessionError) -> CloseAction {
        match error {
            SessionError::HeartbeatTimeout => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Normal,
                description: Some("heartbeat timeout".to_owned()),
            })),
            SessionError::Protocol(_) => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Protocol,
                description: Some("protocol error".to_owned()),
            })),
            SessionError::ClientClosed(reason) => CloseAction::Close(reason.clone()),
            SessionError::StreamClosed | SessionError::Network(_) => CloseAction::None,
        }
    }

    async fn close_session_if_needed(&self, session: Session, close_action: CloseAction) {
        if let CloseAction::Close(reason) = close_action {
            if let Err(error) = session.close(reason).await {
                warn!(error = %error, "Failed to close WebSocket session");
            }
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
