//! Broadcast hub distributing stock snapshots to WebSocket sessions.
//!
//! Services publish through the [`StockPublisher`] port; each connected
//! session holds a receiver and forwards frames to its client. The channel
//! never exerts backpressure on publishers: when a session falls behind,
//! its receiver reports the lag and the session catches up from the next
//! snapshot.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::StockSnapshot;
use crate::domain::ports::StockPublisher;

/// Default buffered snapshot count per receiver.
const DEFAULT_CAPACITY: usize = 16;

/// Fan-out channel for stock snapshots.
#[derive(Clone)]
pub struct StockFeed {
    sender: broadcast::Sender<StockSnapshot>,
}

impl StockFeed {
    /// Create a feed buffering up to `capacity` snapshots per receiver.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to snapshots published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<StockSnapshot> {
        self.sender.subscribe()
    }

    /// Number of currently subscribed sessions.
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for StockFeed {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl StockPublisher for StockFeed {
    async fn publish(&self, snapshot: StockSnapshot) {
        // Send only fails when no session is subscribed, which is not an
        // error for a best-effort feed.
        let _ = self.sender.send(snapshot);
    }
}
