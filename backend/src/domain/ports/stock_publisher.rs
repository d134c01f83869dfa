//! Port for broadcasting stock snapshots to interested listeners.

use async_trait::async_trait;

use crate::domain::StockSnapshot;

/// Outbound port notified whenever stock levels change.
///
/// Publishing is best effort. Adapters absorb delivery failures so a
/// slow or absent listener never blocks the mutation that produced the
/// snapshot.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StockPublisher: Send + Sync {
    /// Publish the latest stock snapshot.
    async fn publish(&self, snapshot: StockSnapshot);
}
