//! Correlation identifier threaded through a request's logs and error
//! payloads.
//!
//! Every HTTP request gets one [`TraceId`] for its lifetime. Rather than
//! passing it down every call, the identifier lives in Tokio task-local
//! storage: middleware opens a scope, and anything running inside it (the
//! handler, domain services, error construction) can read the identifier
//! back with [`TraceId::current`].
//!
//! Task-locals do not follow values into `tokio::spawn` or blocking
//! threads. Re-wrap detached work in [`TraceId::scope`] when the spawned
//! task should log under the originating request.

use std::future::Future;

use tokio::task_local;
use uuid::Uuid;

/// Response header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    /// Identifier for the request the current task is serving.
    pub(crate) static TRACE_ID: TraceId;
}

/// Identifier correlating one request's log lines and error payload.
///
/// # Examples
/// ```
/// use kiosk_backend::TraceId;
///
/// async fn record_stock_move(units: i32) {
///     match TraceId::current() {
///         Some(id) => tracing::info!(%id, units, "stock moved"),
///         None => tracing::info!(units, "stock moved"),
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(pub(crate) Uuid);

impl TraceId {
    /// Mint a fresh random identifier for an incoming request.
    #[must_use]
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID, typically one received from an upstream proxy.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The identifier of the request the current task serves, when inside a
    /// [`TraceId::scope`].
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    /// Borrow the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Run `fut` with `trace_id` readable through [`TraceId::current`].
    ///
    /// # Examples
    /// ```
    /// use kiosk_backend::TraceId;
    /// use uuid::Uuid;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let id = TraceId::from_uuid(Uuid::nil());
    /// let seen = TraceId::scope(id, async { TraceId::current() }).await;
    /// assert_eq!(seen, Some(id));
    /// # });
    /// ```
    pub async fn scope<Fut>(trace_id: TraceId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }
}

impl std::str::FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
