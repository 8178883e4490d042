//! Event bus trait for pluggable pub/sub backends.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::result::AppResult;

/// A live subscription to one bus channel.
///
/// Messages arrive in publish order for a single channel. The backing task
/// owns the transport connection; if the transport drops, the backend
/// reconnects and resumes feeding this receiver, so `recv` returning `None`
/// means the bus itself was shut down.
#[derive(Debug)]
pub struct BusSubscription {
    receiver: mpsc::Receiver<String>,
}

impl BusSubscription {
    /// Wrap a receiver produced by a bus backend.
    pub fn new(receiver: mpsc::Receiver<String>) -> Self {
        Self { receiver }
    }

    /// Receive the next raw message, or `None` when the bus shut down.
    pub async fn recv(&mut self) -> Option<String> {
        self.receiver.recv().await
    }
}

/// Trait for pub/sub backends (Redis or in-process).
///
/// Delivery is at-least-once for connected subscribers and best-effort
/// overall; durable state always lives in the notification store, never
/// on the bus.
#[async_trait]
pub trait EventBus: Send + Sync + std::fmt::Debug + 'static {
    /// Publish a raw message to a channel.
    async fn publish(&self, channel: &str, payload: &str) -> AppResult<()>;

    /// Subscribe to a channel.
    ///
    /// The returned subscription survives transient transport failures;
    /// reconnection is the backend's responsibility.
    async fn subscribe(&self, channel: &str) -> AppResult<BusSubscription>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
