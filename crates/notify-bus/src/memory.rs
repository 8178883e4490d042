//! In-process event bus.

use dashmap::DashMap;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use notify_core::config::bus::BusConfig;
use notify_core::result::AppResult;
use notify_core::traits::bus::{BusSubscription, EventBus};

/// In-process event bus.
///
/// Publishes fan out directly to subscriber queues. A subscriber that falls
/// behind loses messages rather than stalling publishers, matching the
/// fire-and-forget delivery of the Redis backend.
#[derive(Debug)]
pub struct MemoryEventBus {
    /// Subscriber queues per channel.
    subscribers: DashMap<String, Vec<mpsc::Sender<String>>>,
    /// Queue capacity handed to each new subscription.
    buffer_size: usize,
}

impl MemoryEventBus {
    /// Create a new in-process bus from configuration.
    pub fn new(config: &BusConfig) -> Self {
        Self {
            subscribers: DashMap::new(),
            buffer_size: config.subscription_buffer_size,
        }
    }

    /// Number of live subscriptions on a channel.
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.subscribers
            .get(channel)
            .map(|senders| senders.iter().filter(|s| !s.is_closed()).count())
            .unwrap_or(0)
    }
}

#[async_trait]
impl EventBus for MemoryEventBus {
    async fn publish(&self, channel: &str, payload: &str) -> AppResult<()> {
        if let Some(mut senders) = self.subscribers.get_mut(channel) {
            senders.retain(|sender| match sender.try_send(payload.to_string()) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    debug!(channel, "Subscriber queue full, dropping message");
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => false,
            });
        }
        Ok(())
    }

    async fn subscribe(&self, channel: &str) -> AppResult<BusSubscription> {
        let (tx, rx) = mpsc::channel(self.buffer_size);
        self.subscribers
            .entry(channel.to_string())
            .or_default()
            .push(tx);
        Ok(BusSubscription::new(rx))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bus() -> MemoryEventBus {
        MemoryEventBus::new(&BusConfig::default())
    }

    #[tokio::test]
    async fn subscriber_receives_published_messages_in_order() {
        let bus = bus();
        let mut sub = bus.subscribe("events").await.unwrap();

        bus.publish("events", "one").await.unwrap();
        bus.publish("events", "two").await.unwrap();

        assert_eq!(sub.recv().await.as_deref(), Some("one"));
        assert_eq!(sub.recv().await.as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn channels_are_isolated() {
        let bus = bus();
        let mut sub = bus.subscribe("a").await.unwrap();

        bus.publish("b", "elsewhere").await.unwrap();
        bus.publish("a", "here").await.unwrap();

        assert_eq!(sub.recv().await.as_deref(), Some("here"));
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_no_op() {
        let bus = bus();
        bus.publish("empty", "nobody home").await.unwrap();
    }

    #[tokio::test]
    async fn dropped_subscribers_are_pruned() {
        let bus = bus();
        let sub = bus.subscribe("events").await.unwrap();
        drop(sub);

        bus.publish("events", "gone").await.unwrap();
        assert_eq!(bus.subscriber_count("events"), 0);
    }

    #[tokio::test]
    async fn every_subscriber_sees_each_message() {
        let bus = bus();
        let mut first = bus.subscribe("events").await.unwrap();
        let mut second = bus.subscribe("events").await.unwrap();

        bus.publish("events", "hello").await.unwrap();

        assert_eq!(first.recv().await.as_deref(), Some("hello"));
        assert_eq!(second.recv().await.as_deref(), Some("hello"));
    }
}
