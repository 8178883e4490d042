//! Redis pub/sub event bus.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use redis::aio::ConnectionManager;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use notify_core::config::bus::BusConfig;
use notify_core::error::{AppError, ErrorKind};
use notify_core::result::AppResult;
use notify_core::traits::bus::{BusSubscription, EventBus};

/// Redis pub/sub event bus for multi-node deployments.
///
/// Publishing rides a shared multiplexed connection. Each subscription owns
/// a dedicated pub/sub connection driven by a background task; on transport
/// failure the task reconnects indefinitely with a fixed delay, so consumers
/// never observe the outage beyond a gap in messages.
#[derive(Debug, Clone)]
pub struct RedisEventBus {
    /// Client used to open new pub/sub connections.
    client: redis::Client,
    /// Shared connection for PUBLISH commands.
    publish_conn: ConnectionManager,
    /// Delay between reconnection attempts.
    reconnect_delay: Duration,
    /// Queue capacity handed to each new subscription.
    buffer_size: usize,
}

impl RedisEventBus {
    /// Connect to Redis and build the bus.
    pub async fn connect(config: &BusConfig) -> AppResult<Self> {
        let client = redis::Client::open(config.redis_url.as_str()).map_err(|e| {
            AppError::with_source(ErrorKind::Bus, "Failed to create Redis bus client", e)
        })?;

        let publish_conn = ConnectionManager::new(client.clone()).await.map_err(|e| {
            AppError::with_source(ErrorKind::Bus, "Failed to connect to Redis bus", e)
        })?;

        info!("Connected to Redis event bus");
        Ok(Self {
            client,
            publish_conn,
            reconnect_delay: Duration::from_millis(config.reconnect_delay_ms),
            buffer_size: config.subscription_buffer_size,
        })
    }
}

#[async_trait]
impl EventBus for RedisEventBus {
    async fn publish(&self, channel: &str, payload: &str) -> AppResult<()> {
        let mut conn = self.publish_conn.clone();
        redis::cmd("PUBLISH")
            .arg(channel)
            .arg(payload)
            .query_async::<i64>(&mut conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Bus, "Redis PUBLISH failed", e))?;
        Ok(())
    }

    async fn subscribe(&self, channel: &str) -> AppResult<BusSubscription> {
        let (tx, rx) = mpsc::channel(self.buffer_size);
        let client = self.client.clone();
        let channel = channel.to_string();
        let delay = self.reconnect_delay;

        tokio::spawn(async move {
            loop {
                match client.get_async_pubsub().await {
                    Ok(mut pubsub) => {
                        if let Err(e) = pubsub.subscribe(&channel).await {
                            warn!(channel = %channel, error = %e, "Redis SUBSCRIBE failed");
                        } else {
                            info!(channel = %channel, "Subscribed to Redis channel");
                            let mut stream = pubsub.on_message();
                            while let Some(msg) = stream.next().await {
                                let payload: String = match msg.get_payload() {
                                    Ok(payload) => payload,
                                    Err(e) => {
                                        warn!(channel = %channel, error = %e, "Unreadable bus payload");
                                        continue;
                                    }
                                };
                                if tx.send(payload).await.is_err() {
                                    debug!(channel = %channel, "Subscription dropped, ending relay");
                                    return;
                                }
                            }
                            warn!(channel = %channel, "Redis subscription stream ended");
                        }
                    }
                    Err(e) => {
                        warn!(channel = %channel, error = %e, "Redis pub/sub connection failed");
                    }
                }
                if tx.is_closed() {
                    return;
                }
                tokio::time::sleep(delay).await;
            }
        });

        Ok(BusSubscription::new(rx))
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.publish_conn.clone();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Bus, "Redis PING failed", e))?;
        Ok(pong == "PONG")
    }
}
