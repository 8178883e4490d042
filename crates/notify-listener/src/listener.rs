//! The domain event consumption loop.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use notify_bus::EVENTS_DOMAIN;
use notify_core::config::bus::BusConfig;
use notify_core::events::DomainEvent;
use notify_core::traits::bus::EventBus;
use notify_service::NotificationService;

/// Consumes the inbound domain event channel for the lifetime of the process.
#[derive(Debug)]
pub struct EventListener {
    bus: Arc<dyn EventBus>,
    service: Arc<NotificationService>,
    resubscribe_delay: Duration,
}

impl EventListener {
    /// Create a listener over the given bus and service.
    pub fn new(
        bus: Arc<dyn EventBus>,
        service: Arc<NotificationService>,
        config: &BusConfig,
    ) -> Self {
        Self {
            bus,
            service,
            resubscribe_delay: Duration::from_millis(config.reconnect_delay_ms),
        }
    }

    /// Consume events until the process shuts down.
    ///
    /// One bad message never stops the loop; a closed subscription is
    /// replaced after a short delay, forever.
    pub async fn run(self) {
        loop {
            let mut subscription = match self.bus.subscribe(EVENTS_DOMAIN).await {
                Ok(subscription) => subscription,
                Err(e) => {
                    warn!(error = %e, "Failed to subscribe to domain events, retrying");
                    tokio::time::sleep(self.resubscribe_delay).await;
                    continue;
                }
            };
            info!(channel = EVENTS_DOMAIN, "Listening for domain events");

            while let Some(raw) = subscription.recv().await {
                match DomainEvent::parse(&raw) {
                    Ok(DomainEvent::Unknown { event, .. }) => {
                        debug!(event = %event, "Ignoring unrecognized event type");
                    }
                    Ok(event) => {
                        if let Err(e) = self.handle(event).await {
                            warn!(error = %e, "Event handler failed");
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Dropping malformed event");
                    }
                }
            }

            warn!("Domain event subscription closed, resubscribing");
            tokio::time::sleep(self.resubscribe_delay).await;
        }
    }

    async fn handle(&self, event: DomainEvent) -> notify_core::AppResult<()> {
        crate::handlers::dispatch(&self.service, event).await
    }
}
