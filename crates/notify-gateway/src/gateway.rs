//! The delivery gateway: connection lifecycle, request handling, fan-out.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use notify_bus::NOTIFICATIONS_CREATED;
use notify_core::config::GatewayConfig;
use notify_core::config::bus::BusConfig;
use notify_core::traits::bus::EventBus;
use notify_entity::notification::{MarkAsReadRequest, NotificationCreated};
use notify_service::{ConnectionRegistry, NotificationService};

use crate::connection::{ConnectionHandle, ConnectionId, ConnectionPool};
use crate::messages::{ClientMessage, ServerMessage};
use crate::rooms::{InMemoryRooms, RoomRegistry};

/// Push-delivery gateway for one process.
///
/// Delivery to a user goes through their room; the presence registry in the
/// shared key-value store is bookkeeping only and never the delivery path.
#[derive(Debug)]
pub struct DeliveryGateway {
    pool: ConnectionPool,
    rooms: Arc<dyn RoomRegistry>,
    presence: ConnectionRegistry,
    service: Arc<NotificationService>,
    bus: Arc<dyn EventBus>,
    config: GatewayConfig,
    resubscribe_delay: Duration,
}

impl DeliveryGateway {
    /// Wire up the gateway from its collaborators.
    pub fn new(
        service: Arc<NotificationService>,
        presence: ConnectionRegistry,
        bus: Arc<dyn EventBus>,
        config: GatewayConfig,
        bus_config: &BusConfig,
    ) -> Self {
        Self {
            pool: ConnectionPool::new(),
            rooms: Arc::new(InMemoryRooms::new()),
            presence,
            service,
            bus,
            config,
            resubscribe_delay: Duration::from_millis(bus_config.reconnect_delay_ms),
        }
    }

    /// Register a connection after the handshake has been authenticated
    /// (or explicitly admitted as anonymous).
    ///
    /// An authenticated connection joins its user's room, is recorded in the
    /// presence registry, and immediately receives the unread snapshot and
    /// count. Returns the handle and the outbound message receiver.
    pub async fn register(
        &self,
        user_id: Option<Uuid>,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<ServerMessage>) {
        let (handle, rx) = ConnectionHandle::new(user_id, self.config.send_buffer_size);

        if let Some(user_id) = user_id {
            self.evict_if_at_cap(user_id).await;

            self.pool.add(handle.clone());
            self.rooms.join(user_id, handle.id);
            if let Err(e) = self.presence.add(user_id, &handle.id.to_string()).await {
                warn!(user_id = %user_id, error = %e, "Presence registration failed");
            }

            self.push_unread_state(&handle, user_id, true).await;
            info!(conn_id = %handle.id, user_id = %user_id, "Connection registered");
        } else {
            self.pool.add(handle.clone());
            info!(conn_id = %handle.id, "Anonymous connection registered");
        }

        (handle, rx)
    }

    /// Remove a connection after its transport closed.
    pub async fn unregister(&self, connection_id: ConnectionId) {
        let Some(handle) = self.pool.remove(&connection_id) else {
            return;
        };
        handle.mark_dead();

        if let Some(user_id) = handle.user_id {
            self.rooms.leave(user_id, connection_id);
            if let Err(e) = self
                .presence
                .remove(user_id, &connection_id.to_string())
                .await
            {
                warn!(user_id = %user_id, error = %e, "Presence removal failed");
            }
            info!(conn_id = %connection_id, user_id = %user_id, "Connection unregistered");
        } else {
            info!(conn_id = %connection_id, "Anonymous connection unregistered");
        }
    }

    /// Handle one raw inbound client message.
    ///
    /// Every failure turns into an `error` push; the connection stays open.
    pub async fn handle_message(&self, handle: &ConnectionHandle, raw: &str) {
        let message: ClientMessage = match serde_json::from_str(raw) {
            Ok(message) => message,
            Err(e) => {
                handle.send(ServerMessage::Error {
                    code: "INVALID_MESSAGE".to_string(),
                    message: format!("Failed to parse message: {e}"),
                });
                return;
            }
        };

        match message {
            ClientMessage::JoinNotifications => self.on_join(handle).await,
            ClientMessage::GetNotifications { filter, page } => {
                let Some(user_id) = self.require_user(handle) else {
                    return;
                };
                match self.service.find_all(user_id, &filter, &page).await {
                    Ok(result) => {
                        handle.send(ServerMessage::Notifications { page: result });
                    }
                    Err(e) => {
                        handle.send(ServerMessage::error(&e));
                    }
                }
            }
            ClientMessage::MarkAsRead { notification_ids } => {
                let Some(user_id) = self.require_user(handle) else {
                    return;
                };
                let request = MarkAsReadRequest { notification_ids };
                match self.service.mark_as_read(user_id, &request).await {
                    Ok(marked) => {
                        handle.send(ServerMessage::Marked { marked });
                        self.push_unread_count(handle, user_id).await;
                    }
                    Err(e) => {
                        handle.send(ServerMessage::error(&e));
                    }
                }
            }
        }
    }

    /// Consume the created-notification channel until shutdown.
    ///
    /// One message fans out to every connection in the recipient's room;
    /// a slow connection drops the message rather than stalling the loop.
    pub async fn run_fanout(self: Arc<Self>) {
        loop {
            let mut subscription = match self.bus.subscribe(NOTIFICATIONS_CREATED).await {
                Ok(subscription) => subscription,
                Err(e) => {
                    warn!(error = %e, "Failed to subscribe to created events, retrying");
                    tokio::time::sleep(self.resubscribe_delay).await;
                    continue;
                }
            };
            info!(channel = NOTIFICATIONS_CREATED, "Fan-out subscription open");

            while let Some(raw) = subscription.recv().await {
                match serde_json::from_str::<NotificationCreated>(&raw) {
                    Ok(event) => self.deliver(event).await,
                    Err(e) => warn!(error = %e, "Dropping malformed created event"),
                }
            }

            warn!("Created-event subscription closed, resubscribing");
            tokio::time::sleep(self.resubscribe_delay).await;
        }
    }

    /// Push a message to every connection in one user's room.
    pub fn send_to_user(&self, user_id: Uuid, message: &ServerMessage) {
        for connection_id in self.rooms.members_of(user_id) {
            if let Some(handle) = self.pool.get(&connection_id) {
                handle.send(message.clone());
            }
        }
    }

    /// Push a message to several users' rooms, sequentially.
    pub fn send_to_users(&self, user_ids: &[Uuid], message: &ServerMessage) {
        for user_id in user_ids {
            self.send_to_user(*user_id, message);
        }
    }

    /// Push a message to every connected client, rooms notwithstanding.
    pub fn broadcast(&self, message: &ServerMessage) {
        for handle in self.pool.all() {
            handle.send(message.clone());
        }
    }

    /// Total live connections in this process.
    pub fn connection_count(&self) -> usize {
        self.pool.len()
    }

    async fn deliver(&self, event: NotificationCreated) {
        self.send_to_user(
            event.user_id,
            &ServerMessage::NewNotification {
                notification: event.notification,
            },
        );

        match self.service.unread_count(event.user_id).await {
            Ok(count) => {
                self.send_to_user(event.user_id, &ServerMessage::UnreadCount { count });
            }
            Err(e) => {
                warn!(user_id = %event.user_id, error = %e, "Unread count refresh failed");
            }
        }
    }

    /// Idempotent re-join: confirm and resend the unread count.
    async fn on_join(&self, handle: &ConnectionHandle) {
        handle.send(ServerMessage::Joined {
            status: "success".to_string(),
        });
        if let Some(user_id) = handle.user_id {
            self.rooms.join(user_id, handle.id);
            self.push_unread_count(handle, user_id).await;
        }
    }

    /// Oldest connection gives way when a user hits the connection cap.
    async fn evict_if_at_cap(&self, user_id: Uuid) {
        let existing = self.pool.user_connections(user_id);
        if existing.len() < self.config.max_connections_per_user {
            return;
        }
        if let Some(oldest) = existing.first() {
            warn!(
                user_id = %user_id,
                conn_id = %oldest.id,
                max = self.config.max_connections_per_user,
                "Connection cap reached, replacing oldest connection"
            );
            self.unregister(oldest.id).await;
        }
    }

    async fn push_unread_state(&self, handle: &ConnectionHandle, user_id: Uuid, with_items: bool) {
        match self.service.find_unread(user_id).await {
            Ok(snapshot) => {
                if with_items {
                    handle.send(ServerMessage::UnreadNotifications {
                        notifications: snapshot.items,
                    });
                }
                handle.send(ServerMessage::UnreadCount {
                    count: snapshot.count,
                });
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to load unread state");
            }
        }
    }

    async fn push_unread_count(&self, handle: &ConnectionHandle, user_id: Uuid) {
        match self.service.unread_count(user_id).await {
            Ok(count) => {
                handle.send(ServerMessage::UnreadCount { count });
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to load unread count");
            }
        }
    }

    fn require_user(&self, handle: &ConnectionHandle) -> Option<Uuid> {
        if handle.user_id.is_none() {
            handle.send(ServerMessage::Error {
                code: "AUTH_REQUIRED".to_string(),
                message: "This request requires an authenticated connection".to_string(),
            });
        }
        handle.user_id
    }
}
