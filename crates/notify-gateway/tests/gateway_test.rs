//! Gateway tests over in-memory backends.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;
use uuid::Uuid;

use notify_bus::{MemoryEventBus, NOTIFICATIONS_CREATED};
use notify_cache::CacheManager;
use notify_cache::memory::MemoryCacheProvider;
use notify_core::config::bus::BusConfig;
use notify_core::config::cache::MemoryCacheConfig;
use notify_core::config::{GatewayConfig, NotificationsConfig};
use notify_database::MemoryNotificationStore;
use notify_entity::notification::{CreateNotificationRequest, NotificationKind};
use notify_gateway::{DeliveryGateway, ServerMessage};
use notify_service::{ConnectionRegistry, NotificationService};

struct Harness {
    service: Arc<NotificationService>,
    gateway: Arc<DeliveryGateway>,
}

async fn start_gateway(gateway_config: GatewayConfig) -> Harness {
    let store = Arc::new(MemoryNotificationStore::new());
    let cache = CacheManager::from_provider(Arc::new(MemoryCacheProvider::new(
        &MemoryCacheConfig::default(),
    )));
    let bus = Arc::new(MemoryEventBus::new(&BusConfig::default()));
    let service = Arc::new(NotificationService::new(
        store,
        cache.clone(),
        bus.clone(),
        &NotificationsConfig::default(),
    ));
    let presence = ConnectionRegistry::new(cache, Duration::from_secs(300));

    let gateway = Arc::new(DeliveryGateway::new(
        service.clone(),
        presence,
        bus.clone(),
        gateway_config,
        &BusConfig::default(),
    ));
    tokio::spawn(gateway.clone().run_fanout());

    // Fan-out must be subscribed before any test publishes.
    for _ in 0..200 {
        if bus.subscriber_count(NOTIFICATIONS_CREATED) > 0 {
            return Harness { service, gateway };
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("fan-out task never subscribed");
}

async fn recv(rx: &mut mpsc::Receiver<ServerMessage>) -> ServerMessage {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for a server message")
        .expect("connection channel closed")
}

fn request(user_id: Uuid) -> CreateNotificationRequest {
    CreateNotificationRequest::new(
        user_id,
        NotificationKind::Welcome,
        "Welcome to Lumen",
        "Your account is ready.",
    )
}

#[tokio::test]
async fn registration_pushes_the_unread_snapshot() {
    let harness = start_gateway(GatewayConfig::default()).await;
    let user = Uuid::new_v4();
    harness.service.create(request(user)).await.unwrap();
    harness.service.create(request(user)).await.unwrap();

    let (_handle, mut rx) = harness.gateway.register(Some(user)).await;

    match recv(&mut rx).await {
        ServerMessage::UnreadNotifications { notifications } => {
            assert_eq!(notifications.len(), 2);
        }
        other => panic!("expected unread snapshot, got {other:?}"),
    }
    match recv(&mut rx).await {
        ServerMessage::UnreadCount { count } => assert_eq!(count, 2),
        other => panic!("expected unread count, got {other:?}"),
    }
}

#[tokio::test]
async fn a_live_connection_receives_created_notifications_without_polling() {
    let harness = start_gateway(GatewayConfig::default()).await;
    let user = Uuid::new_v4();
    let (_handle, mut rx) = harness.gateway.register(Some(user)).await;

    // Drain the empty snapshot pushed on registration.
    recv(&mut rx).await;
    recv(&mut rx).await;

    let created = harness.service.create(request(user)).await.unwrap();

    match recv(&mut rx).await {
        ServerMessage::NewNotification { notification } => {
            assert_eq!(notification.id, created.id);
        }
        other => panic!("expected new_notification, got {other:?}"),
    }
    match recv(&mut rx).await {
        ServerMessage::UnreadCount { count } => assert_eq!(count, 1),
        other => panic!("expected unread count, got {other:?}"),
    }
}

#[tokio::test]
async fn notifications_for_other_users_stay_out_of_the_room() {
    let harness = start_gateway(GatewayConfig::default()).await;
    let user = Uuid::new_v4();
    let (_handle, mut rx) = harness.gateway.register(Some(user)).await;
    recv(&mut rx).await;
    recv(&mut rx).await;

    harness.service.create(request(Uuid::new_v4())).await.unwrap();
    harness.service.create(request(user)).await.unwrap();

    // The first push this connection sees is the user's own notification.
    match recv(&mut rx).await {
        ServerMessage::NewNotification { notification } => {
            assert_eq!(notification.user_id, user);
        }
        other => panic!("expected new_notification, got {other:?}"),
    }
}

#[tokio::test]
async fn join_confirms_and_resends_the_unread_count() {
    let harness = start_gateway(GatewayConfig::default()).await;
    let user = Uuid::new_v4();
    let (handle, mut rx) = harness.gateway.register(Some(user)).await;
    recv(&mut rx).await;
    recv(&mut rx).await;

    harness
        .gateway
        .handle_message(&handle, &json!({"type": "join_notifications"}).to_string())
        .await;

    match recv(&mut rx).await {
        ServerMessage::Joined { status } => assert_eq!(status, "success"),
        other => panic!("expected joined, got {other:?}"),
    }
    assert!(matches!(
        recv(&mut rx).await,
        ServerMessage::UnreadCount { count: 0 }
    ));
}

#[tokio::test]
async fn get_notifications_replies_with_a_page() {
    let harness = start_gateway(GatewayConfig::default()).await;
    let user = Uuid::new_v4();
    harness.service.create(request(user)).await.unwrap();

    let (handle, mut rx) = harness.gateway.register(Some(user)).await;
    recv(&mut rx).await;
    recv(&mut rx).await;

    harness
        .gateway
        .handle_message(&handle, &json!({"type": "get_notifications"}).to_string())
        .await;

    match recv(&mut rx).await {
        ServerMessage::Notifications { page } => {
            assert_eq!(page.total_items, 1);
            assert_eq!(page.items[0].user_id, user);
        }
        other => panic!("expected notifications page, got {other:?}"),
    }
}

#[tokio::test]
async fn mark_as_read_replies_with_count_and_refreshed_unread() {
    let harness = start_gateway(GatewayConfig::default()).await;
    let user = Uuid::new_v4();
    let first = harness.service.create(request(user)).await.unwrap();
    harness.service.create(request(user)).await.unwrap();

    let (handle, mut rx) = harness.gateway.register(Some(user)).await;
    recv(&mut rx).await;
    recv(&mut rx).await;

    harness
        .gateway
        .handle_message(
            &handle,
            &json!({"type": "mark_as_read", "notification_ids": [first.id]}).to_string(),
        )
        .await;

    assert!(matches!(recv(&mut rx).await, ServerMessage::Marked { marked: 1 }));
    assert!(matches!(
        recv(&mut rx).await,
        ServerMessage::UnreadCount { count: 1 }
    ));
}

#[tokio::test]
async fn anonymous_requests_get_an_error_but_keep_the_connection() {
    let harness = start_gateway(GatewayConfig::default()).await;
    let (handle, mut rx) = harness.gateway.register(None).await;

    harness
        .gateway
        .handle_message(&handle, &json!({"type": "get_notifications"}).to_string())
        .await;
    match recv(&mut rx).await {
        ServerMessage::Error { code, .. } => assert_eq!(code, "AUTH_REQUIRED"),
        other => panic!("expected error, got {other:?}"),
    }

    // Still usable afterwards.
    harness
        .gateway
        .handle_message(&handle, &json!({"type": "join_notifications"}).to_string())
        .await;
    assert!(matches!(recv(&mut rx).await, ServerMessage::Joined { .. }));
}

#[tokio::test]
async fn unparseable_messages_get_a_structured_error() {
    let harness = start_gateway(GatewayConfig::default()).await;
    let (handle, mut rx) = harness.gateway.register(None).await;

    harness.gateway.handle_message(&handle, "not json").await;

    match recv(&mut rx).await {
        ServerMessage::Error { code, .. } => assert_eq!(code, "INVALID_MESSAGE"),
        other => panic!("expected error, got {other:?}"),
    }
}

#[tokio::test]
async fn the_oldest_connection_is_replaced_at_the_cap() {
    let config = GatewayConfig {
        max_connections_per_user: 1,
        ..GatewayConfig::default()
    };
    let harness = start_gateway(config).await;
    let user = Uuid::new_v4();

    let (first, _rx1) = harness.gateway.register(Some(user)).await;
    let (second, _rx2) = harness.gateway.register(Some(user)).await;

    assert!(!first.is_alive());
    assert!(second.is_alive());
    assert_eq!(harness.gateway.connection_count(), 1);
}

#[tokio::test]
async fn broadcast_reaches_every_connection() {
    let harness = start_gateway(GatewayConfig::default()).await;
    let user = Uuid::new_v4();
    let (_auth, mut auth_rx) = harness.gateway.register(Some(user)).await;
    let (_anon, mut anon_rx) = harness.gateway.register(None).await;
    recv(&mut auth_rx).await;
    recv(&mut auth_rx).await;

    harness.gateway.broadcast(&ServerMessage::BroadcastNotification {
        title: "Maintenance".to_string(),
        message: "Back in five minutes.".to_string(),
        data: None,
    });

    assert!(matches!(
        recv(&mut auth_rx).await,
        ServerMessage::BroadcastNotification { .. }
    ));
    assert!(matches!(
        recv(&mut anon_rx).await,
        ServerMessage::BroadcastNotification { .. }
    ));
}

#[tokio::test]
async fn disconnect_leaves_the_room() {
    let harness = start_gateway(GatewayConfig::default()).await;
    let user = Uuid::new_v4();
    let (handle, mut rx) = harness.gateway.register(Some(user)).await;
    recv(&mut rx).await;
    recv(&mut rx).await;

    harness.gateway.unregister(handle.id).await;
    harness.service.create(request(user)).await.unwrap();

    // Nothing more arrives on the closed connection.
    let outcome = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
    assert!(outcome.is_err() || outcome == Ok(None));
}
