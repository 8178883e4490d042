//! Listener tests over the in-process bus and in-memory store.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use uuid::Uuid;

use notify_bus::{EVENTS_DOMAIN, MemoryEventBus};
use notify_cache::CacheManager;
use notify_cache::memory::MemoryCacheProvider;
use notify_core::config::NotificationsConfig;
use notify_core::config::bus::BusConfig;
use notify_core::config::cache::MemoryCacheConfig;
use notify_core::traits::bus::EventBus;
use notify_database::MemoryNotificationStore;
use notify_entity::notification::NotificationKind;
use notify_listener::EventListener;
use notify_service::NotificationService;

struct Harness {
    service: Arc<NotificationService>,
    bus: Arc<MemoryEventBus>,
}

fn start_listener() -> Harness {
    let store = Arc::new(MemoryNotificationStore::new());
    let cache = CacheManager::from_provider(Arc::new(MemoryCacheProvider::new(
        &MemoryCacheConfig::default(),
    )));
    let bus = Arc::new(MemoryEventBus::new(&BusConfig::default()));
    let service = Arc::new(NotificationService::new(
        store,
        cache,
        bus.clone(),
        &NotificationsConfig::default(),
    ));

    let listener = EventListener::new(bus.clone(), service.clone(), &BusConfig::default());
    tokio::spawn(listener.run());

    Harness { service, bus }
}

impl Harness {
    async fn publish(&self, payload: serde_json::Value) {
        self.bus
            .publish(EVENTS_DOMAIN, &payload.to_string())
            .await
            .unwrap();
    }

    /// Poll until the user's unread count reaches `expected`.
    async fn wait_for_unread(&self, user_id: Uuid, expected: i64) {
        for _ in 0..200 {
            if self.service.unread_count(user_id).await.unwrap() == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "user {user_id} never reached {expected} unread notifications (got {})",
            self.service.unread_count(user_id).await.unwrap()
        );
    }
}

#[tokio::test]
async fn user_registered_produces_a_welcome_notification() {
    let harness = start_listener();
    let user = Uuid::new_v4();

    harness
        .publish(json!({
            "event": "user_registered",
            "data": { "userId": user, "username": "ayako" },
            "service": "auth",
        }))
        .await;

    harness.wait_for_unread(user, 1).await;
    let snapshot = harness.service.find_unread(user).await.unwrap();
    assert_eq!(snapshot.items[0].kind, NotificationKind::Welcome);
    assert!(snapshot.items[0].message.contains("ayako"));
}

#[tokio::test]
async fn user_login_produces_an_alert() {
    let harness = start_listener();
    let user = Uuid::new_v4();

    harness
        .publish(json!({
            "event": "user_login",
            "data": { "userId": user, "ipAddress": "203.0.113.7" },
            "service": "auth",
        }))
        .await;

    harness.wait_for_unread(user, 1).await;
    let snapshot = harness.service.find_unread(user).await.unwrap();
    assert_eq!(snapshot.items[0].kind, NotificationKind::LoginAlert);
}

#[tokio::test]
async fn bad_messages_do_not_stop_the_loop() {
    let harness = start_listener();
    let user = Uuid::new_v4();

    harness.bus.publish(EVENTS_DOMAIN, "not json").await.unwrap();
    harness
        .publish(json!({ "event": "solar_flare", "data": { "x": 1 }, "service": "weather" }))
        .await;
    harness
        .publish(json!({
            "event": "user_registered",
            "data": { "userId": user },
            "service": "auth",
        }))
        .await;

    // The valid event after the garbage still lands.
    harness.wait_for_unread(user, 1).await;
}

#[tokio::test]
async fn upload_completed_confirms_uploader_and_announces_to_others() {
    let harness = start_listener();
    let uploader = Uuid::new_v4();
    let viewer = Uuid::new_v4();

    // The viewer is known to the system through an earlier notification.
    harness
        .service
        .send_welcome(viewer, "viewer")
        .await
        .unwrap();

    harness
        .publish(json!({
            "event": "upload_completed",
            "data": {
                "userId": uploader,
                "fileName": "sunset.mp4",
                "mediaId": "media-42",
                "title": "Sunset over Osaka",
            },
            "service": "media",
        }))
        .await;

    harness.wait_for_unread(uploader, 1).await;
    harness.wait_for_unread(viewer, 2).await;

    let uploader_snapshot = harness.service.find_unread(uploader).await.unwrap();
    assert_eq!(
        uploader_snapshot.items[0].kind,
        NotificationKind::UploadCompleted
    );

    let viewer_snapshot = harness.service.find_unread(viewer).await.unwrap();
    assert!(
        viewer_snapshot
            .items
            .iter()
            .any(|n| n.kind == NotificationKind::NewContent
                && n.message.contains("Sunset over Osaka"))
    );
}

#[tokio::test]
async fn new_comment_notifies_the_owner() {
    let harness = start_listener();
    let owner = Uuid::new_v4();
    let commenter = Uuid::new_v4();

    harness
        .publish(json!({
            "event": "new_comment",
            "data": {
                "ownerId": owner,
                "commenterId": commenter,
                "commenterName": "kenji",
                "mediaId": "media-42",
                "commentId": "comment-7",
                "excerpt": "great shot!",
            },
            "service": "comments",
        }))
        .await;

    harness.wait_for_unread(owner, 1).await;
    let snapshot = harness.service.find_unread(owner).await.unwrap();
    assert_eq!(snapshot.items[0].kind, NotificationKind::NewComment);
    assert!(snapshot.items[0].message.contains("kenji"));
}

#[tokio::test]
async fn own_comments_are_silent() {
    let harness = start_listener();
    let owner = Uuid::new_v4();
    let bystander = Uuid::new_v4();

    harness
        .publish(json!({
            "event": "new_comment",
            "data": {
                "ownerId": owner,
                "commenterId": owner,
                "mediaId": "media-42",
                "commentId": "comment-8",
            },
            "service": "comments",
        }))
        .await;
    // A follow-up event proves the first one was fully processed.
    harness
        .publish(json!({
            "event": "user_registered",
            "data": { "userId": bystander },
            "service": "auth",
        }))
        .await;

    harness.wait_for_unread(bystander, 1).await;
    assert_eq!(harness.service.unread_count(owner).await.unwrap(), 0);
}
