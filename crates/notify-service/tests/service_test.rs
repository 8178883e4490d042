//! End-to-end tests of the notification service over in-memory backends.

use std::sync::Arc;

use uuid::Uuid;

use notify_bus::{MemoryEventBus, NOTIFICATIONS_CREATED};
use notify_cache::CacheManager;
use notify_cache::memory::MemoryCacheProvider;
use notify_core::config::NotificationsConfig;
use notify_core::config::bus::BusConfig;
use notify_core::config::cache::MemoryCacheConfig;
use notify_core::error::ErrorKind;
use notify_core::traits::bus::EventBus;
use notify_core::types::pagination::PageRequest;
use notify_database::{MemoryNotificationStore, NotificationStore};
use notify_entity::notification::{
    BroadcastRequest, CreateNotificationRequest, DeliveryChannel, MarkAsReadRequest,
    NotificationCreated, NotificationFilter, NotificationKind, Priority,
    UpdateNotificationRequest,
};
use notify_service::NotificationService;

fn service_with(config: NotificationsConfig) -> (NotificationService, Arc<MemoryEventBus>) {
    let store = Arc::new(MemoryNotificationStore::new());
    let cache = CacheManager::from_provider(Arc::new(MemoryCacheProvider::new(
        &MemoryCacheConfig::default(),
    )));
    let bus = Arc::new(MemoryEventBus::new(&BusConfig::default()));
    let service = NotificationService::new(store, cache, bus.clone(), &config);
    (service, bus)
}

fn service() -> (NotificationService, Arc<MemoryEventBus>) {
    service_with(NotificationsConfig::default())
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
async fn create_applies_defaults() {
    let (service, _bus) = service();
    let user = Uuid::new_v4();

    let created = service.create(request(user)).await.unwrap();

    assert_eq!(created.user_id, user);
    assert_eq!(created.priority, Priority::Medium);
    assert_eq!(created.channels.0, DeliveryChannel::defaults());
    assert!(!created.is_read);
    assert!(created.read_at.is_none());
}

#[tokio::test]
async fn create_publishes_created_event() {
    let (service, bus) = service();
    let mut sub = bus.subscribe(NOTIFICATIONS_CREATED).await.unwrap();
    let user = Uuid::new_v4();

    let created = service.create(request(user)).await.unwrap();

    let raw = sub.recv().await.expect("created event on the bus");
    let event: NotificationCreated = serde_json::from_str(&raw).unwrap();
    assert_eq!(event.user_id, user);
    assert_eq!(event.notification.id, created.id);
}

#[tokio::test]
async fn eleventh_create_in_window_is_refused() {
    let (service, _bus) = service();
    let user = Uuid::new_v4();

    for _ in 0..10 {
        service.create(request(user)).await.unwrap();
    }

    let err = service.create(request(user)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::RateLimit);

    // The refused creation left no row behind.
    let page = service
        .find_all(user, &NotificationFilter::default(), &PageRequest::new(1, 100))
        .await
        .unwrap();
    assert_eq!(page.total_items, 10);

    // Other users are unaffected.
    service.create(request(Uuid::new_v4())).await.unwrap();
}

#[tokio::test]
async fn creation_invalidates_the_unread_snapshot() {
    let (service, _bus) = service();
    let user = Uuid::new_v4();

    service.create(request(user)).await.unwrap();
    assert_eq!(service.find_unread(user).await.unwrap().count, 1);

    service.create(request(user)).await.unwrap();

    // A stale snapshot would still say 1 here.
    let snapshot = service.find_unread(user).await.unwrap();
    assert_eq!(snapshot.count, 2);
    assert_eq!(snapshot.items.len(), 2);
}

#[tokio::test]
async fn mark_all_as_read_is_idempotent() {
    let (service, _bus) = service();
    let user = Uuid::new_v4();
    for _ in 0..3 {
        service.create(request(user)).await.unwrap();
    }

    let changed = service
        .mark_as_read(user, &MarkAsReadRequest::default())
        .await
        .unwrap();
    assert_eq!(changed, 3);
    assert_eq!(service.unread_count(user).await.unwrap(), 0);

    let again = service
        .mark_as_read(user, &MarkAsReadRequest::default())
        .await
        .unwrap();
    assert_eq!(again, 0);
}

#[tokio::test]
async fn mark_as_read_with_ids_touches_only_those() {
    let (service, _bus) = service();
    let user = Uuid::new_v4();
    let first = service.create(request(user)).await.unwrap();
    let _second = service.create(request(user)).await.unwrap();

    let changed = service
        .mark_as_read(
            user,
            &MarkAsReadRequest {
                notification_ids: Some(vec![first.id]),
            },
        )
        .await
        .unwrap();

    assert_eq!(changed, 1);
    assert_eq!(service.unread_count(user).await.unwrap(), 1);
}

#[tokio::test]
async fn unread_count_ignores_a_stale_snapshot() {
    let store = Arc::new(MemoryNotificationStore::new());
    let cache = CacheManager::from_provider(Arc::new(MemoryCacheProvider::new(
        &MemoryCacheConfig::default(),
    )));
    let bus = Arc::new(MemoryEventBus::new(&BusConfig::default()));
    let service =
        NotificationService::new(store.clone(), cache, bus, &NotificationsConfig::default());
    let user = Uuid::new_v4();

    let created = service.create(request(user)).await.unwrap();
    // Populate the snapshot cache.
    assert_eq!(service.find_unread(user).await.unwrap().count, 1);

    // Read state changes behind the service's back; the snapshot still says 1.
    store
        .set_read(created.id, user, true, chrono::Utc::now())
        .await
        .unwrap();

    assert_eq!(service.unread_count(user).await.unwrap(), 0);
}

#[tokio::test]
async fn another_users_notification_reads_as_absent() {
    let (service, _bus) = service();
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let created = service.create(request(owner)).await.unwrap();

    let err = service.find_one(created.id, stranger).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = service
        .update(
            created.id,
            stranger,
            UpdateNotificationRequest {
                is_read: Some(true),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = service.remove(created.id, stranger).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    // The owner still sees it, untouched.
    let mine = service.find_one(created.id, owner).await.unwrap();
    assert!(!mine.is_read);
}

#[tokio::test]
async fn update_marks_a_single_notification_read() {
    let (service, _bus) = service();
    let user = Uuid::new_v4();
    let created = service.create(request(user)).await.unwrap();

    let updated = service
        .update(
            created.id,
            user,
            UpdateNotificationRequest {
                is_read: Some(true),
            },
        )
        .await
        .unwrap();

    assert!(updated.is_read);
    assert!(updated.read_at.is_some());
    assert_eq!(service.unread_count(user).await.unwrap(), 0);
}

#[tokio::test]
async fn broadcast_reaches_every_known_user_except_the_excluded() {
    let (service, _bus) = service();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let actor = Uuid::new_v4();
    for user in [alice, bob, actor] {
        service.create(request(user)).await.unwrap();
    }

    let outcome = service
        .create_broadcast(BroadcastRequest {
            kind: NotificationKind::SystemAnnouncement,
            title: "Maintenance tonight".to_string(),
            message: "Lumen will be briefly unavailable at 02:00 UTC.".to_string(),
            data: None,
            priority: Some(Priority::High),
            exclude_user_id: Some(actor),
        })
        .await
        .unwrap();

    assert_eq!(outcome.recipients, 2);
    assert_eq!(outcome.delivered, 2);
    assert_eq!(outcome.failed, 0);
    assert_eq!(service.unread_count(alice).await.unwrap(), 2);
    assert_eq!(service.unread_count(actor).await.unwrap(), 1);
}

#[tokio::test]
async fn broadcast_counts_per_recipient_failures() {
    let config = NotificationsConfig {
        rate_limit_max: 2,
        ..NotificationsConfig::default()
    };
    let (service, _bus) = service_with(config);
    let exhausted = Uuid::new_v4();
    let fresh = Uuid::new_v4();

    // `exhausted` burns its whole window; `fresh` has room left.
    service.create(request(exhausted)).await.unwrap();
    service.create(request(exhausted)).await.unwrap();
    service.create(request(fresh)).await.unwrap();

    let outcome = service
        .create_broadcast(BroadcastRequest {
            kind: NotificationKind::SystemAnnouncement,
            title: "Heads up".to_string(),
            message: "Something happened.".to_string(),
            data: None,
            priority: None,
            exclude_user_id: None,
        })
        .await
        .unwrap();

    assert_eq!(outcome.recipients, 2);
    assert_eq!(outcome.delivered, 1);
    assert_eq!(outcome.failed, 1);
    assert_eq!(service.unread_count(fresh).await.unwrap(), 2);
    assert_eq!(service.unread_count(exhausted).await.unwrap(), 2);
}

#[tokio::test]
async fn cleanup_removes_only_expired_notifications() {
    let (service, _bus) = service();
    let user = Uuid::new_v4();

    let expired = CreateNotificationRequest {
        expires_at: Some(chrono::Utc::now() - chrono::Duration::minutes(1)),
        ..request(user)
    };
    service.create(expired).await.unwrap();
    service.create(request(user)).await.unwrap();

    assert_eq!(service.cleanup_expired().await.unwrap(), 1);
    let page = service
        .find_all(user, &NotificationFilter::default(), &PageRequest::new(1, 10))
        .await
        .unwrap();
    assert_eq!(page.total_items, 1);
}

#[tokio::test]
async fn blank_title_is_rejected() {
    let (service, _bus) = service();
    let user = Uuid::new_v4();

    let invalid = CreateNotificationRequest {
        title: String::new(),
        ..request(user)
    };
    let err = service.create(invalid).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn listings_are_newest_first() {
    let (service, _bus) = service();
    let user = Uuid::new_v4();
    for _ in 0..5 {
        service.create(request(user)).await.unwrap();
    }

    let page = service
        .find_all(user, &NotificationFilter::default(), &PageRequest::new(1, 10))
        .await
        .unwrap();
    assert!(
        page.items
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at)
    );
}

#[tokio::test]
async fn template_builders_use_the_normal_creation_path() {
    let (service, bus) = service();
    let mut sub = bus.subscribe(NOTIFICATIONS_CREATED).await.unwrap();
    let user = Uuid::new_v4();

    let welcome = service.send_welcome(user, "ayako").await.unwrap();
    assert_eq!(welcome.kind, NotificationKind::Welcome);

    let alert = service
        .send_login_alert(user, Some("203.0.113.7"), None)
        .await
        .unwrap();
    assert_eq!(alert.priority, Priority::High);

    let upload = service
        .send_upload_processed(user, "sunset.mp4", "media-42")
        .await
        .unwrap();
    assert_eq!(upload.related_entity_type.as_deref(), Some("media"));

    // Every builder publishes on the bus like any other create.
    for _ in 0..3 {
        assert!(sub.recv().await.is_some());
    }
}
