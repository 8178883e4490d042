//! The notification service: every notification is born here.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use notify_bus::NOTIFICATIONS_CREATED;
use notify_cache::CacheManager;
use notify_core::config::NotificationsConfig;
use notify_core::error::AppError;
use notify_core::result::AppResult;
use notify_core::traits::bus::EventBus;
use notify_core::types::pagination::{PageRequest, PageResponse};
use notify_database::NotificationStore;
use notify_entity::notification::{
    BroadcastRequest, CreateNotificationRequest, DeliveryChannel, MarkAsReadRequest, Notification,
    NotificationCreated, NotificationFilter, UpdateNotificationRequest,
};

use crate::rate_limit::RateLimiter;
use crate::unread_cache::{UnreadCache, UnreadSnapshot};

/// Result of a broadcast: one notification attempted per known user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastOutcome {
    /// Users the broadcast targeted.
    pub recipients: usize,
    /// Notifications actually persisted.
    pub delivered: usize,
    /// Recipients for whom creation failed.
    pub failed: usize,
}

/// Notification business logic.
///
/// All creation flows through [`NotificationService::create`]: validation,
/// rate limiting, persistence, cache invalidation, and the created-event
/// publish happen there and nowhere else. Side effects after the insert are
/// best-effort; a persisted notification is never rolled back because the
/// cache or the bus hiccupped.
#[derive(Debug, Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    limiter: RateLimiter,
    unread: UnreadCache,
    bus: Arc<dyn EventBus>,
    snapshot_limit: u64,
}

impl NotificationService {
    /// Wire up the service from its collaborators.
    pub fn new(
        store: Arc<dyn NotificationStore>,
        cache: CacheManager,
        bus: Arc<dyn EventBus>,
        config: &NotificationsConfig,
    ) -> Self {
        let limiter = RateLimiter::new(
            cache.clone(),
            config.rate_limit_max,
            Duration::from_secs(config.rate_limit_window_seconds),
        );
        let unread = UnreadCache::new(
            cache,
            Duration::from_secs(config.unread_cache_ttl_seconds),
        );
        Self {
            store,
            limiter,
            unread,
            bus,
            snapshot_limit: config.unread_snapshot_limit,
        }
    }

    /// Create and persist a notification, then announce it on the bus.
    pub async fn create(&self, request: CreateNotificationRequest) -> AppResult<Notification> {
        request
            .validate()
            .map_err(|e| AppError::validation(format!("Invalid notification request: {e}")))?;

        self.limiter.check(request.user_id).await?;

        let now = Utc::now();
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            kind: request.kind,
            title: request.title,
            message: request.message,
            data: request.data,
            priority: request.priority.unwrap_or_default(),
            channels: sqlx::types::Json(
                request.channels.unwrap_or_else(DeliveryChannel::defaults),
            ),
            is_read: false,
            read_at: None,
            sent_at: now,
            expires_at: request.expires_at,
            related_entity_id: request.related_entity_id,
            related_entity_type: request.related_entity_type,
            created_at: now,
            updated_at: now,
        };

        let stored = self.store.insert(notification).await?;

        self.invalidate_unread(stored.user_id).await;
        self.publish_created(&stored).await;

        info!(
            notification_id = %stored.id,
            user_id = %stored.user_id,
            kind = %stored.kind,
            "Notification created"
        );
        Ok(stored)
    }

    /// List a user's notifications, filtered and paginated, newest first.
    pub async fn find_all(
        &self,
        user_id: Uuid,
        filter: &NotificationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let response = self.store.find_page(user_id, filter, page).await?;

        // An unread-only first page is exactly the snapshot; refresh it.
        if filter.is_unread_only() && page.page == 1 {
            let mut items = response.items.clone();
            items.truncate(self.snapshot_limit as usize);
            let snapshot = UnreadSnapshot {
                items,
                count: response.total_items as i64,
            };
            if let Err(e) = self.unread.put(user_id, &snapshot).await {
                warn!(user_id = %user_id, error = %e, "Failed to refresh unread snapshot");
            }
        }

        Ok(response)
    }

    /// The user's unread snapshot, served from cache when possible.
    pub async fn find_unread(&self, user_id: Uuid) -> AppResult<UnreadSnapshot> {
        match self.unread.get(user_id).await {
            Ok(Some(snapshot)) => return Ok(snapshot),
            Ok(None) => {}
            Err(e) => warn!(user_id = %user_id, error = %e, "Unread cache read failed"),
        }

        let items = self
            .store
            .find_unread(user_id, self.snapshot_limit as i64)
            .await?;
        let count = self.store.count_unread(user_id).await?;
        let snapshot = UnreadSnapshot { items, count };

        if let Err(e) = self.unread.put(user_id, &snapshot).await {
            warn!(user_id = %user_id, error = %e, "Unread cache write failed");
        }
        Ok(snapshot)
    }

    /// Current unread count for a user.
    ///
    /// Always counted against the store, never the snapshot cache. Badge
    /// counts tolerate less staleness than list bodies.
    pub async fn unread_count(&self, user_id: Uuid) -> AppResult<i64> {
        self.store.count_unread(user_id).await
    }

    /// Fetch one notification owned by `user_id`.
    ///
    /// A notification owned by someone else reads as absent.
    pub async fn find_one(&self, id: Uuid, user_id: Uuid) -> AppResult<Notification> {
        self.store
            .find_by_id(id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Notification not found"))
    }

    /// Update a notification's read state.
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        request: UpdateNotificationRequest,
    ) -> AppResult<Notification> {
        let Some(is_read) = request.is_read else {
            return self.find_one(id, user_id).await;
        };

        let updated = self
            .store
            .set_read(id, user_id, is_read, Utc::now())
            .await?
            .ok_or_else(|| AppError::not_found("Notification not found"))?;

        self.invalidate_unread(user_id).await;
        Ok(updated)
    }

    /// Mark the given notifications (or all unread) as read.
    ///
    /// Returns how many notifications changed state.
    pub async fn mark_as_read(
        &self,
        user_id: Uuid,
        request: &MarkAsReadRequest,
    ) -> AppResult<u64> {
        let changed = self
            .store
            .mark_read(user_id, request.notification_ids.as_deref(), Utc::now())
            .await?;

        if changed > 0 {
            self.invalidate_unread(user_id).await;
        }
        info!(user_id = %user_id, changed, "Notifications marked read");
        Ok(changed)
    }

    /// Mark every unread notification for `user_id` as read.
    pub async fn mark_all_as_read(&self, user_id: Uuid) -> AppResult<u64> {
        self.mark_as_read(user_id, &MarkAsReadRequest::default())
            .await
    }

    /// Delete one notification owned by `user_id`.
    pub async fn remove(&self, id: Uuid, user_id: Uuid) -> AppResult<()> {
        if !self.store.delete(id, user_id).await? {
            return Err(AppError::not_found("Notification not found"));
        }
        self.invalidate_unread(user_id).await;
        Ok(())
    }

    /// Delete every notification past its expiry. Returns the removed count.
    pub async fn cleanup_expired(&self) -> AppResult<u64> {
        let removed = self.store.delete_expired(Utc::now()).await?;
        if removed > 0 {
            info!(removed, "Expired notifications cleaned up");
        }
        Ok(removed)
    }

    /// Create one notification per known user, optionally excluding one.
    ///
    /// Each recipient goes through the normal creation path; per-recipient
    /// failures are logged and counted, never aborting the rest.
    pub async fn create_broadcast(
        &self,
        request: BroadcastRequest,
    ) -> AppResult<BroadcastOutcome> {
        request
            .validate()
            .map_err(|e| AppError::validation(format!("Invalid broadcast request: {e}")))?;

        let recipients: Vec<Uuid> = self
            .store
            .distinct_user_ids()
            .await?
            .into_iter()
            .filter(|id| Some(*id) != request.exclude_user_id)
            .collect();

        let mut delivered = 0usize;
        let mut failed = 0usize;
        for user_id in &recipients {
            let per_user = CreateNotificationRequest {
                user_id: *user_id,
                kind: request.kind,
                title: request.title.clone(),
                message: request.message.clone(),
                data: request.data.clone(),
                priority: request.priority,
                channels: None,
                expires_at: None,
                related_entity_id: None,
                related_entity_type: None,
            };
            match self.create(per_user).await {
                Ok(_) => delivered += 1,
                Err(e) => {
                    failed += 1;
                    warn!(user_id = %user_id, error = %e, "Broadcast delivery failed");
                }
            }
        }

        info!(
            recipients = recipients.len(),
            delivered, failed, "Broadcast complete"
        );
        Ok(BroadcastOutcome {
            recipients: recipients.len(),
            delivered,
            failed,
        })
    }

    /// Best-effort unread snapshot invalidation after a write.
    async fn invalidate_unread(&self, user_id: Uuid) {
        if let Err(e) = self.unread.invalidate(user_id).await {
            warn!(user_id = %user_id, error = %e, "Unread cache invalidation failed");
        }
    }

    /// Best-effort publish of the created event, before `create` returns.
    async fn publish_created(&self, notification: &Notification) {
        let event = NotificationCreated::new(notification.clone());
        let payload = match serde_json::to_string(&event) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(notification_id = %notification.id, error = %e, "Failed to encode created event");
                return;
            }
        };
        if let Err(e) = self.bus.publish(NOTIFICATIONS_CREATED, &payload).await {
            warn!(notification_id = %notification.id, error = %e, "Failed to publish created event");
        }
    }
}
