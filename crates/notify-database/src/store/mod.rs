//! Notification store trait and implementations.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use notify_core::result::AppResult;
use notify_core::types::pagination::{PageRequest, PageResponse};
use notify_entity::notification::{Notification, NotificationFilter};

pub use memory::MemoryNotificationStore;
pub use postgres::PgNotificationStore;

/// Durable store for notifications.
///
/// Every read and mutation is scoped to the owning user, so a caller can
/// never observe or modify another user's rows through this interface.
/// Listings are always ordered by `created_at` descending.
#[async_trait]
pub trait NotificationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a new notification.
    async fn insert(&self, notification: Notification) -> AppResult<Notification>;

    /// Fetch a single notification owned by `user_id`.
    async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Notification>>;

    /// List a user's notifications, filtered and paginated.
    async fn find_page(
        &self,
        user_id: Uuid,
        filter: &NotificationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>>;

    /// The newest unread notifications for a user, up to `limit`.
    async fn find_unread(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<Notification>>;

    /// Count unread notifications for a user.
    async fn count_unread(&self, user_id: Uuid) -> AppResult<i64>;

    /// Set the read state of one notification, returning the updated row.
    ///
    /// Returns `None` when the notification does not exist or is owned by
    /// another user.
    async fn set_read(
        &self,
        id: Uuid,
        user_id: Uuid,
        is_read: bool,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Notification>>;

    /// Mark notifications read for a user.
    ///
    /// With `ids` this marks only the listed notifications (rows owned by
    /// other users are skipped); without it, every unread row for the user.
    /// Returns the number of rows that changed.
    async fn mark_read(
        &self,
        user_id: Uuid,
        ids: Option<&[Uuid]>,
        now: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Delete one notification owned by `user_id`. Returns `true` if a row
    /// was removed.
    async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<bool>;

    /// Delete every notification whose `expires_at` is at or before `now`.
    /// Returns the number of rows removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;

    /// All user ids that have at least one notification.
    async fn distinct_user_ids(&self) -> AppResult<Vec<Uuid>>;
}
