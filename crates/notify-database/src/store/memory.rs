//! In-memory notification store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use notify_core::result::AppResult;
use notify_core::types::pagination::{PageRequest, PageResponse};
use notify_entity::notification::{Notification, NotificationFilter};

use super::NotificationStore;

/// In-memory notification store.
///
/// Backs tests and single-node development setups. Semantics mirror the
/// PostgreSQL store, including per-user scoping and descending creation
/// order.
#[derive(Debug, Default)]
pub struct MemoryNotificationStore {
    rows: DashMap<Uuid, Notification>,
}

impl MemoryNotificationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored notifications, across all users.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the store holds no notifications.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Snapshot a user's rows matching `filter`, newest first.
    fn collect_sorted(&self, user_id: Uuid, filter: &NotificationFilter) -> Vec<Notification> {
        let mut items: Vec<Notification> = self
            .rows
            .iter()
            .filter(|entry| entry.user_id == user_id && matches_filter(entry.value(), filter))
            .map(|entry| entry.value().clone())
            .collect();
        // Tie-break on id so pagination is stable for equal timestamps.
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        items
    }
}

fn matches_filter(n: &Notification, filter: &NotificationFilter) -> bool {
    if filter.kind.is_some_and(|kind| n.kind != kind) {
        return false;
    }
    if filter.priority.is_some_and(|priority| n.priority != priority) {
        return false;
    }
    if filter.is_read.is_some_and(|is_read| n.is_read != is_read) {
        return false;
    }
    if filter.created_after.is_some_and(|after| n.created_at < after) {
        return false;
    }
    if filter.created_before.is_some_and(|before| n.created_at >= before) {
        return false;
    }
    true
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn insert(&self, notification: Notification) -> AppResult<Notification> {
        self.rows.insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Notification>> {
        Ok(self
            .rows
            .get(&id)
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.value().clone()))
    }

    async fn find_page(
        &self,
        user_id: Uuid,
        filter: &NotificationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let all = self.collect_sorted(user_id, filter);
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn find_unread(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<Notification>> {
        let mut items = self.collect_sorted(user_id, &NotificationFilter::unread());
        items.truncate(limit.max(0) as usize);
        Ok(items)
    }

    async fn count_unread(&self, user_id: Uuid) -> AppResult<i64> {
        let count = self
            .rows
            .iter()
            .filter(|entry| entry.user_id == user_id && !entry.is_read)
            .count();
        Ok(count as i64)
    }

    async fn set_read(
        &self,
        id: Uuid,
        user_id: Uuid,
        is_read: bool,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Notification>> {
        let updated = self.rows.get_mut(&id).and_then(|mut entry| {
            if entry.user_id != user_id {
                return None;
            }
            entry.is_read = is_read;
            entry.read_at = is_read.then_some(now);
            entry.updated_at = now;
            Some(entry.value().clone())
        });
        Ok(updated)
    }

    async fn mark_read(
        &self,
        user_id: Uuid,
        ids: Option<&[Uuid]>,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut changed = 0u64;
        for mut entry in self.rows.iter_mut() {
            if entry.user_id != user_id || entry.is_read {
                continue;
            }
            if let Some(ids) = ids {
                if !ids.contains(&entry.id) {
                    continue;
                }
            }
            entry.is_read = true;
            entry.read_at = Some(now);
            entry.updated_at = now;
            changed += 1;
        }
        Ok(changed)
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let removed = self
            .rows
            .remove_if(&id, |_, n| n.user_id == user_id)
            .is_some();
        Ok(removed)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let before = self.rows.len();
        self.rows.retain(|_, n| !n.is_expired(now));
        Ok((before - self.rows.len()) as u64)
    }

    async fn distinct_user_ids(&self) -> AppResult<Vec<Uuid>> {
        let mut ids: Vec<Uuid> = self.rows.iter().map(|entry| entry.user_id).collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }
}
