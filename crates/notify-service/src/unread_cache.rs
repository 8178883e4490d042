//! Per-user unread snapshot cache.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use notify_cache::{CacheManager, keys};
use notify_core::result::AppResult;
use notify_core::traits::cache::CacheProvider;
use notify_entity::notification::Notification;

/// Cached view of a user's unread notifications.
///
/// `count` is the full unread total even when `items` is truncated to the
/// snapshot limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadSnapshot {
    /// Newest unread notifications, up to the snapshot limit.
    pub items: Vec<Notification>,
    /// Total unread count.
    pub count: i64,
}

/// Read-through cache of unread snapshots.
///
/// Invalidation happens on every write that can change the unread set;
/// the TTL only bounds staleness from writes this service never sees
/// (manual database edits, cleanup of another node).
#[derive(Debug, Clone)]
pub struct UnreadCache {
    cache: CacheManager,
    ttl: Duration,
}

impl UnreadCache {
    /// Create an unread cache over the given cache manager.
    pub fn new(cache: CacheManager, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Fetch the cached snapshot, if any.
    pub async fn get(&self, user_id: Uuid) -> AppResult<Option<UnreadSnapshot>> {
        self.cache.get_json(&keys::unread(user_id)).await
    }

    /// Store a fresh snapshot.
    pub async fn put(&self, user_id: Uuid, snapshot: &UnreadSnapshot) -> AppResult<()> {
        self.cache
            .set_json(&keys::unread(user_id), snapshot, self.ttl)
            .await
    }

    /// Drop the cached snapshot after a write.
    pub async fn invalidate(&self, user_id: Uuid) -> AppResult<()> {
        debug!(user_id = %user_id, "Invalidating unread snapshot");
        self.cache.delete(&keys::unread(user_id)).await
    }
}
