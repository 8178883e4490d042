//! Presence bookkeeping in the shared key-value store.

use std::time::Duration;

use tracing::debug;
use uuid::Uuid;

use notify_cache::{CacheManager, keys};
use notify_core::result::AppResult;
use notify_core::traits::cache::CacheProvider;

/// Tracks which connection ids are live for each user.
///
/// Entries carry a defensive TTL that is refreshed on every registration,
/// so a crashed node cannot leave a user marked online forever.
#[derive(Debug, Clone)]
pub struct ConnectionRegistry {
    cache: CacheManager,
    presence_ttl: Duration,
}

impl ConnectionRegistry {
    /// Create a registry over the given cache manager.
    pub fn new(cache: CacheManager, presence_ttl: Duration) -> Self {
        Self { cache, presence_ttl }
    }

    /// Record a new live connection for a user.
    pub async fn add(&self, user_id: Uuid, connection_id: &str) -> AppResult<()> {
        let key = keys::connections(user_id);
        self.cache.sadd(&key, connection_id).await?;
        self.cache.expire(&key, self.presence_ttl).await?;
        debug!(user_id = %user_id, connection_id, "Connection registered");
        Ok(())
    }

    /// Remove a connection that has closed.
    pub async fn remove(&self, user_id: Uuid, connection_id: &str) -> AppResult<()> {
        self.cache
            .srem(&keys::connections(user_id), connection_id)
            .await?;
        debug!(user_id = %user_id, connection_id, "Connection removed");
        Ok(())
    }

    /// All live connection ids for a user.
    pub async fn connections(&self, user_id: Uuid) -> AppResult<Vec<String>> {
        self.cache.smembers(&keys::connections(user_id)).await
    }

    /// Whether the user has at least one live connection.
    pub async fn is_online(&self, user_id: Uuid) -> AppResult<bool> {
        Ok(!self.connections(user_id).await?.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use notify_core::config::cache::MemoryCacheConfig;

    use super::*;

    fn registry() -> ConnectionRegistry {
        let provider = notify_cache::memory::MemoryCacheProvider::new(&MemoryCacheConfig::default());
        ConnectionRegistry::new(
            CacheManager::from_provider(Arc::new(provider)),
            Duration::from_secs(300),
        )
    }

    #[tokio::test]
    async fn tracks_connections_per_user() {
        let registry = registry();
        let user = Uuid::new_v4();

        registry.add(user, "conn-1").await.unwrap();
        registry.add(user, "conn-2").await.unwrap();

        let mut conns = registry.connections(user).await.unwrap();
        conns.sort();
        assert_eq!(conns, vec!["conn-1", "conn-2"]);
        assert!(registry.is_online(user).await.unwrap());
    }

    #[tokio::test]
    async fn user_goes_offline_when_last_connection_leaves() {
        let registry = registry();
        let user = Uuid::new_v4();

        registry.add(user, "conn-1").await.unwrap();
        registry.remove(user, "conn-1").await.unwrap();

        assert!(!registry.is_online(user).await.unwrap());
    }

    #[tokio::test]
    async fn unknown_user_is_offline() {
        let registry = registry();
        assert!(!registry.is_online(Uuid::new_v4()).await.unwrap());
    }
}
