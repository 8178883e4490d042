//! In-memory cache provider backed by moka and dashmap.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use moka::Expiry;
use moka::future::Cache;

use notify_core::config::cache::MemoryCacheConfig;
use notify_core::result::AppResult;
use notify_core::traits::cache::CacheProvider;

/// String value carrying the TTL requested at insert time.
#[derive(Debug, Clone)]
struct ValueEntry {
    data: String,
    ttl: Duration,
}

/// Expires each string entry after its own requested TTL.
struct ValueExpiry;

impl Expiry<String, ValueEntry> for ValueExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &ValueEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &ValueEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// Counter with an optional expiry deadline.
#[derive(Debug, Clone)]
struct CounterEntry {
    value: i64,
    expires_at: Option<Instant>,
}

impl CounterEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

/// Set with an optional expiry deadline.
#[derive(Debug, Clone)]
struct SetEntry {
    members: HashSet<String>,
    expires_at: Option<Instant>,
}

impl SetEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

/// In-memory cache provider.
///
/// String values live in a moka cache with per-entry TTL. Counters and sets
/// carry explicit expiry deadlines and are reaped lazily on access, which
/// keeps the window semantics identical to the Redis backend.
#[derive(Debug)]
pub struct MemoryCacheProvider {
    /// String entries.
    entries: Cache<String, ValueEntry>,
    /// Ceiling applied to requested entry TTLs.
    max_ttl: Duration,
    /// Integer counters.
    counters: DashMap<String, CounterEntry>,
    /// String sets.
    sets: DashMap<String, SetEntry>,
}

impl MemoryCacheProvider {
    /// Create a new in-memory cache provider from configuration.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let entries = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(ValueExpiry)
            .build();

        Self {
            entries,
            max_ttl: Duration::from_secs(config.time_to_live_seconds),
            counters: DashMap::new(),
            sets: DashMap::new(),
        }
    }

    /// Drop a counter if its deadline has passed.
    fn reap_counter(&self, key: &str) {
        let now = Instant::now();
        if let Some(entry) = self.counters.get(key) {
            if entry.is_expired(now) {
                drop(entry);
                self.counters.remove(key);
            }
        }
    }

    /// Drop a set if its deadline has passed.
    fn reap_set(&self, key: &str) {
        let now = Instant::now();
        if let Some(entry) = self.sets.get(key) {
            if entry.is_expired(now) {
                drop(entry);
                self.sets.remove(key);
            }
        }
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.get(key).await.map(|entry| entry.data))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        // The configured cache-wide TTL caps what a caller may request.
        let entry = ValueEntry {
            data: value.to_string(),
            ttl: ttl.min(self.max_ttl),
        };
        self.entries.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.invalidate(key).await;
        self.counters.remove(key);
        self.sets.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        if self.entries.get(key).await.is_some() {
            return Ok(true);
        }
        self.reap_counter(key);
        if self.counters.contains_key(key) {
            return Ok(true);
        }
        self.reap_set(key);
        Ok(self.sets.contains_key(key))
    }

    async fn incr(&self, key: &str) -> AppResult<i64> {
        self.reap_counter(key);
        let mut entry = self.counters.entry(key.to_string()).or_insert(CounterEntry {
            value: 0,
            expires_at: None,
        });
        entry.value += 1;
        Ok(entry.value)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        let deadline = Instant::now() + ttl;
        self.reap_counter(key);
        if let Some(mut entry) = self.counters.get_mut(key) {
            entry.expires_at = Some(deadline);
            return Ok(true);
        }
        self.reap_set(key);
        if let Some(mut entry) = self.sets.get_mut(key) {
            entry.expires_at = Some(deadline);
            return Ok(true);
        }
        // Re-inserting a string entry re-arms its TTL.
        if let Some(entry) = self.entries.get(key).await {
            let rearmed = ValueEntry {
                data: entry.data,
                ttl: ttl.min(self.max_ttl),
            };
            self.entries.insert(key.to_string(), rearmed).await;
            return Ok(true);
        }
        Ok(false)
    }

    async fn sadd(&self, key: &str, member: &str) -> AppResult<bool> {
        self.reap_set(key);
        let mut entry = self.sets.entry(key.to_string()).or_insert(SetEntry {
            members: HashSet::new(),
            expires_at: None,
        });
        Ok(entry.members.insert(member.to_string()))
    }

    async fn srem(&self, key: &str, member: &str) -> AppResult<bool> {
        self.reap_set(key);
        let removed = match self.sets.get_mut(key) {
            Some(mut entry) => entry.members.remove(member),
            None => false,
        };
        // Redis drops empty sets; mirror that so exists() agrees.
        if let Some(entry) = self.sets.get(key) {
            if entry.members.is_empty() {
                drop(entry);
                self.sets.remove(key);
            }
        }
        Ok(removed)
    }

    async fn smembers(&self, key: &str) -> AppResult<Vec<String>> {
        self.reap_set(key);
        Ok(self
            .sets
            .get(key)
            .map(|entry| entry.members.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
