//! Notification service configuration.

use serde::{Deserialize, Serialize};

/// Notification service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Maximum notification creations per user per window.
    #[serde(default = "default_rate_limit_max")]
    pub rate_limit_max: u32,
    /// Rate-limit window length in seconds.
    #[serde(default = "default_rate_limit_window")]
    pub rate_limit_window_seconds: u64,
    /// TTL of the per-user unread snapshot cache, in seconds.
    #[serde(default = "default_unread_ttl")]
    pub unread_cache_ttl_seconds: u64,
    /// Size of the unread snapshot pushed on connect.
    #[serde(default = "default_unread_limit")]
    pub unread_snapshot_limit: u64,
    /// Interval between expired-notification cleanup runs, in seconds.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            rate_limit_max: default_rate_limit_max(),
            rate_limit_window_seconds: default_rate_limit_window(),
            unread_cache_ttl_seconds: default_unread_ttl(),
            unread_snapshot_limit: default_unread_limit(),
            cleanup_interval_seconds: default_cleanup_interval(),
        }
    }
}

fn default_rate_limit_max() -> u32 {
    10
}

fn default_rate_limit_window() -> u64 {
    60
}

fn default_unread_ttl() -> u64 {
    3600
}

fn default_unread_limit() -> u64 {
    50
}

fn default_cleanup_interval() -> u64 {
    3600
}
