//! Event bus configuration.

use serde::{Deserialize, Serialize};

/// Event bus configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusConfig {
    /// Which provider to use: `"redis"` or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Redis connection URL for pub/sub.
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    /// Delay before the subscriber reconnects after a dropped
    /// connection, in milliseconds.
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_ms: u64,
    /// Buffer size of the per-subscription message channel.
    #[serde(default = "default_buffer")]
    pub subscription_buffer_size: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            redis_url: default_redis_url(),
            reconnect_delay_ms: default_reconnect_delay(),
            subscription_buffer_size: default_buffer(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_reconnect_delay() -> u64 {
    2000
}

fn default_buffer() -> usize {
    256
}
