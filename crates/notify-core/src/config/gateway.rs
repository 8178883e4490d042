//! Delivery gateway (WebSocket) configuration.

use serde::{Deserialize, Serialize};

/// Delivery gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Whether unauthenticated connections are admitted.
    ///
    /// Anonymous connections join no room and only receive system-wide
    /// broadcast pushes. Off by default.
    #[serde(default)]
    pub allow_anonymous: bool,
    /// Maximum simultaneous connections per user; the oldest connection
    /// is replaced when the cap is reached.
    #[serde(default = "default_max_connections_per_user")]
    pub max_connections_per_user: usize,
    /// Outbound per-connection message buffer size.
    #[serde(default = "default_buffer")]
    pub send_buffer_size: usize,
    /// Defensive TTL on presence registry entries, in seconds.
    #[serde(default = "default_presence_ttl")]
    pub presence_ttl_seconds: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            allow_anonymous: false,
            max_connections_per_user: default_max_connections_per_user(),
            send_buffer_size: default_buffer(),
            presence_ttl_seconds: default_presence_ttl(),
        }
    }
}

fn default_max_connections_per_user() -> usize {
    5
}

fn default_buffer() -> usize {
    256
}

fn default_presence_ttl() -> u64 {
    300
}
