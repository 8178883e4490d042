//! Token verification configuration.

use serde::{Deserialize, Serialize};

/// Token verification configuration.
///
/// Lumen Notify only *verifies* tokens issued by the auth service;
/// it never issues them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared HMAC secret for JWT verification.
    pub jwt_secret: String,
    /// Clock-skew leeway in seconds.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
}

fn default_leeway() -> u64 {
    5
}
