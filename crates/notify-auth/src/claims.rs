//! JWT claims structure.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried in tokens minted by the auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the authenticated user's id.
    pub sub: Uuid,
    /// Display name, when the issuer includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Role assigned by the issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

impl Claims {
    /// The authenticated user's id.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }
}
