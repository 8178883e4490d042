//! Cache key builders.
//!
//! All keys for one concern share a prefix so they can be reasoned about
//! (and inspected) together. Keys are single-owner: every mutation is an
//! atomic single-key operation.

use uuid::Uuid;

/// Key of the per-user unread snapshot.
pub fn unread(user_id: Uuid) -> String {
    format!("unread:{user_id}")
}

/// Key of the per-user creation rate-limit counter.
pub fn rate_limit(user_id: Uuid) -> String {
    format!("ratelimit:{user_id}")
}

/// Key of the per-user set of live connection ids.
pub fn connections(user_id: Uuid) -> String {
    format!("conns:{user_id}")
}
