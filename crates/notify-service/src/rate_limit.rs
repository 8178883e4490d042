//! Sliding-window rate limiter for notification creation.

use std::time::Duration;

use uuid::Uuid;

use notify_cache::{CacheManager, keys};
use notify_core::error::{AppError, ErrorKind};
use notify_core::result::AppResult;
use notify_core::traits::cache::CacheProvider;

/// Per-user creation rate limiter.
///
/// Counts creations in a fixed window keyed by user. The counter is created
/// on first increment and expires with the window, so an idle user always
/// starts a fresh window. If the backing store is unreachable the limiter
/// refuses the creation rather than waving it through.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    cache: CacheManager,
    /// Maximum creations per window.
    max: u32,
    /// Window length.
    window: Duration,
}

impl RateLimiter {
    /// Create a limiter over the given cache.
    pub fn new(cache: CacheManager, max: u32, window: Duration) -> Self {
        Self { cache, max, window }
    }

    /// Record one creation attempt for `user_id` and enforce the limit.
    ///
    /// Returns `Ok(())` when the creation is allowed. Exceeding attempts
    /// still advance the counter, extending how long the user stays limited.
    pub async fn check(&self, user_id: Uuid) -> AppResult<()> {
        let key = keys::rate_limit(user_id);

        let count = self.cache.incr(&key).await.map_err(fail_closed)?;
        if count == 1 {
            self.cache
                .expire(&key, self.window)
                .await
                .map_err(fail_closed)?;
        }

        if count > i64::from(self.max) {
            return Err(AppError::rate_limit(format!(
                "Notification limit reached: {} per {}s",
                self.max,
                self.window.as_secs()
            )));
        }
        Ok(())
    }
}

/// A limiter that cannot count must not admit traffic.
fn fail_closed(err: AppError) -> AppError {
    AppError::with_source(
        ErrorKind::ServiceUnavailable,
        "Rate limiter unavailable, refusing notification creation",
        err,
    )
}
