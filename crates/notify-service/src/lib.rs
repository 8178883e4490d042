//! # notify-service
//!
//! Notification business logic: the single creation path, rate limiting,
//! the unread snapshot cache, presence bookkeeping, and broadcast fan-out.

pub mod rate_limit;
pub mod registry;
pub mod service;
pub mod templates;
pub mod unread_cache;

pub use rate_limit::RateLimiter;
pub use registry::ConnectionRegistry;
pub use service::{BroadcastOutcome, NotificationService};
pub use unread_cache::{UnreadCache, UnreadSnapshot};
