//! # notify-cache
//!
//! Key-value layer for Lumen Notify: Redis-backed in production, in-memory
//! for tests and single-node development. Backs the rate limiter, the
//! unread-notification cache, and the connection presence registry.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::CacheManager;
