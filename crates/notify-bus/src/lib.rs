//! # notify-bus
//!
//! Pub/sub event bus backends. The Redis backend bridges to other services
//! over Redis pub/sub and owns reconnection; the in-process backend serves
//! tests and single-node deployments.

pub mod channels;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis_bus;

pub use channels::{EVENTS_DOMAIN, NOTIFICATIONS_CREATED};
#[cfg(feature = "memory")]
pub use memory::MemoryEventBus;
pub use provider::build_event_bus;
#[cfg(feature = "redis-backend")]
pub use redis_bus::RedisEventBus;
