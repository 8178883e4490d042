//! Trait definitions shared across crates.

pub mod bus;
pub mod cache;

pub use bus::{BusSubscription, EventBus};
pub use cache::CacheProvider;
