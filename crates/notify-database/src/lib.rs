//! # notify-database
//!
//! PostgreSQL connection management and notification store implementations.
//!
//! The [`store::NotificationStore`] trait is the persistence seam: the
//! PostgreSQL store backs production deployments, the in-memory store backs
//! tests and single-node development setups.

pub mod connection;
pub mod migration;
pub mod store;

pub use connection::DatabasePool;
pub use store::{MemoryNotificationStore, NotificationStore, PgNotificationStore};
