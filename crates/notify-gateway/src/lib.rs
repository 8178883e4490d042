//! # notify-gateway
//!
//! The push-delivery gateway. Owns live connection state (pool and per-user
//! rooms), consumes the created-notification channel, and pushes
//! notifications plus unread counts to the owning user's connections. The
//! same connection also serves pull-style queries and mark-read commands.

pub mod connection;
pub mod gateway;
pub mod messages;
pub mod rooms;

pub use connection::{ConnectionHandle, ConnectionId, ConnectionPool};
pub use gateway::DeliveryGateway;
pub use messages::{ClientMessage, ServerMessage};
pub use rooms::{InMemoryRooms, RoomRegistry};
