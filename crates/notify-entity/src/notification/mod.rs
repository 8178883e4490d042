//! Notification entity, enums, DTOs, filters, and bus events.

pub mod dto;
pub mod event;
pub mod filter;
pub mod kind;
pub mod model;

pub use dto::{BroadcastRequest, CreateNotificationRequest, MarkAsReadRequest, UpdateNotificationRequest};
pub use event::NotificationCreated;
pub use filter::NotificationFilter;
pub use kind::NotificationKind;
pub use model::{DeliveryChannel, Notification, Priority};
