//! Well-known bus channel names.

/// Inbound domain events from other services.
pub const EVENTS_DOMAIN: &str = "events:domain";

/// Outbound announcements that a notification was persisted.
pub const NOTIFICATIONS_CREATED: &str = "notifications:created";
