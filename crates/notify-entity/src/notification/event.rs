//! Outbound bus event published after a notification is persisted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::Notification;

/// Published on the `notifications:created` channel immediately after a
/// successful insert, before `create` returns to its caller. Every gateway
/// instance subscribes and fans the notification out to the user's room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationCreated {
    /// The recipient user.
    pub user_id: Uuid,
    /// The persisted notification record.
    pub notification: Notification,
}

impl NotificationCreated {
    /// Build the event for a freshly persisted notification.
    pub fn new(notification: Notification) -> Self {
        Self {
            user_id: notification.user_id,
            notification,
        }
    }
}
