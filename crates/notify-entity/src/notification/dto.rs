//! Request DTOs for notification operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::kind::NotificationKind;
use super::model::{DeliveryChannel, Priority};

/// Request to create a single notification.
///
/// The service applies priority/channel defaults; everything flows through
/// the one creation path, including the convenience builders and broadcast.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    /// The recipient user.
    pub user_id: Uuid,
    /// Notification kind.
    pub kind: NotificationKind,
    /// Title shown to the user.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Body text.
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
    /// Opaque structured payload, passed through.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    /// Priority; defaults to medium.
    #[serde(default)]
    pub priority: Option<Priority>,
    /// Delivery channels; defaults to websocket + in_app.
    #[serde(default)]
    pub channels: Option<Vec<DeliveryChannel>>,
    /// Expiry, after which the cleanup job may remove the record.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Loose reference to the causing domain object.
    #[serde(default)]
    pub related_entity_id: Option<String>,
    /// Type of the related domain object.
    #[serde(default)]
    pub related_entity_type: Option<String>,
}

impl CreateNotificationRequest {
    /// Minimal request with defaults for all optional fields.
    pub fn new(
        user_id: Uuid,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            kind,
            title: title.into(),
            message: message.into(),
            data: None,
            priority: None,
            channels: None,
            expires_at: None,
            related_entity_id: None,
            related_entity_type: None,
        }
    }
}

/// Request to update a notification's mutable (read-state) fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotificationRequest {
    /// New read state, if changing.
    pub is_read: Option<bool>,
}

/// Request to mark notifications as read.
///
/// With ids, only those (still-unread) notifications are touched;
/// without, every unread notification of the user is marked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAsReadRequest {
    /// Specific notifications to mark, or `None` for all unread.
    #[serde(default)]
    pub notification_ids: Option<Vec<Uuid>>,
}

/// Request to create one notification per known user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastRequest {
    /// Notification kind for every recipient.
    pub kind: NotificationKind,
    /// Title shown to every recipient.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Body text.
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
    /// Opaque structured payload, passed through.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    /// Priority; defaults to medium.
    #[serde(default)]
    pub priority: Option<Priority>,
    /// User excluded from the broadcast (typically the actor).
    #[serde(default)]
    pub exclude_user_id: Option<Uuid>,
}
