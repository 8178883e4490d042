//! Client/server message types carried over the WebSocket.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use notify_core::types::pagination::{PageRequest, PageResponse};
use notify_entity::notification::{Notification, NotificationFilter};

/// Requests sent by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Join (or re-join) the caller's notification room.
    JoinNotifications,
    /// Query a page of notifications.
    GetNotifications {
        /// Filter conditions; empty matches everything.
        #[serde(default)]
        filter: NotificationFilter,
        /// Page selection.
        #[serde(default)]
        page: PageRequest,
    },
    /// Mark notifications read: the listed ids, or all unread when omitted.
    MarkAsRead {
        /// Specific notifications to mark, or `None` for all unread.
        #[serde(default)]
        notification_ids: Option<Vec<Uuid>>,
    },
}

/// Events pushed by the server.
///
/// Every error path replies with [`ServerMessage::Error`] and leaves the
/// connection usable; only authentication failure closes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Room join confirmed.
    Joined {
        /// Always `"success"`.
        status: String,
    },
    /// A notification was just created for this user.
    NewNotification {
        /// The persisted record.
        notification: Notification,
    },
    /// The user's current unread snapshot, pushed on join.
    UnreadNotifications {
        /// Newest unread notifications.
        notifications: Vec<Notification>,
    },
    /// The user's current unread count.
    UnreadCount {
        /// Unread total.
        count: i64,
    },
    /// Reply to a `get_notifications` request.
    Notifications {
        /// The requested page.
        page: PageResponse<Notification>,
    },
    /// Reply to a `mark_as_read` request.
    Marked {
        /// Notifications that changed state.
        marked: u64,
    },
    /// System-wide announcement pushed to every connection.
    BroadcastNotification {
        /// Announcement title.
        title: String,
        /// Announcement body.
        message: String,
        /// Additional payload.
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<serde_json::Value>,
    },
    /// A request failed; the connection stays open.
    Error {
        /// Machine-usable reason code.
        code: String,
        /// Human-readable description.
        message: String,
    },
}

impl ServerMessage {
    /// Error reply from an application error.
    pub fn error(err: &notify_core::AppError) -> Self {
        Self::Error {
            code: err.kind.to_string(),
            message: err.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_use_snake_case_tags() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type": "join_notifications"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::JoinNotifications));

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type": "mark_as_read", "notification_ids": null}"#).unwrap();
        assert!(matches!(msg, ClientMessage::MarkAsRead { notification_ids: None }));
    }

    #[test]
    fn get_notifications_defaults_filter_and_page() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type": "get_notifications"}"#).unwrap();
        match msg {
            ClientMessage::GetNotifications { filter, page } => {
                assert!(filter.is_read.is_none());
                assert_eq!(page.page, 1);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn server_error_carries_the_kind_as_code() {
        let err = notify_core::AppError::not_found("gone");
        let msg = ServerMessage::error(&err);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["code"], "NOT_FOUND");
    }
}
