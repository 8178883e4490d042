//! Payload schemas for recognized inbound events.
//!
//! Field names follow the producers' wire format (camelCase).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload of `user_registered`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegisteredEvent {
    /// The new user's id.
    pub user_id: Uuid,
    /// Display name, if the producer included one.
    #[serde(default)]
    pub username: Option<String>,
    /// Email address, passed through in the notification payload.
    #[serde(default)]
    pub email: Option<String>,
}

/// Payload of `user_login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLoginEvent {
    /// The authenticated user's id.
    pub user_id: Uuid,
    /// Source IP of the login, if known.
    #[serde(default)]
    pub ip_address: Option<String>,
    /// User agent string, if known.
    #[serde(default)]
    pub user_agent: Option<String>,
}

/// Payload of `upload_completed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadCompletedEvent {
    /// The uploader's id.
    pub user_id: Uuid,
    /// Original file name.
    pub file_name: String,
    /// Identifier of the resulting media item.
    pub media_id: String,
    /// Media title, when set at upload time.
    #[serde(default)]
    pub title: Option<String>,
}

/// Payload of `new_comment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCommentEvent {
    /// Owner of the media item that was commented on.
    pub owner_id: Uuid,
    /// The commenting user's id.
    pub commenter_id: Uuid,
    /// The commenter's display name.
    #[serde(default)]
    pub commenter_name: Option<String>,
    /// Identifier of the media item.
    pub media_id: String,
    /// Identifier of the comment.
    pub comment_id: String,
    /// Comment text excerpt.
    #[serde(default)]
    pub excerpt: Option<String>,
}
