//! The closed enumeration of notification kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Broad grouping of notification kinds, used for filtering and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    /// Account and security events.
    Auth,
    /// Upload and media lifecycle events.
    Media,
    /// Comment activity.
    Comment,
    /// Follower and engagement activity.
    Social,
    /// Platform-wide announcements and moderation.
    System,
}

/// The kind of a notification.
///
/// Stored as its snake_case string in the database; the enum keeps the set
/// closed so handlers and filters are exhaustively checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    // Auth
    Welcome,
    LoginAlert,
    PasswordChanged,
    AccountLocked,
    SecurityAlert,
    // Media
    UploadCompleted,
    UploadFailed,
    MediaApproved,
    MediaRejected,
    MediaFeatured,
    NewContent,
    // Comments
    NewComment,
    CommentReply,
    CommentLiked,
    CommentMention,
    CommentModerated,
    // Social
    NewFollower,
    ContentLiked,
    ContentShared,
    // System
    SystemAnnouncement,
    SystemMaintenance,
    AccountWarning,
    ModerationAction,
    QuotaWarning,
}

impl NotificationKind {
    /// The snake_case wire/database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::LoginAlert => "login_alert",
            Self::PasswordChanged => "password_changed",
            Self::AccountLocked => "account_locked",
            Self::SecurityAlert => "security_alert",
            Self::UploadCompleted => "upload_completed",
            Self::UploadFailed => "upload_failed",
            Self::MediaApproved => "media_approved",
            Self::MediaRejected => "media_rejected",
            Self::MediaFeatured => "media_featured",
            Self::NewContent => "new_content",
            Self::NewComment => "new_comment",
            Self::CommentReply => "comment_reply",
            Self::CommentLiked => "comment_liked",
            Self::CommentMention => "comment_mention",
            Self::CommentModerated => "comment_moderated",
            Self::NewFollower => "new_follower",
            Self::ContentLiked => "content_liked",
            Self::ContentShared => "content_shared",
            Self::SystemAnnouncement => "system_announcement",
            Self::SystemMaintenance => "system_maintenance",
            Self::AccountWarning => "account_warning",
            Self::ModerationAction => "moderation_action",
            Self::QuotaWarning => "quota_warning",
        }
    }

    /// The category this kind belongs to.
    pub fn category(&self) -> NotificationCategory {
        match self {
            Self::Welcome
            | Self::LoginAlert
            | Self::PasswordChanged
            | Self::AccountLocked
            | Self::SecurityAlert => NotificationCategory::Auth,
            Self::UploadCompleted
            | Self::UploadFailed
            | Self::MediaApproved
            | Self::MediaRejected
            | Self::MediaFeatured
            | Self::NewContent => NotificationCategory::Media,
            Self::NewComment
            | Self::CommentReply
            | Self::CommentLiked
            | Self::CommentMention
            | Self::CommentModerated => NotificationCategory::Comment,
            Self::NewFollower | Self::ContentLiked | Self::ContentShared => {
                NotificationCategory::Social
            }
            Self::SystemAnnouncement
            | Self::SystemMaintenance
            | Self::AccountWarning
            | Self::ModerationAction
            | Self::QuotaWarning => NotificationCategory::System,
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = notify_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "welcome" => Self::Welcome,
            "login_alert" => Self::LoginAlert,
            "password_changed" => Self::PasswordChanged,
            "account_locked" => Self::AccountLocked,
            "security_alert" => Self::SecurityAlert,
            "upload_completed" => Self::UploadCompleted,
            "upload_failed" => Self::UploadFailed,
            "media_approved" => Self::MediaApproved,
            "media_rejected" => Self::MediaRejected,
            "media_featured" => Self::MediaFeatured,
            "new_content" => Self::NewContent,
            "new_comment" => Self::NewComment,
            "comment_reply" => Self::CommentReply,
            "comment_liked" => Self::CommentLiked,
            "comment_mention" => Self::CommentMention,
            "comment_moderated" => Self::CommentModerated,
            "new_follower" => Self::NewFollower,
            "content_liked" => Self::ContentLiked,
            "content_shared" => Self::ContentShared,
            "system_announcement" => Self::SystemAnnouncement,
            "system_maintenance" => Self::SystemMaintenance,
            "account_warning" => Self::AccountWarning,
            "moderation_action" => Self::ModerationAction,
            "quota_warning" => Self::QuotaWarning,
            other => {
                return Err(notify_core::AppError::validation(format!(
                    "Unknown notification kind: '{other}'"
                )));
            }
        };
        Ok(kind)
    }
}

impl TryFrom<String> for NotificationKind {
    type Error = notify_core::AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_string() {
        for kind in [
            NotificationKind::Welcome,
            NotificationKind::UploadCompleted,
            NotificationKind::NewContent,
            NotificationKind::QuotaWarning,
        ] {
            assert_eq!(kind.as_str().parse::<NotificationKind>().unwrap(), kind);
        }
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&NotificationKind::NewComment).unwrap();
        assert_eq!(json, "\"new_comment\"");
    }

    #[test]
    fn unknown_kind_is_rejected_as_validation() {
        let err = "telegram_ping".parse::<NotificationKind>().unwrap_err();
        assert_eq!(err.kind, notify_core::error::ErrorKind::Validation);

        let err = NotificationKind::try_from("telegram_ping".to_string()).unwrap_err();
        assert_eq!(err.kind, notify_core::error::ErrorKind::Validation);
    }
}
