//! Notification entity model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::NotificationKind;

/// Priority of a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    /// The snake_case wire/database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = notify_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(notify_core::AppError::validation(format!(
                "Unknown priority: '{other}'. Expected one of: low, medium, high, critical"
            ))),
        }
    }
}

impl TryFrom<String> for Priority {
    type Error = notify_core::AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A delivery channel requested for a notification.
///
/// Only `websocket` and `in_app` are delivered by this service; `email`
/// and `push` are recorded for downstream dispatchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryChannel {
    Websocket,
    Email,
    Push,
    InApp,
}

impl DeliveryChannel {
    /// The default channel set applied when a creation request names none.
    pub fn defaults() -> Vec<Self> {
        vec![Self::Websocket, Self::InApp]
    }
}

/// A notification delivered to a user.
///
/// Identity is immutable; only the read state may change after creation,
/// and only through the owning user's own actions or the cleanup job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// The recipient user. Required, never changes.
    pub user_id: Uuid,
    /// Notification kind.
    #[sqlx(try_from = "String")]
    pub kind: NotificationKind,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Additional structured data, opaque to this service.
    pub data: Option<serde_json::Value>,
    /// Priority level.
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    /// Requested delivery channels.
    pub channels: sqlx::types::Json<Vec<DeliveryChannel>>,
    /// Whether the user has read this notification.
    pub is_read: bool,
    /// When the notification was read. Non-null iff `is_read` is true.
    pub read_at: Option<DateTime<Utc>>,
    /// When the notification was handed to delivery (not an ACK).
    pub sent_at: DateTime<Utc>,
    /// When the notification becomes eligible for cleanup.
    pub expires_at: Option<DateTime<Utc>>,
    /// Loose reference to the domain object that caused the notification.
    pub related_entity_id: Option<String>,
    /// Type of the related domain object.
    pub related_entity_type: Option<String>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
    /// When the notification was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    /// Check if the notification is still unread.
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }

    /// Check if the notification has expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|exp| exp <= now).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn default_channels_are_websocket_and_in_app() {
        assert_eq!(
            DeliveryChannel::defaults(),
            vec![DeliveryChannel::Websocket, DeliveryChannel::InApp]
        );
    }

    #[test]
    fn priority_round_trips() {
        for p in [Priority::Low, Priority::Medium, Priority::High, Priority::Critical] {
            assert_eq!(p.as_str().parse::<Priority>().unwrap(), p);
        }
    }

    #[test]
    fn unknown_priority_is_rejected_as_validation() {
        let err = Priority::try_from("urgent".to_string()).unwrap_err();
        assert_eq!(err.kind, notify_core::error::ErrorKind::Validation);
    }
}
