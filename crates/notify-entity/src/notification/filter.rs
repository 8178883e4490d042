//! Query filters for notification listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::kind::NotificationKind;
use super::model::Priority;

/// Filter applied to paginated notification queries.
///
/// All conditions are ANDed; an empty filter matches everything.
/// Ordering is always `created_at` descending.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationFilter {
    /// Restrict to a single kind.
    pub kind: Option<NotificationKind>,
    /// Restrict to a single priority.
    pub priority: Option<Priority>,
    /// Restrict by read state.
    pub is_read: Option<bool>,
    /// Only notifications created at or after this instant.
    pub created_after: Option<DateTime<Utc>>,
    /// Only notifications created before this instant.
    pub created_before: Option<DateTime<Utc>>,
}

impl NotificationFilter {
    /// Filter matching only unread notifications.
    pub fn unread() -> Self {
        Self {
            is_read: Some(false),
            ..Self::default()
        }
    }

    /// Whether this filter selects exactly the unread set.
    ///
    /// Used by the service to refresh the unread cache as a side effect.
    pub fn is_unread_only(&self) -> bool {
        self.is_read == Some(false)
            && self.kind.is_none()
            && self.priority.is_none()
            && self.created_after.is_none()
            && self.created_before.is_none()
    }
}
