//! Convenience builders for the notifications this service sends itself.
//!
//! Each builder shapes a [`CreateNotificationRequest`] and hands it to the
//! single creation path; none of them bypass validation, rate limiting, or
//! the created-event publish.

use serde_json::json;
use uuid::Uuid;

use notify_core::result::AppResult;
use notify_entity::notification::{
    CreateNotificationRequest, Notification, NotificationKind, Priority,
};

use crate::service::NotificationService;

impl NotificationService {
    /// Greet a freshly registered user.
    pub async fn send_welcome(&self, user_id: Uuid, username: &str) -> AppResult<Notification> {
        let request = CreateNotificationRequest {
            data: Some(json!({ "username": username })),
            ..CreateNotificationRequest::new(
                user_id,
                NotificationKind::Welcome,
                "Welcome to Lumen",
                format!("Hi {username}, your account is ready. Enjoy!"),
            )
        };
        self.create(request).await
    }

    /// Tell a user about a sign-in on their account.
    pub async fn send_login_alert(
        &self,
        user_id: Uuid,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) -> AppResult<Notification> {
        let location = ip_address.unwrap_or("an unknown address");
        let request = CreateNotificationRequest {
            data: Some(json!({
                "ipAddress": ip_address,
                "userAgent": user_agent,
            })),
            priority: Some(Priority::High),
            ..CreateNotificationRequest::new(
                user_id,
                NotificationKind::LoginAlert,
                "New sign-in to your account",
                format!("Your account was just signed in from {location}."),
            )
        };
        self.create(request).await
    }

    /// Confirm to an uploader that their media finished processing.
    pub async fn send_upload_processed(
        &self,
        user_id: Uuid,
        file_name: &str,
        media_id: &str,
    ) -> AppResult<Notification> {
        let request = CreateNotificationRequest {
            data: Some(json!({ "fileName": file_name, "mediaId": media_id })),
            related_entity_id: Some(media_id.to_string()),
            related_entity_type: Some("media".to_string()),
            ..CreateNotificationRequest::new(
                user_id,
                NotificationKind::UploadCompleted,
                "Upload processed",
                format!("\"{file_name}\" has been processed and is now live."),
            )
        };
        self.create(request).await
    }

    /// Tell a content owner about a new comment.
    pub async fn send_new_comment(
        &self,
        owner_id: Uuid,
        commenter_name: &str,
        media_id: &str,
        comment_id: &str,
        excerpt: Option<&str>,
    ) -> AppResult<Notification> {
        let message = match excerpt {
            Some(excerpt) => format!("{commenter_name} commented: \"{excerpt}\""),
            None => format!("{commenter_name} commented on your upload."),
        };
        let request = CreateNotificationRequest {
            data: Some(json!({
                "commenterName": commenter_name,
                "mediaId": media_id,
                "commentId": comment_id,
            })),
            related_entity_id: Some(comment_id.to_string()),
            related_entity_type: Some("comment".to_string()),
            ..CreateNotificationRequest::new(
                owner_id,
                NotificationKind::NewComment,
                "New comment on your upload",
                message,
            )
        };
        self.create(request).await
    }
}
