//! Per-event handlers mapping domain events to notifications.

use tracing::{debug, info};

use notify_core::events::{
    DomainEvent, NewCommentEvent, UploadCompletedEvent, UserLoginEvent, UserRegisteredEvent,
};
use notify_core::result::AppResult;
use notify_entity::notification::{BroadcastRequest, NotificationKind};
use notify_service::NotificationService;

/// Route a recognized event to its handler.
pub async fn dispatch(service: &NotificationService, event: DomainEvent) -> AppResult<()> {
    match event {
        DomainEvent::UserRegistered(e) => on_user_registered(service, e).await,
        DomainEvent::UserLogin(e) => on_user_login(service, e).await,
        DomainEvent::UploadCompleted(e) => on_upload_completed(service, e).await,
        DomainEvent::NewComment(e) => on_new_comment(service, e).await,
        DomainEvent::Unknown { event, .. } => {
            debug!(event = %event, "Unknown event reached dispatch");
            Ok(())
        }
    }
}

async fn on_user_registered(
    service: &NotificationService,
    event: UserRegisteredEvent,
) -> AppResult<()> {
    let username = event.username.as_deref().unwrap_or("there");
    service.send_welcome(event.user_id, username).await?;
    info!(user_id = %event.user_id, "Welcome notification sent");
    Ok(())
}

async fn on_user_login(service: &NotificationService, event: UserLoginEvent) -> AppResult<()> {
    service
        .send_login_alert(
            event.user_id,
            event.ip_address.as_deref(),
            event.user_agent.as_deref(),
        )
        .await?;
    Ok(())
}

/// The uploader gets a confirmation; everyone else hears about new content.
async fn on_upload_completed(
    service: &NotificationService,
    event: UploadCompletedEvent,
) -> AppResult<()> {
    service
        .send_upload_processed(event.user_id, &event.file_name, &event.media_id)
        .await?;

    let display_name = event.title.as_deref().unwrap_or(&event.file_name);
    let outcome = service
        .create_broadcast(BroadcastRequest {
            kind: NotificationKind::NewContent,
            title: "New content on Lumen".to_string(),
            message: format!("\"{display_name}\" was just published."),
            data: Some(serde_json::json!({ "mediaId": event.media_id })),
            priority: None,
            exclude_user_id: Some(event.user_id),
        })
        .await?;

    info!(
        user_id = %event.user_id,
        media_id = %event.media_id,
        delivered = outcome.delivered,
        "Upload notifications sent"
    );
    Ok(())
}

async fn on_new_comment(service: &NotificationService, event: NewCommentEvent) -> AppResult<()> {
    // Commenting on your own upload notifies nobody.
    if event.owner_id == event.commenter_id {
        return Ok(());
    }

    let commenter = event.commenter_name.as_deref().unwrap_or("Someone");
    service
        .send_new_comment(
            event.owner_id,
            commenter,
            &event.media_id,
            &event.comment_id,
            event.excerpt.as_deref(),
        )
        .await?;
    Ok(())
}
