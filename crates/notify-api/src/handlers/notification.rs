//! Notification REST handlers.
//!
//! The pull surface mirrors the WebSocket queries so clients can fall
//! back to polling when push is unavailable.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use notify_core::types::pagination::{PageRequest, PageResponse};
use notify_entity::notification::{
    MarkAsReadRequest, Notification, NotificationFilter, UpdateNotificationRequest,
};
use notify_service::UnreadSnapshot;

use crate::dto::{ApiResponse, CountResponse, MarkedResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/notifications
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(filter): Query<NotificationFilter>,
    Query(page): Query<PageRequest>,
) -> Result<Json<ApiResponse<PageResponse<Notification>>>, ApiError> {
    let result = state
        .service
        .find_all(auth.user_id(), &filter, &page)
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/notifications/unread
pub async fn unread(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UnreadSnapshot>>, ApiError> {
    let snapshot = state.service.find_unread(auth.user_id()).await?;
    Ok(Json(ApiResponse::ok(snapshot)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.service.unread_count(auth.user_id()).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// GET /api/notifications/{id}
pub async fn get_one(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Notification>>, ApiError> {
    let notification = state.service.find_one(id, auth.user_id()).await?;
    Ok(Json(ApiResponse::ok(notification)))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Notification>>, ApiError> {
    let request = UpdateNotificationRequest {
        is_read: Some(true),
    };
    let updated = state.service.update(id, auth.user_id(), request).await?;
    Ok(Json(ApiResponse::ok(updated)))
}

/// PUT /api/notifications/read
pub async fn mark_many_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<MarkAsReadRequest>,
) -> Result<Json<ApiResponse<MarkedResponse>>, ApiError> {
    let marked = state.service.mark_as_read(auth.user_id(), &request).await?;
    Ok(Json(ApiResponse::ok(MarkedResponse { marked })))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MarkedResponse>>, ApiError> {
    let marked = state.service.mark_all_as_read(auth.user_id()).await?;
    Ok(Json(ApiResponse::ok(MarkedResponse { marked })))
}

/// DELETE /api/notifications/{id}
pub async fn remove(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.service.remove(id, auth.user_id()).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Notification deleted".to_string(),
    })))
}
