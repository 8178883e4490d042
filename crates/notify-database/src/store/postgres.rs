//! PostgreSQL notification store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use notify_core::error::{AppError, ErrorKind};
use notify_core::result::AppResult;
use notify_core::types::pagination::{PageRequest, PageResponse};
use notify_entity::notification::{Notification, NotificationFilter};

use super::NotificationStore;

/// PostgreSQL-backed notification store.
#[derive(Debug, Clone)]
pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    /// Create a new store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Append the filter conditions to a query that already names the table.
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, user_id: Uuid, filter: &NotificationFilter) {
    builder.push(" WHERE user_id = ").push_bind(user_id);
    if let Some(kind) = filter.kind {
        builder.push(" AND kind = ").push_bind(kind.as_str());
    }
    if let Some(priority) = filter.priority {
        builder.push(" AND priority = ").push_bind(priority.as_str());
    }
    if let Some(is_read) = filter.is_read {
        builder.push(" AND is_read = ").push_bind(is_read);
    }
    if let Some(after) = filter.created_after {
        builder.push(" AND created_at >= ").push_bind(after);
    }
    if let Some(before) = filter.created_before {
        builder.push(" AND created_at < ").push_bind(before);
    }
}

fn db_err(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, context, e)
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn insert(&self, notification: Notification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications \
             (id, user_id, kind, title, message, data, priority, channels, is_read, read_at, \
              sent_at, expires_at, related_entity_id, related_entity_type, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING *",
        )
        .bind(notification.id)
        .bind(notification.user_id)
        .bind(notification.kind.as_str())
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(&notification.data)
        .bind(notification.priority.as_str())
        .bind(&notification.channels)
        .bind(notification.is_read)
        .bind(notification.read_at)
        .bind(notification.sent_at)
        .bind(notification.expires_at)
        .bind(&notification.related_entity_id)
        .bind(&notification.related_entity_type)
        .bind(notification.created_at)
        .bind(notification.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to insert notification"))
    }

    async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to fetch notification"))
    }

    async fn find_page(
        &self,
        user_id: Uuid,
        filter: &NotificationFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM notifications");
        push_filter(&mut count_query, user_id, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Failed to count notifications"))?;

        let mut list_query = QueryBuilder::new("SELECT * FROM notifications");
        push_filter(&mut list_query, user_id, filter);
        list_query
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(page.limit() as i64)
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);

        let items = list_query
            .build_query_as::<Notification>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to list notifications"))?;

        Ok(PageResponse::new(items, page.page, page.page_size, total as u64))
    }

    async fn find_unread(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE user_id = $1 AND is_read = FALSE \
             ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list unread notifications"))
    }

    async fn count_unread(&self, user_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to count unread notifications"))
    }

    async fn set_read(
        &self,
        id: Uuid,
        user_id: Uuid,
        is_read: bool,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications \
             SET is_read = $3, read_at = CASE WHEN $3 THEN $4 ELSE NULL END, updated_at = $4 \
             WHERE id = $1 AND user_id = $2 \
             RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .bind(is_read)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to update notification"))
    }

    async fn mark_read(
        &self,
        user_id: Uuid,
        ids: Option<&[Uuid]>,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = match ids {
            Some(ids) => {
                sqlx::query(
                    "UPDATE notifications SET is_read = TRUE, read_at = $3, updated_at = $3 \
                     WHERE user_id = $1 AND id = ANY($2) AND is_read = FALSE",
                )
                .bind(user_id)
                .bind(ids)
                .bind(now)
                .execute(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    "UPDATE notifications SET is_read = TRUE, read_at = $2, updated_at = $2 \
                     WHERE user_id = $1 AND is_read = FALSE",
                )
                .bind(user_id)
                .bind(now)
                .execute(&self.pool)
                .await
            }
        }
        .map_err(db_err("Failed to mark notifications read"))?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to delete notification"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM notifications WHERE expires_at IS NOT NULL AND expires_at <= $1",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to delete expired notifications"))?;
        Ok(result.rows_affected())
    }

    async fn distinct_user_ids(&self) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar("SELECT DISTINCT user_id FROM notifications")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to list notification recipients"))
    }
}
