use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::NotificationRecord;
use crate::repository::NotificationStore;

use super::PgStore;

#[async_trait]
impl NotificationStore for PgStore {
    #[tracing::instrument(skip_all, fields(recipient_id=%notification.recipient_id))]
    async fn insert_notification(
        &self,
        notification: &NotificationRecord,
    ) -> Result<(), anyhow::Error> {
        sqlx::query(
            r#"
            INSERT INTO notifications (
                id, recipient_id, actor_id, actor_username, actor_display_name, kind,
                post_id, comment_id, message, is_read, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(notification.id)
        .bind(notification.recipient_id)
        .bind(notification.actor_id)
        .bind(&notification.actor_username)
        .bind(&notification.actor_display_name)
        .bind(&notification.kind)
        .bind(notification.post_id)
        .bind(notification.comment_id)
        .bind(&notification.message)
        .bind(notification.is_read)
        .bind(notification.created_at)
        .bind(notification.updated_at)
        .execute(self.pool())
        .await
        .context("Failed to insert notification")?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        limit: i64,
    ) -> Result<Vec<NotificationRecord>, anyhow::Error> {
        sqlx::query_as::<_, NotificationRecord>(
            r#"
            SELECT id, recipient_id, actor_id, actor_username, actor_display_name, kind,
                   post_id, comment_id, message, is_read, created_at, updated_at
            FROM notifications
            WHERE recipient_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(recipient_id)
        .bind(limit)
        .fetch_all(self.pool())
        .await
        .context("Failed to load notifications")
    }

    #[tracing::instrument(skip(self))]
    async fn count_unread(&self, recipient_id: Uuid) -> Result<i64, anyhow::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM notifications
            WHERE recipient_id = $1 AND is_read = FALSE
            "#,
        )
        .bind(recipient_id)
        .fetch_one(self.pool())
        .await
        .context("Failed to count unread notifications")
    }

    #[tracing::instrument(skip(self))]
    async fn find_notification(
        &self,
        notification_id: Uuid,
    ) -> Result<Option<NotificationRecord>, anyhow::Error> {
        sqlx::query_as::<_, NotificationRecord>(
            r#"
            SELECT id, recipient_id, actor_id, actor_username, actor_display_name, kind,
                   post_id, comment_id, message, is_read, created_at, updated_at
            FROM notifications
            WHERE id = $1
            "#,
        )
        .bind(notification_id)
        .fetch_optional(self.pool())
        .await
        .context("Failed to fetch notification")
    }

    #[tracing::instrument(skip(self))]
    async fn set_read(
        &self,
        notification_id: Uuid,
        is_read: Option<bool>,
        at: DateTime<Utc>,
    ) -> Result<Option<NotificationRecord>, anyhow::Error> {
        // COALESCE keeps the stored flag when the caller only touches the timestamp
        sqlx::query_as::<_, NotificationRecord>(
            r#"
            UPDATE notifications
            SET is_read = COALESCE($1, is_read), updated_at = $2
            WHERE id = $3
            RETURNING id, recipient_id, actor_id, actor_username, actor_display_name, kind,
                      post_id, comment_id, message, is_read, created_at, updated_at
            "#,
        )
        .bind(is_read)
        .bind(at)
        .bind(notification_id)
        .fetch_optional(self.pool())
        .await
        .context("Failed to update notification")
    }

    #[tracing::instrument(skip(self))]
    async fn delete_notification(&self, notification_id: Uuid) -> Result<bool, anyhow::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(notification_id)
            .execute(self.pool())
            .await
            .context("Failed to delete notification")?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_all_for_recipient(&self, recipient_id: Uuid) -> Result<u64, anyhow::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE recipient_id = $1")
            .bind(recipient_id)
            .execute(self.pool())
            .await
            .context("Failed to delete notifications")?;

        Ok(result.rows_affected())
    }
}
