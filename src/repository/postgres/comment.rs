use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{CommentPatch, CommentRecord, PostRef};
use crate::repository::ThreadStore;

use super::PgStore;

const COMMENT_COLUMNS: &str = r#"
    id, post_id, parent_id, author_id, author_username, author_display_name,
    author_profile_image, content, image_url, is_deleted, created_at, updated_at
"#;

#[async_trait]
impl ThreadStore for PgStore {
    #[tracing::instrument(skip(self))]
    async fn find_post(&self, post_id: Uuid) -> Result<Option<PostRef>, anyhow::Error> {
        sqlx::query_as::<_, PostRef>(
            r#"
            SELECT id, author_id
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(self.pool())
        .await
        .context("Failed to fetch post")
    }

    #[tracing::instrument(skip(self))]
    async fn find_comment(&self, comment_id: Uuid) -> Result<Option<CommentRecord>, anyhow::Error> {
        let query = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1");

        sqlx::query_as::<_, CommentRecord>(&query)
            .bind(comment_id)
            .fetch_optional(self.pool())
            .await
            .context("Failed to fetch comment")
    }

    #[tracing::instrument(skip(self))]
    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<CommentRecord>, anyhow::Error> {
        let query = format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at ASC, seq ASC
            "#
        );

        sqlx::query_as::<_, CommentRecord>(&query)
            .bind(post_id)
            .fetch_all(self.pool())
            .await
            .context("Failed to load comments for post")
    }

    #[tracing::instrument(skip(self))]
    async fn list_childless_tombstones(
        &self,
        limit: i64,
    ) -> Result<Vec<CommentRecord>, anyhow::Error> {
        let query = format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM comments c
            WHERE c.is_deleted
            AND NOT EXISTS (
                SELECT 1 FROM comments child WHERE child.parent_id = c.id
            )
            ORDER BY c.updated_at ASC NULLS FIRST
            LIMIT $1
            "#
        );

        sqlx::query_as::<_, CommentRecord>(&query)
            .bind(limit)
            .fetch_all(self.pool())
            .await
            .context("Failed to load childless tombstones")
    }

    #[tracing::instrument(skip_all, fields(comment_id=%comment.id, post_id=%comment.post_id))]
    async fn insert_comment(&self, comment: &CommentRecord) -> Result<(), anyhow::Error> {
        sqlx::query(
            r#"
            INSERT INTO comments (
                id, post_id, parent_id, author_id, author_username, author_display_name,
                author_profile_image, content, image_url, is_deleted, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(comment.id)
        .bind(comment.post_id)
        .bind(comment.parent_id)
        .bind(comment.author_id)
        .bind(&comment.author_username)
        .bind(&comment.author_display_name)
        .bind(&comment.author_profile_image)
        .bind(&comment.content)
        .bind(&comment.image_url)
        .bind(comment.is_deleted)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(self.pool())
        .await
        .context("Failed to insert comment")?;

        Ok(())
    }

    #[tracing::instrument(skip(self, patch))]
    async fn update_comment(
        &self,
        comment_id: Uuid,
        patch: &CommentPatch,
    ) -> Result<bool, anyhow::Error> {
        let result = sqlx::query(
            r#"
            UPDATE comments
            SET content = $1, image_url = $2, updated_at = $3
            WHERE id = $4
            "#,
        )
        .bind(&patch.content)
        .bind(&patch.image_url)
        .bind(patch.updated_at)
        .bind(comment_id)
        .execute(self.pool())
        .await
        .context("Failed to update comment")?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self))]
    async fn tombstone_comment(
        &self,
        comment_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<bool, anyhow::Error> {
        let result = sqlx::query(
            r#"
            UPDATE comments
            SET is_deleted = TRUE, content = '', image_url = NULL, updated_at = $1
            WHERE id = $2
            "#,
        )
        .bind(at)
        .bind(comment_id)
        .execute(self.pool())
        .await
        .context("Failed to mark comment as deleted")?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_comment(&self, comment_id: Uuid) -> Result<bool, anyhow::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM comments
            WHERE id = $1
            "#,
        )
        .bind(comment_id)
        .execute(self.pool())
        .await
        .context("Failed to delete comment")?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self))]
    async fn count_children(&self, comment_id: Uuid) -> Result<i64, anyhow::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM comments
            WHERE parent_id = $1
            "#,
        )
        .bind(comment_id)
        .fetch_one(self.pool())
        .await
        .context("Failed to count replies of comment")
    }
}
