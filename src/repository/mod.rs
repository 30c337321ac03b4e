//! Storage seams. Every method is a single atomic read or write against the
//! backing store; nothing here spans more than one record mutation.

mod memory;
mod postgres;

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{CommentPatch, CommentRecord, NotificationRecord, PostRef, UserProfile};

pub use memory::InMemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait ThreadStore: Send + Sync {
    async fn find_post(&self, post_id: Uuid) -> Result<Option<PostRef>, anyhow::Error>;

    async fn find_comment(&self, comment_id: Uuid) -> Result<Option<CommentRecord>, anyhow::Error>;

    /// All comments of a post, oldest first.
    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<CommentRecord>, anyhow::Error>;

    /// Tombstones across every post that currently have no replies.
    async fn list_childless_tombstones(
        &self,
        limit: i64,
    ) -> Result<Vec<CommentRecord>, anyhow::Error>;

    async fn insert_comment(&self, comment: &CommentRecord) -> Result<(), anyhow::Error>;

    /// Returns `false` when the comment no longer exists.
    async fn update_comment(
        &self,
        comment_id: Uuid,
        patch: &CommentPatch,
    ) -> Result<bool, anyhow::Error>;

    /// Marks the comment deleted and clears its content and image.
    async fn tombstone_comment(
        &self,
        comment_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<bool, anyhow::Error>;

    /// Returns `false` when there was nothing to delete.
    async fn delete_comment(&self, comment_id: Uuid) -> Result<bool, anyhow::Error>;

    async fn count_children(&self, comment_id: Uuid) -> Result<i64, anyhow::Error>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, anyhow::Error>;

    /// Unknown ids are simply absent from the returned map.
    async fn find_profiles(
        &self,
        user_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, UserProfile>, anyhow::Error>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert_notification(
        &self,
        notification: &NotificationRecord,
    ) -> Result<(), anyhow::Error>;

    /// Newest first.
    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        limit: i64,
    ) -> Result<Vec<NotificationRecord>, anyhow::Error>;

    async fn count_unread(&self, recipient_id: Uuid) -> Result<i64, anyhow::Error>;

    async fn find_notification(
        &self,
        notification_id: Uuid,
    ) -> Result<Option<NotificationRecord>, anyhow::Error>;

    async fn set_read(
        &self,
        notification_id: Uuid,
        is_read: Option<bool>,
        at: DateTime<Utc>,
    ) -> Result<Option<NotificationRecord>, anyhow::Error>;

    async fn delete_notification(&self, notification_id: Uuid) -> Result<bool, anyhow::Error>;

    async fn delete_all_for_recipient(&self, recipient_id: Uuid) -> Result<u64, anyhow::Error>;
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Resolves an access token to the user it was issued for.
    async fn verify(&self, token: &str) -> Result<Option<Uuid>, anyhow::Error>;
}
