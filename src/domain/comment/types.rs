use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{AuthorSnapshot, AuthorView, UserProfile};

#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct CommentRecord {
    pub id: Uuid,
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub author_id: Uuid,
    pub author_username: String,
    pub author_display_name: String,
    pub author_profile_image: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CommentRecord {
    pub fn snapshot(&self) -> AuthorSnapshot<'_> {
        AuthorSnapshot {
            username: &self.author_username,
            display_name: &self.author_display_name,
            profile_image: self.author_profile_image.as_deref(),
        }
    }
}

/// Fields rewritten by an edit.
#[derive(Debug, Clone)]
pub struct CommentPatch {
    pub content: String,
    pub image_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CommentResponseBody {
    pub id: Uuid,
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub author_id: Uuid,
    pub author_username: String,
    pub author_display_name: String,
    pub author_display_name_color: String,
    pub author_profile_image: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CommentResponseBody {
    /// Renders a stored comment, preferring the live author profile over the
    /// snapshot taken when the comment was written.
    pub fn render(record: CommentRecord, live_author: Option<&UserProfile>) -> Self {
        let author = AuthorView::resolve(record.snapshot(), live_author);
        Self {
            id: record.id,
            post_id: record.post_id,
            parent_id: record.parent_id,
            author_id: record.author_id,
            author_username: author.username,
            author_display_name: author.display_name,
            author_display_name_color: author.display_name_color,
            author_profile_image: author.profile_image,
            content: record.content,
            image_url: record.image_url,
            is_deleted: record.is_deleted,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct CreateCommentPayload {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

#[derive(Deserialize, Debug)]
pub struct UpdateCommentPayload {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}
