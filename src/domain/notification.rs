use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::UserProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Comment,
    Reply,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Comment => "comment",
            NotificationKind::Reply => "reply",
        }
    }

    pub fn message(&self, actor_display_name: &str) -> String {
        match self {
            NotificationKind::Comment => format!("{actor_display_name} commented on your post."),
            NotificationKind::Reply => format!("{actor_display_name} replied to your comment."),
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the comment thread asks the notifier to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub recipient_id: Uuid,
    pub actor_id: Uuid,
    pub kind: NotificationKind,
    pub post_id: Uuid,
    pub comment_id: Option<Uuid>,
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct NotificationRecord {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub actor_id: Uuid,
    pub actor_username: String,
    pub actor_display_name: String,
    pub kind: String,
    pub post_id: Uuid,
    pub comment_id: Option<Uuid>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Debug)]
pub struct NotificationResponseBody {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub actor_id: Uuid,
    pub actor_username: String,
    pub actor_display_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub post_id: Uuid,
    pub comment_id: Option<Uuid>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl NotificationResponseBody {
    pub fn render(record: NotificationRecord, live_actor: Option<&UserProfile>) -> Self {
        let (actor_username, actor_display_name) = match live_actor {
            Some(actor) => (actor.username.clone(), actor.display_name.clone()),
            None => (record.actor_username, record.actor_display_name),
        };

        Self {
            id: record.id,
            recipient_id: record.recipient_id,
            actor_id: record.actor_id,
            actor_username,
            actor_display_name,
            kind: record.kind,
            post_id: record.post_id,
            comment_id: record.comment_id,
            message: record.message,
            is_read: record.is_read,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct UpdateNotificationPayload {
    #[serde(default)]
    pub is_read: Option<bool>,
}
