use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{CommentPatch, CommentRecord, NotificationRecord, PostRef, UserProfile};
use crate::repository::{NotificationStore, ThreadStore, TokenVerifier, UserDirectory};

#[derive(Default)]
struct State {
    posts: HashMap<Uuid, PostRef>,
    users: HashMap<Uuid, UserProfile>,
    tokens: HashMap<String, Uuid>,
    // insertion order doubles as the tie breaker for equal timestamps
    comments: Vec<CommentRecord>,
    notifications: Vec<NotificationRecord>,
}

/// In-process store implementing every storage trait. The lock is only held
/// for the duration of one operation, mirroring single-record atomicity.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, anyhow::Error> {
        self.state
            .lock()
            .map_err(|_| anyhow::anyhow!("In-memory store lock was poisoned"))
    }

    pub fn insert_post(&self, post: PostRef) -> Result<(), anyhow::Error> {
        self.state()?.posts.insert(post.id, post);
        Ok(())
    }

    pub fn insert_user(&self, user: UserProfile) -> Result<(), anyhow::Error> {
        self.state()?.users.insert(user.id, user);
        Ok(())
    }

    pub fn remove_user(&self, user_id: Uuid) -> Result<Option<UserProfile>, anyhow::Error> {
        Ok(self.state()?.users.remove(&user_id))
    }

    pub fn insert_token(&self, token: &str, user_id: Uuid) -> Result<(), anyhow::Error> {
        self.state()?.tokens.insert(token.to_string(), user_id);
        Ok(())
    }
}

fn children_of(state: &State, comment_id: Uuid) -> usize {
    state
        .comments
        .iter()
        .filter(|c| c.parent_id == Some(comment_id))
        .count()
}

#[async_trait]
impl ThreadStore for InMemoryStore {
    async fn find_post(&self, post_id: Uuid) -> Result<Option<PostRef>, anyhow::Error> {
        Ok(self.state()?.posts.get(&post_id).copied())
    }

    async fn find_comment(&self, comment_id: Uuid) -> Result<Option<CommentRecord>, anyhow::Error> {
        Ok(self
            .state()?
            .comments
            .iter()
            .find(|c| c.id == comment_id)
            .cloned())
    }

    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<CommentRecord>, anyhow::Error> {
        let mut comments: Vec<CommentRecord> = self
            .state()?
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        // stable sort keeps insertion order for equal timestamps
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }

    async fn list_childless_tombstones(
        &self,
        limit: i64,
    ) -> Result<Vec<CommentRecord>, anyhow::Error> {
        let state = self.state()?;
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(state
            .comments
            .iter()
            .filter(|c| c.is_deleted && children_of(&state, c.id) == 0)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn insert_comment(&self, comment: &CommentRecord) -> Result<(), anyhow::Error> {
        let mut state = self.state()?;
        if state.comments.iter().any(|c| c.id == comment.id) {
            anyhow::bail!("Comment {} already exists", comment.id);
        }
        state.comments.push(comment.clone());
        Ok(())
    }

    async fn update_comment(
        &self,
        comment_id: Uuid,
        patch: &CommentPatch,
    ) -> Result<bool, anyhow::Error> {
        let mut state = self.state()?;
        match state.comments.iter_mut().find(|c| c.id == comment_id) {
            Some(comment) => {
                comment.content = patch.content.clone();
                comment.image_url = patch.image_url.clone();
                comment.updated_at = Some(patch.updated_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn tombstone_comment(
        &self,
        comment_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<bool, anyhow::Error> {
        let mut state = self.state()?;
        match state.comments.iter_mut().find(|c| c.id == comment_id) {
            Some(comment) => {
                comment.is_deleted = true;
                comment.content.clear();
                comment.image_url = None;
                comment.updated_at = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_comment(&self, comment_id: Uuid) -> Result<bool, anyhow::Error> {
        let mut state = self.state()?;
        let before = state.comments.len();
        state.comments.retain(|c| c.id != comment_id);
        Ok(state.comments.len() < before)
    }

    async fn count_children(&self, comment_id: Uuid) -> Result<i64, anyhow::Error> {
        let state = self.state()?;
        Ok(children_of(&state, comment_id) as i64)
    }
}

#[async_trait]
impl UserDirectory for InMemoryStore {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, anyhow::Error> {
        Ok(self.state()?.users.get(&user_id).cloned())
    }

    async fn find_profiles(
        &self,
        user_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, UserProfile>, anyhow::Error> {
        let state = self.state()?;
        Ok(user_ids
            .iter()
            .filter_map(|id| state.users.get(id).map(|user| (*id, user.clone())))
            .collect())
    }
}

#[async_trait]
impl NotificationStore for InMemoryStore {
    async fn insert_notification(
        &self,
        notification: &NotificationRecord,
    ) -> Result<(), anyhow::Error> {
        self.state()?.notifications.push(notification.clone());
        Ok(())
    }

    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        limit: i64,
    ) -> Result<Vec<NotificationRecord>, anyhow::Error> {
        let state = self.state()?;
        let limit = usize::try_from(limit).unwrap_or(0);
        // newest first, later inserts win ties
        let mut notifications: Vec<NotificationRecord> = state
            .notifications
            .iter()
            .rev()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notifications.truncate(limit);
        Ok(notifications)
    }

    async fn count_unread(&self, recipient_id: Uuid) -> Result<i64, anyhow::Error> {
        Ok(self
            .state()?
            .notifications
            .iter()
            .filter(|n| n.recipient_id == recipient_id && !n.is_read)
            .count() as i64)
    }

    async fn find_notification(
        &self,
        notification_id: Uuid,
    ) -> Result<Option<NotificationRecord>, anyhow::Error> {
        Ok(self
            .state()?
            .notifications
            .iter()
            .find(|n| n.id == notification_id)
            .cloned())
    }

    async fn set_read(
        &self,
        notification_id: Uuid,
        is_read: Option<bool>,
        at: DateTime<Utc>,
    ) -> Result<Option<NotificationRecord>, anyhow::Error> {
        let mut state = self.state()?;
        Ok(state
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id)
            .map(|n| {
                if let Some(is_read) = is_read {
                    n.is_read = is_read;
                }
                n.updated_at = Some(at);
                n.clone()
            }))
    }

    async fn delete_notification(&self, notification_id: Uuid) -> Result<bool, anyhow::Error> {
        let mut state = self.state()?;
        let before = state.notifications.len();
        state.notifications.retain(|n| n.id != notification_id);
        Ok(state.notifications.len() < before)
    }

    async fn delete_all_for_recipient(&self, recipient_id: Uuid) -> Result<u64, anyhow::Error> {
        let mut state = self.state()?;
        let before = state.notifications.len();
        state.notifications.retain(|n| n.recipient_id != recipient_id);
        Ok((before - state.notifications.len()) as u64)
    }
}

#[async_trait]
impl TokenVerifier for InMemoryStore {
    async fn verify(&self, token: &str) -> Result<Option<Uuid>, anyhow::Error> {
        Ok(self.state()?.tokens.get(token).copied())
    }
}
