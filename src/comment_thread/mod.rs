//! Lifecycle of a post's comment tree.
//!
//! A comment is `Active`, `Tombstoned` (deleted while replies still hang off
//! it) or purged. A tombstone must always keep at least one reply; the moment
//! its last reply goes away it is purged as well, and that check repeats up
//! the ancestor chain.

mod error;

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{Span, field};
use uuid::Uuid;

pub use error::CommentError;

use crate::author_refresh::live_profiles;
use crate::domain::{
    CommentBody, CommentEdit, CommentPatch, CommentRecord, CommentResponseBody, NewNotification,
    NotificationKind,
};
use crate::notifier::Notifier;
use crate::repository::{ThreadStore, UserDirectory};
use crate::utils::timestamp_now;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Replies exist, the comment stays behind as an empty placeholder.
    Tombstoned,
    /// The record is gone, together with `ancestors` emptied tombstones.
    Purged { ancestors: usize },
}

pub struct CommentThreadManager {
    store: Arc<dyn ThreadStore>,
    users: Arc<dyn UserDirectory>,
    notifier: Arc<dyn Notifier>,
}

impl CommentThreadManager {
    pub fn new(
        store: Arc<dyn ThreadStore>,
        users: Arc<dyn UserDirectory>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            users,
            notifier,
        }
    }

    #[tracing::instrument(
        name = "Create comment",
        skip(self, content, image_url),
        fields(comment_id = field::Empty)
    )]
    pub async fn create(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        content: Option<String>,
        image_url: Option<String>,
        parent_id: Option<Uuid>,
    ) -> Result<CommentResponseBody, CommentError> {
        let post = self
            .store
            .find_post(post_id)
            .await?
            .ok_or(CommentError::NotFound("post"))?;

        let author = self
            .users
            .find_profile(author_id)
            .await?
            .ok_or(CommentError::NotFound("user"))?;

        let parent = match parent_id {
            Some(parent_id) => {
                let parent = self
                    .store
                    .find_comment(parent_id)
                    .await?
                    .filter(|parent| parent.post_id == post.id)
                    .ok_or(CommentError::InvalidParent)?;
                Some(parent)
            }
            None => None,
        };

        let body =
            CommentBody::parse(content, image_url).map_err(CommentError::ValidationError)?;
        if body.is_empty() {
            return Err(CommentError::EmptyContent);
        }

        let record = CommentRecord {
            id: Uuid::new_v4(),
            post_id: post.id,
            parent_id: parent.as_ref().map(|p| p.id),
            author_id,
            author_username: author.username.clone(),
            author_display_name: author.display_name.clone(),
            author_profile_image: author.profile_image.clone(),
            content: body.content.into_inner(),
            image_url: body.image.map(|url| url.into_inner()),
            is_deleted: false,
            created_at: timestamp_now(),
            updated_at: None,
        };
        self.store.insert_comment(&record).await?;
        Span::current().record("comment_id", field::display(record.id));

        let (recipient_id, kind, comment_id) = match &parent {
            Some(parent) => (parent.author_id, NotificationKind::Reply, Some(record.id)),
            None => (post.author_id, NotificationKind::Comment, None),
        };
        if recipient_id != author_id {
            let notification = NewNotification {
                recipient_id,
                actor_id: author_id,
                kind,
                post_id: post.id,
                comment_id,
            };
            if let Err(e) = self.notifier.notify(notification).await {
                tracing::warn!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Failed to notify about a new comment. Skipping."
                );
            }
        }

        Ok(CommentResponseBody::render(record, Some(&author)))
    }

    #[tracing::instrument(name = "Update comment", skip(self, content, image_url))]
    pub async fn update(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        author_id: Uuid,
        content: Option<String>,
        image_url: Option<String>,
    ) -> Result<CommentResponseBody, CommentError> {
        let comment = self.find_in_post(post_id, comment_id).await?;
        if comment.is_deleted {
            return Err(CommentError::NotFound("comment"));
        }
        if comment.author_id != author_id {
            return Err(CommentError::Forbidden);
        }

        let edit = CommentEdit::parse(content, image_url).map_err(CommentError::ValidationError)?;
        let (content, image_url) = edit.apply(&comment);
        if content.is_empty() && image_url.is_none() {
            return Err(CommentError::EmptyContent);
        }

        let patch = CommentPatch {
            content,
            image_url,
            updated_at: timestamp_now(),
        };
        if !self.store.update_comment(comment_id, &patch).await? {
            return Err(CommentError::NotFound("comment"));
        }

        let updated = CommentRecord {
            content: patch.content,
            image_url: patch.image_url,
            updated_at: Some(patch.updated_at),
            ..comment
        };
        let authors = live_profiles(self.users.as_ref(), [updated.author_id]).await;
        let author = authors.get(&updated.author_id);
        Ok(CommentResponseBody::render(updated, author))
    }

    #[tracing::instrument(name = "Delete comment", skip(self))]
    pub async fn delete(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        author_id: Uuid,
    ) -> Result<DeleteOutcome, CommentError> {
        let comment = self.find_in_post(post_id, comment_id).await?;
        if comment.author_id != author_id {
            return Err(CommentError::Forbidden);
        }

        if self.store.count_children(comment_id).await? > 0 {
            if !self
                .store
                .tombstone_comment(comment_id, timestamp_now())
                .await?
            {
                return Err(CommentError::NotFound("comment"));
            }
            return Ok(DeleteOutcome::Tombstoned);
        }

        if !self.store.delete_comment(comment_id).await? {
            tracing::debug!("Comment was purged by a concurrent request");
        }
        let walk = self.purge_empty_tombstones_from(comment.parent_id).await?;

        Ok(DeleteOutcome::Purged {
            ancestors: walk.purged.len(),
        })
    }

    /// Comments of a post, oldest first. Tombstones left without replies are
    /// purged before the thread is returned.
    #[tracing::instrument(name = "List comments", skip(self))]
    pub async fn list(&self, post_id: Uuid) -> Result<Vec<CommentResponseBody>, CommentError> {
        self.store
            .find_post(post_id)
            .await?
            .ok_or(CommentError::NotFound("post"))?;

        let comments = self.store.list_comments(post_id).await?;

        let mut removed = HashSet::new();
        let mut purged = 0;
        for tombstone in comments.iter().filter(|c| c.is_deleted) {
            if removed.contains(&tombstone.id) {
                continue;
            }
            let walk = self.purge_empty_tombstones_from(Some(tombstone.id)).await?;
            purged += walk.purged.len();
            removed.extend(walk.removed());
        }
        if purged > 0 {
            tracing::info!(purged, "Purged empty tombstones while listing");
        }

        let comments: Vec<CommentRecord> = comments
            .into_iter()
            .filter(|c| !removed.contains(&c.id))
            .collect();
        let authors = live_profiles(self.users.as_ref(), comments.iter().map(|c| c.author_id)).await;

        Ok(comments
            .into_iter()
            .map(|comment| {
                let author = authors.get(&comment.author_id);
                CommentResponseBody::render(comment, author)
            })
            .collect())
    }

    /// Purges up to `batch_size` reply-less tombstones across all posts and
    /// returns how many records were removed, cascaded ancestors included.
    #[tracing::instrument(name = "Sweep tombstones", skip(self))]
    pub async fn sweep_tombstones(&self, batch_size: i64) -> Result<usize, anyhow::Error> {
        let tombstones = self.store.list_childless_tombstones(batch_size).await?;

        let mut removed = HashSet::new();
        let mut purged = 0;
        for tombstone in tombstones {
            if removed.contains(&tombstone.id) {
                continue;
            }
            let walk = self.purge_empty_tombstones_from(Some(tombstone.id)).await?;
            purged += walk.purged.len();
            removed.extend(walk.removed());
        }

        Ok(purged)
    }

    async fn find_in_post(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<CommentRecord, CommentError> {
        self.store
            .find_comment(comment_id)
            .await?
            .filter(|comment| comment.post_id == post_id)
            .ok_or(CommentError::NotFound("comment"))
    }

    /// Walks from `start` towards the root, purging every tombstone that has
    /// no replies left. Stops at the first live comment, populated tombstone
    /// or missing record.
    async fn purge_empty_tombstones_from(
        &self,
        start: Option<Uuid>,
    ) -> Result<PurgeWalk, anyhow::Error> {
        let mut walk = PurgeWalk::default();
        let mut next = start;

        while let Some(comment_id) = next {
            let Some(comment) = self.store.find_comment(comment_id).await? else {
                break;
            };
            if !comment.is_deleted || self.store.count_children(comment_id).await? > 0 {
                break;
            }

            if self.store.delete_comment(comment_id).await? {
                tracing::debug!(%comment_id, "Purged empty tombstone");
                walk.purged.push(comment_id);
            } else {
                // another request purged it between the count and the delete
                tracing::debug!(%comment_id, "Tombstone already purged");
                walk.already_gone.push(comment_id);
            }
            next = comment.parent_id;
        }

        Ok(walk)
    }
}

/// Tombstones removed by one upward walk.
#[derive(Debug, Default)]
struct PurgeWalk {
    purged: Vec<Uuid>,
    /// Emptied tombstones a concurrent request removed first.
    already_gone: Vec<Uuid>,
}

impl PurgeWalk {
    fn removed(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.purged.iter().chain(&self.already_gone).copied()
    }
}
