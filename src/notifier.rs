use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{NewNotification, NotificationRecord};
use crate::repository::{NotificationStore, UserDirectory};
use crate::utils::timestamp_now;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: NewNotification) -> Result<(), anyhow::Error>;
}

/// Writes notifications into the inbox store, addressed with the actor's
/// current display name.
pub struct StoreNotifier {
    notifications: Arc<dyn NotificationStore>,
    users: Arc<dyn UserDirectory>,
}

impl StoreNotifier {
    pub fn new(notifications: Arc<dyn NotificationStore>, users: Arc<dyn UserDirectory>) -> Self {
        Self {
            notifications,
            users,
        }
    }
}

#[async_trait]
impl Notifier for StoreNotifier {
    #[tracing::instrument(
        name = "Deliver notification",
        skip_all,
        fields(
            recipient_id = %notification.recipient_id,
            kind = %notification.kind,
        )
    )]
    async fn notify(&self, notification: NewNotification) -> Result<(), anyhow::Error> {
        let actor = self
            .users
            .find_profile(notification.actor_id)
            .await?
            .with_context(|| format!("Unknown notification actor {}", notification.actor_id))?;

        let record = NotificationRecord {
            id: Uuid::new_v4(),
            recipient_id: notification.recipient_id,
            actor_id: notification.actor_id,
            message: notification.kind.message(&actor.display_name),
            actor_username: actor.username,
            actor_display_name: actor.display_name,
            kind: notification.kind.as_str().to_string(),
            post_id: notification.post_id,
            comment_id: notification.comment_id,
            is_read: false,
            created_at: timestamp_now(),
            updated_at: None,
        };

        self.notifications.insert_notification(&record).await
    }
}
