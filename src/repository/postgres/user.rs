use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::UserProfile;
use crate::repository::UserDirectory;

use super::PgStore;

#[async_trait]
impl UserDirectory for PgStore {
    #[tracing::instrument(skip(self))]
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, anyhow::Error> {
        sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, username, display_name, display_name_color, profile_image
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await
        .context("Failed to fetch user profile")
    }

    #[tracing::instrument(skip_all, fields(requested = user_ids.len()))]
    async fn find_profiles(
        &self,
        user_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, UserProfile>, anyhow::Error> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, username, display_name, display_name_color, profile_image
            FROM users
            WHERE id = ANY($1)
            "#,
        )
        .bind(user_ids)
        .fetch_all(self.pool())
        .await
        .context("Failed to fetch user profiles")?;

        Ok(rows.into_iter().map(|user| (user.id, user)).collect())
    }
}
