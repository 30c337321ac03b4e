use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use crate::repository::TokenVerifier;

use super::PgStore;

#[async_trait]
impl TokenVerifier for PgStore {
    #[tracing::instrument(skip_all)]
    async fn verify(&self, token: &str) -> Result<Option<Uuid>, anyhow::Error> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT user_id FROM tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(self.pool())
        .await
        .context("Failed to retrieve the user id associated with the provided token.")
    }
}
