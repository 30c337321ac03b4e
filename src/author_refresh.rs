use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::UserProfile;
use crate::repository::UserDirectory;

/// Loads the current profiles of `user_ids` in one round trip. A failed
/// lookup degrades to an empty map so callers render the stored snapshots.
#[tracing::instrument(name = "Refresh author profiles", skip_all)]
pub async fn live_profiles(
    users: &dyn UserDirectory,
    user_ids: impl IntoIterator<Item = Uuid>,
) -> HashMap<Uuid, UserProfile> {
    let mut ids: Vec<Uuid> = user_ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();

    match users.find_profiles(&ids).await {
        Ok(profiles) => profiles,
        Err(e) => {
            tracing::warn!(
                error.cause_chain = ?e,
                error.message = %e,
                "Failed to refresh author profiles, falling back to stored copies"
            );
            HashMap::new()
        }
    }
}
