use uuid::Uuid;

/// The slice of a post the comment thread needs: existence and ownership.
#[derive(sqlx::FromRow, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostRef {
    pub id: Uuid,
    pub author_id: Uuid,
}
