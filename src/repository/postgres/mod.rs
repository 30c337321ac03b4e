mod comment;
mod notification;
mod token;
mod user;

use sqlx::PgPool;

/// Postgres-backed implementation of every store trait. Cheap to clone, the
/// pool is reference counted.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
