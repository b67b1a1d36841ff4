//! User repository for PostgreSQL.
//!
//! Users are managed elsewhere; this service only reads them and moves their
//! reputation.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::models::User;

const USER_COLUMNS: &str = "id, clerk_id, name, picture, reputation, created_at";

/// Repository for user operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Find users by IDs (bulk lookup for question authors).
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>>;
}

/// PostgreSQL implementation of UserRepo.
#[derive(Clone)]
pub struct PgUserRepo {
    pool: Pool<Postgres>,
}

impl PgUserRepo {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }
}

/// Add `delta` to a user's reputation. Unknown users are ignored.
pub(crate) async fn adjust_reputation(
    conn: &mut PgConnection,
    user_id: Uuid,
    delta: i32,
) -> Result<()> {
    sqlx::query("UPDATE users SET reputation = reputation + $2 WHERE id = $1")
        .bind(user_id)
        .bind(delta)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
