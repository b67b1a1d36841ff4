//! Interaction repository for PostgreSQL.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::models::Interaction;

/// Interaction action kinds.
pub mod actions {
    pub const VIEW: &str = "view";
}

/// Repository for interaction operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InteractionRepo: Send + Sync {
    /// Record an interaction unless the same (user, action, question) exists.
    /// Returns the new interaction, or None if it was already recorded.
    async fn record(
        &self,
        user_id: Uuid,
        action: &str,
        question_id: Uuid,
    ) -> Result<Option<Interaction>>;
}

/// PostgreSQL implementation of InteractionRepo.
#[derive(Clone)]
pub struct PgInteractionRepo {
    pool: Pool<Postgres>,
}

impl PgInteractionRepo {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InteractionRepo for PgInteractionRepo {
    async fn record(
        &self,
        user_id: Uuid,
        action: &str,
        question_id: Uuid,
    ) -> Result<Option<Interaction>> {
        // The unique index makes check-then-insert a single atomic statement.
        let interaction = sqlx::query_as::<_, Interaction>(
            r#"
            INSERT INTO interactions (user_id, action, question_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, action, question_id) DO NOTHING
            RETURNING id, user_id, action, question_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(action)
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(interaction)
    }
}
