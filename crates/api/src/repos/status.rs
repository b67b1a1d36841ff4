//! Status repository for health checks.
//!
//! Healthy means the database answers and has been migrated: every table the
//! handlers touch is present in the current schema.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Pool, Postgres};

/// Tables the question, tag, vote and view handlers read or write.
const REQUIRED_TABLES: [&str; 4] = ["users", "questions", "tags", "interactions"];

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatusRepo: Send + Sync {
    /// True when the database is reachable and fully migrated.
    async fn health_check(&self) -> Result<bool>;
}

#[derive(Clone)]
pub struct PgStatusRepo {
    pool: Pool<Postgres>,
}

impl PgStatusRepo {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatusRepo for PgStatusRepo {
    async fn health_check(&self) -> Result<bool> {
        let present: i64 = sqlx::query_scalar(
            "SELECT count(*) FROM pg_tables \
             WHERE schemaname = current_schema() AND tablename = ANY($1)",
        )
        .bind(&REQUIRED_TABLES[..])
        .fetch_one(&self.pool)
        .await?;

        if present < REQUIRED_TABLES.len() as i64 {
            tracing::warn!(present, required = REQUIRED_TABLES.len(), "schema not migrated");
            return Ok(false);
        }
        Ok(true)
    }
}
