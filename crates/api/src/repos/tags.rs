//! Tag repository for PostgreSQL.
//!
//! Tag names are unique regardless of case (`tags_name_lower_idx`). A tag is
//! created the first time a question uses it and afterwards only gains
//! question references.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::models::Tag;

/// Repository for tag lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepo: Send + Sync {
    /// Find tags by IDs (bulk lookup for populating questions).
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Tag>>;
}

/// PostgreSQL implementation of TagRepo.
#[derive(Clone)]
pub struct PgTagRepo {
    pool: Pool<Postgres>,
}

impl PgTagRepo {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepo for PgTagRepo {
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Tag>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let tags = sqlx::query_as::<_, Tag>(
            "SELECT id, name, questions, created_at FROM tags WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(tags)
    }
}

/// Find-or-create a tag by name (case-insensitive) and record that
/// `question_id` uses it. Returns the tag id.
///
/// A single statement, so concurrent questions introducing the same new tag
/// can't create duplicates. The stored name keeps the spelling of whoever
/// created the tag first.
pub(crate) async fn upsert_tag(
    conn: &mut PgConnection,
    name: &str,
    question_id: Uuid,
) -> Result<Uuid> {
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO tags (name, questions) VALUES ($1, ARRAY[$2]::uuid[])
        ON CONFLICT ((lower(name)))
        DO UPDATE SET questions = array_append(tags.questions, $2)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(question_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

/// Trim tag names and drop case-insensitive duplicates, keeping the first
/// spelling and the original order. Blank names are dropped.
pub fn unique_tag_names(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Indices of `names` in the order their tags should be upserted: by
/// lowercased name. Concurrent questions sharing tags then lock the tag rows
/// in the same sequence whatever order the request listed them in.
pub(crate) fn upsert_order(names: &[String]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..names.len()).collect();
    order.sort_by_cached_key(|&i| names[i].to_lowercase());
    order
}
