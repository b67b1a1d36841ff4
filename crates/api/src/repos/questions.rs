//! Question repository for PostgreSQL.
//!
//! Multi-step mutations run in a single transaction: creating a question
//! together with its tags, and applying a vote together with both reputation
//! adjustments.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{
    tags::{upsert_order, upsert_tag},
    users::adjust_reputation,
};
use crate::{
    models::{NewQuestion, Question},
    voting::{VotePlan, VoteTransition},
};

const QUESTION_COLUMNS: &str =
    "id, title, content, author_id, tags, upvotes, downvotes, views, created_at";

/// Repository for question operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepo: Send + Sync {
    /// All questions, newest first.
    async fn list(&self) -> Result<Vec<Question>>;

    /// Find a question by ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Question>>;

    /// Create a question and attach its tags, creating tags that don't exist yet.
    async fn create(&self, question: &NewQuestion) -> Result<Question>;

    /// Apply a vote and the matching reputation changes.
    /// Returns None (and changes nothing) if the question doesn't exist.
    async fn apply_vote(
        &self,
        question_id: Uuid,
        voter_id: Uuid,
        plan: VotePlan,
    ) -> Result<Option<Question>>;

    /// Increment the view counter. Returns false if the question doesn't exist.
    async fn increment_views(&self, id: Uuid) -> Result<bool>;
}

/// PostgreSQL implementation of QuestionRepo.
#[derive(Clone)]
pub struct PgQuestionRepo {
    pool: Pool<Postgres>,
}

impl PgQuestionRepo {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Build the UPDATE for a vote. `$1` is the question id, `$2` the voter id.
fn vote_update_sql(plan: &VotePlan) -> String {
    let target = plan.direction.column();
    let opposite = plan.direction.opposite().column();

    let assignments = match plan.transition {
        VoteTransition::Retract => format!("{target} = array_remove({target}, $2)"),
        VoteTransition::Switch | VoteTransition::Add => format!(
            "{target} = CASE WHEN $2 = ANY({target}) THEN {target} ELSE array_append({target}, $2) END, \
             {opposite} = array_remove({opposite}, $2)"
        ),
    };

    format!("UPDATE questions SET {assignments} WHERE id = $1 RETURNING {QUESTION_COLUMNS}")
}

#[async_trait]
impl QuestionRepo for PgQuestionRepo {
    async fn list(&self) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Question>> {
        let question = sqlx::query_as::<_, Question>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(question)
    }

    async fn create(&self, question: &NewQuestion) -> Result<Question> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Question>(&format!(
            "INSERT INTO questions (title, content, author_id) VALUES ($1, $2, $3) \
             RETURNING {QUESTION_COLUMNS}"
        ))
        .bind(&question.title)
        .bind(&question.content)
        .bind(question.author_id)
        .fetch_one(&mut *tx)
        .await?;

        // Tags reference the question, so it has to exist first. Upserts run in
        // name order; ids are attached in request order.
        let mut tag_ids = vec![Uuid::nil(); question.tags.len()];
        for index in upsert_order(&question.tags) {
            tag_ids[index] = upsert_tag(&mut tx, &question.tags[index], created.id).await?;
        }

        let created = sqlx::query_as::<_, Question>(&format!(
            "UPDATE questions SET tags = array_cat(tags, $2) WHERE id = $1 \
             RETURNING {QUESTION_COLUMNS}"
        ))
        .bind(created.id)
        .bind(&tag_ids)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn apply_vote(
        &self,
        question_id: Uuid,
        voter_id: Uuid,
        plan: VotePlan,
    ) -> Result<Option<Question>> {
        let mut tx = self.pool.begin().await?;

        let question = sqlx::query_as::<_, Question>(&vote_update_sql(&plan))
            .bind(question_id)
            .bind(voter_id)
            .fetch_optional(&mut *tx)
            .await?;

        // Dropping the transaction rolls it back.
        let Some(question) = question else {
            return Ok(None);
        };

        for (user_id, delta) in plan.reputation_changes(voter_id, question.author_id) {
            adjust_reputation(&mut tx, user_id, delta).await?;
        }

        tx.commit().await?;
        Ok(Some(question))
    }

    async fn increment_views(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("UPDATE questions SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
