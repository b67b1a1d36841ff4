//! In-memory store implementing every data repository.
//!
//! Follows the same semantics as the Postgres repositories (case-insensitive
//! tag upsert, one interaction per user/action/question, vote and reputation
//! applied together, writes naming an unknown user rejected) so handler tests
//! can assert on resulting state.

use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::{Interaction, NewQuestion, Question, Tag, User};
use crate::repos::{InteractionRepo, QuestionRepo, TagRepo, UserRepo};
use crate::voting::VotePlan;

use super::{foreign_key_violation, mock_user};

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    questions: Vec<Question>,
    tags: Vec<Tag>,
    interactions: Vec<Interaction>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, name: &str) -> User {
        let user = mock_user(name);
        self.inner.lock().unwrap().users.push(user.clone());
        user
    }

    pub fn insert_question(&self, question: Question) -> Uuid {
        let id = question.id;
        self.inner.lock().unwrap().questions.push(question);
        id
    }

    /// Overwrite a question's vote sets.
    pub fn set_votes(&self, question_id: Uuid, upvotes: Vec<Uuid>, downvotes: Vec<Uuid>) {
        let mut inner = self.inner.lock().unwrap();
        let question = inner
            .questions
            .iter_mut()
            .find(|q| q.id == question_id)
            .expect("unknown question");
        question.upvotes = upvotes;
        question.downvotes = downvotes;
    }

    pub fn user(&self, id: Uuid) -> Option<User> {
        let inner = self.inner.lock().unwrap();
        inner.users.iter().find(|u| u.id == id).cloned()
    }

    pub fn question(&self, id: Uuid) -> Option<Question> {
        let inner = self.inner.lock().unwrap();
        inner.questions.iter().find(|q| q.id == id).cloned()
    }

    pub fn tags(&self) -> Vec<Tag> {
        self.inner.lock().unwrap().tags.clone()
    }

    pub fn interactions(&self) -> Vec<Interaction> {
        self.inner.lock().unwrap().interactions.clone()
    }
}

impl Collections {
    fn upsert_tag(&mut self, name: &str, question_id: Uuid) -> Uuid {
        let key = name.to_lowercase();
        if let Some(tag) = self.tags.iter_mut().find(|t| t.name.to_lowercase() == key) {
            tag.questions.push(question_id);
            return tag.id;
        }

        let tag = Tag {
            id: Uuid::new_v4(),
            name: name.to_string(),
            questions: vec![question_id],
            created_at: Utc::now(),
        };
        let id = tag.id;
        self.tags.push(tag);
        id
    }

    fn has_user(&self, id: Uuid) -> bool {
        self.users.iter().any(|u| u.id == id)
    }

    fn adjust_reputation(&mut self, user_id: Uuid, delta: i32) {
        if let Some(user) = self.users.iter_mut().find(|u| u.id == user_id) {
            user.reputation += delta;
        }
    }
}

#[async_trait]
impl QuestionRepo for MemoryStore {
    async fn list(&self) -> Result<Vec<Question>> {
        let mut questions = self.inner.lock().unwrap().questions.clone();
        questions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(questions)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Question>> {
        Ok(self.question(id))
    }

    async fn create(&self, new: &NewQuestion) -> Result<Question> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.has_user(new.author_id) {
            return Err(foreign_key_violation("questions_author_id_fkey").into());
        }

        let mut question = Question {
            id: Uuid::new_v4(),
            title: new.title.clone(),
            content: new.content.clone(),
            author_id: new.author_id,
            tags: vec![],
            upvotes: vec![],
            downvotes: vec![],
            views: 0,
            created_at: Utc::now(),
        };
        for name in &new.tags {
            let tag_id = inner.upsert_tag(name, question.id);
            question.tags.push(tag_id);
        }

        inner.questions.push(question.clone());
        Ok(question)
    }

    async fn apply_vote(
        &self,
        question_id: Uuid,
        voter_id: Uuid,
        plan: VotePlan,
    ) -> Result<Option<Question>> {
        let mut inner = self.inner.lock().unwrap();

        let Some(question) = inner.questions.iter_mut().find(|q| q.id == question_id) else {
            return Ok(None);
        };
        plan.apply(voter_id, &mut question.upvotes, &mut question.downvotes);
        let question = question.clone();

        for (user_id, delta) in plan.reputation_changes(voter_id, question.author_id) {
            inner.adjust_reputation(user_id, delta);
        }
        Ok(Some(question))
    }

    async fn increment_views(&self, id: Uuid) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        match inner.questions.iter_mut().find(|q| q.id == id) {
            Some(question) => {
                question.views += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl TagRepo for MemoryStore {
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Tag>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .tags
            .iter()
            .filter(|t| ids.contains(&t.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl InteractionRepo for MemoryStore {
    async fn record(
        &self,
        user_id: Uuid,
        action: &str,
        question_id: Uuid,
    ) -> Result<Option<Interaction>> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.has_user(user_id) {
            return Err(foreign_key_violation("interactions_user_id_fkey").into());
        }

        let exists = inner
            .interactions
            .iter()
            .any(|i| i.user_id == user_id && i.action == action && i.question_id == question_id);
        if exists {
            return Ok(None);
        }

        let interaction = Interaction {
            id: Uuid::new_v4(),
            user_id,
            action: action.to_string(),
            question_id,
            created_at: Utc::now(),
        };
        inner.interactions.push(interaction.clone());
        Ok(Some(interaction))
    }
}
