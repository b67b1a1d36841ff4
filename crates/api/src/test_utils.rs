//! Shared test utilities for API handler tests.
//!
//! Provides common fixtures, a flexible `TestStateBuilder` for constructing
//! `AppState` instances with only the mocks needed for each test, and an
//! in-memory [`MemoryStore`] for tests that care about stored state rather
//! than individual calls.
//!
//! ## Usage
//!
//! ```ignore
//! use crate::test_utils::{TestStateBuilder, mock_question};
//!
//! let mut question_repo = MockQuestionRepo::new();
//! question_repo.expect_find_by_id().returning(|_| Ok(None));
//!
//! let state = TestStateBuilder::new()
//!     .with_question_repo(question_repo)
//!     .build();
//! ```

mod memory;

pub use memory::MemoryStore;

use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;
use sqlx::error::{DatabaseError, ErrorKind};
use uuid::Uuid;

use crate::models::{Question, Tag, User};
use crate::repos::{
    InteractionRepo, MockInteractionRepo, MockQuestionRepo, MockStatusRepo, MockTagRepo,
    MockUserRepo, QuestionRepo, Repos, StatusRepo, TagRepo, UserRepo,
};
use crate::services::{MockPathRevalidator, PathRevalidator};
use crate::state::AppState;

/// Creates a mock user with zero reputation.
pub fn mock_user(name: &str) -> User {
    User {
        id: Uuid::new_v4(),
        clerk_id: format!("user_{}", name.to_lowercase()),
        name: name.to_string(),
        picture: format!("https://img.example.com/{}.png", name.to_lowercase()),
        reputation: 0,
        created_at: Utc::now(),
    }
}

/// Creates a mock question by the given author, without tags or votes.
pub fn mock_question(author_id: Uuid) -> Question {
    Question {
        id: Uuid::new_v4(),
        title: "How do I share state in axum?".to_string(),
        content: "Handlers need a database pool.".to_string(),
        author_id,
        tags: vec![],
        upvotes: vec![],
        downvotes: vec![],
        views: 0,
        created_at: Utc::now(),
    }
}

/// Creates a mock tag not yet used by any question.
pub fn mock_tag(name: &str) -> Tag {
    Tag {
        id: Uuid::new_v4(),
        name: name.to_string(),
        questions: vec![],
        created_at: Utc::now(),
    }
}

/// Database error as Postgres reports a rejected foreign key.
#[derive(Debug)]
struct ForeignKeyViolation(&'static str);

impl std::fmt::Display for ForeignKeyViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "violates foreign key constraint \"{}\"", self.0)
    }
}

impl std::error::Error for ForeignKeyViolation {}

impl DatabaseError for ForeignKeyViolation {
    fn message(&self) -> &str {
        "insert or update violates foreign key constraint"
    }

    fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self
    }

    fn constraint(&self) -> Option<&str> {
        Some(self.0)
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::ForeignKeyViolation
    }
}

/// The error sqlx returns when Postgres rejects a write on `constraint`.
pub fn foreign_key_violation(constraint: &'static str) -> sqlx::Error {
    sqlx::Error::Database(Box::new(ForeignKeyViolation(constraint)))
}

/// Revalidator expecting exactly one signal for `path`.
pub fn expect_revalidate(path: &'static str) -> MockPathRevalidator {
    let mut revalidator = MockPathRevalidator::new();
    revalidator
        .expect_revalidate()
        .with(eq(path))
        .times(1)
        .returning(|_| ());
    revalidator
}

/// Revalidator accepting any number of signals.
pub fn any_revalidate() -> MockPathRevalidator {
    let mut revalidator = MockPathRevalidator::new();
    revalidator.expect_revalidate().returning(|_| ());
    revalidator
}

/// Builder for constructing test `AppState` with custom mocks.
///
/// Uses default (empty) mocks for any repo/service not explicitly set, so an
/// unexpected call fails the test.
pub struct TestStateBuilder {
    question_repo: Option<Arc<dyn QuestionRepo>>,
    tag_repo: Option<Arc<dyn TagRepo>>,
    user_repo: Option<Arc<dyn UserRepo>>,
    interaction_repo: Option<Arc<dyn InteractionRepo>>,
    status_repo: Option<Arc<dyn StatusRepo>>,
    revalidator: Option<Arc<dyn PathRevalidator>>,
}

impl TestStateBuilder {
    /// Creates a new builder with no mocks configured.
    pub fn new() -> Self {
        Self {
            question_repo: None,
            tag_repo: None,
            user_repo: None,
            interaction_repo: None,
            status_repo: None,
            revalidator: None,
        }
    }

    pub fn with_question_repo(mut self, repo: MockQuestionRepo) -> Self {
        self.question_repo = Some(Arc::new(repo));
        self
    }

    pub fn with_tag_repo(mut self, repo: MockTagRepo) -> Self {
        self.tag_repo = Some(Arc::new(repo));
        self
    }

    pub fn with_user_repo(mut self, repo: MockUserRepo) -> Self {
        self.user_repo = Some(Arc::new(repo));
        self
    }

    pub fn with_interaction_repo(mut self, repo: MockInteractionRepo) -> Self {
        self.interaction_repo = Some(Arc::new(repo));
        self
    }

    pub fn with_status_repo(mut self, repo: MockStatusRepo) -> Self {
        self.status_repo = Some(Arc::new(repo));
        self
    }

    pub fn with_revalidator(mut self, revalidator: MockPathRevalidator) -> Self {
        self.revalidator = Some(Arc::new(revalidator));
        self
    }

    /// Backs every data repository with the same in-memory store.
    pub fn with_memory_store(mut self, store: Arc<MemoryStore>) -> Self {
        self.question_repo = Some(store.clone());
        self.tag_repo = Some(store.clone());
        self.user_repo = Some(store.clone());
        self.interaction_repo = Some(store);
        self
    }

    /// Builds the `AppState` using configured mocks or defaults.
    pub fn build(self) -> AppState {
        let repos = Repos {
            questions: self
                .question_repo
                .unwrap_or_else(|| Arc::new(MockQuestionRepo::new()) as Arc<dyn QuestionRepo>),
            tags: self
                .tag_repo
                .unwrap_or_else(|| Arc::new(MockTagRepo::new()) as Arc<dyn TagRepo>),
            users: self
                .user_repo
                .unwrap_or_else(|| Arc::new(MockUserRepo::new()) as Arc<dyn UserRepo>),
            interactions: self
                .interaction_repo
                .unwrap_or_else(|| Arc::new(MockInteractionRepo::new()) as Arc<dyn InteractionRepo>),
            status: self
                .status_repo
                .unwrap_or_else(|| Arc::new(MockStatusRepo::new()) as Arc<dyn StatusRepo>),
        };

        let revalidator = self
            .revalidator
            .unwrap_or_else(|| Arc::new(MockPathRevalidator::new()) as Arc<dyn PathRevalidator>);

        AppState {
            repos,
            revalidator,
        }
    }
}

impl Default for TestStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
