//! Database repositories (PostgreSQL).
//!
//! This module contains traits and implementations for database access.
//! Each repository is abstracted behind a trait to enable mocking in tests.
//!
//! ## Repositories
//!
//! - **questions** - Question creation, votes and view counts
//! - **tags** - Tag lookups and the case-insensitive tag upsert
//! - **users** - Author lookups and reputation adjustments
//! - **interactions** - One-per-user interaction records (views)
//! - **status** - Database health check
//!
//! ## Usage in Handlers
//!
//! Repositories are accessed via `state.repos`:
//!
//! ```ignore
//! async fn handler(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
//!     let question = state.repos.questions.find_by_id(question_id).await?;
//!     let tags = state.repos.tags.find_by_ids(&question.tags).await?;
//! }
//! ```

mod interactions;
mod questions;
mod status;
mod tags;
mod users;

pub use interactions::{InteractionRepo, PgInteractionRepo, actions};
pub use questions::{PgQuestionRepo, QuestionRepo};
pub use status::{PgStatusRepo, StatusRepo};
pub use tags::{PgTagRepo, TagRepo, unique_tag_names};
pub use users::{PgUserRepo, UserRepo};

#[cfg(test)]
pub use interactions::MockInteractionRepo;
#[cfg(test)]
pub use questions::MockQuestionRepo;
#[cfg(test)]
pub use status::MockStatusRepo;
#[cfg(test)]
pub use tags::MockTagRepo;
#[cfg(test)]
pub use users::MockUserRepo;

use std::sync::Arc;

/// Collection of all database repositories.
#[derive(Clone)]
pub struct Repos {
    pub questions: Arc<dyn QuestionRepo>,
    pub tags: Arc<dyn TagRepo>,
    pub users: Arc<dyn UserRepo>,
    pub interactions: Arc<dyn InteractionRepo>,
    pub status: Arc<dyn StatusRepo>,
}
