//! Shared API request/response types for the question endpoints.

use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title bounds, in bytes.
const MIN_TITLE_LEN: usize = 5;
const MAX_TITLE_LEN: usize = 130;
/// Max tags attached to a single question.
const MAX_TAGS: usize = 5;
/// Max length of a single tag name.
const MAX_TAG_LEN: usize = 30;

/// Ask a new question.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuestionPayload {
    #[garde(length(min = MIN_TITLE_LEN, max = MAX_TITLE_LEN))]
    pub title: String,
    #[garde(length(min = 1))]
    pub content: String,
    /// Tag names. Matched against existing tags case-insensitively.
    #[garde(length(min = 1, max = MAX_TAGS), inner(length(min = 1, max = MAX_TAG_LEN)))]
    pub tags: Vec<String>,
    /// Author user id.
    #[garde(skip)]
    pub author: Uuid,
    /// Rendered page to invalidate once the question exists.
    #[garde(custom(validate_path))]
    pub path: String,
}

/// Returned after a question is created.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateQuestionResponse {
    pub id: Uuid,
}

/// Cast, switch or retract a vote on a question.
///
/// `has_upvoted` and `has_downvoted` describe the caller's vote on the question
/// *before* this request. They are trusted as given and decide whether the
/// request adds, switches or retracts the vote.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuestionVotePayload {
    #[garde(skip)]
    pub user_id: Uuid,
    #[garde(skip)]
    #[serde(default)]
    pub has_upvoted: bool,
    #[garde(skip)]
    #[serde(default)]
    pub has_downvoted: bool,
    #[garde(custom(validate_path))]
    pub path: String,
}

/// Vote sets after a vote was applied.
#[derive(Debug, Serialize, Deserialize)]
pub struct VoteResponse {
    pub upvotes: Vec<Uuid>,
    pub downvotes: Vec<Uuid>,
}

/// Record a view of a question, optionally attributed to a signed-in user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewQuestionPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
}

/// Result of recording a view.
#[derive(Debug, Serialize, Deserialize)]
pub struct ViewQuestionResponse {
    /// False when the user had already viewed the question (or no user was given).
    pub interaction_recorded: bool,
}

fn validate_path(value: &String, _: &()) -> garde::Result {
    if !value.starts_with('/') {
        return Err(garde::Error::new("path must start with '/'"));
    }
    Ok(())
}

// ============================================================================
// Question views
// ============================================================================

/// A question with its tag and author references resolved.
///
/// References that no longer resolve are dropped from `tags`; a missing author
/// is reported as `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionView<T, A> {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub tags: Vec<T>,
    pub author: Option<A>,
    pub upvotes: Vec<Uuid>,
    pub downvotes: Vec<Uuid>,
    pub views: i32,
    pub created_at: DateTime<Utc>,
}

/// Entry of the question listing, with full tag and author records.
pub type QuestionListItem = QuestionView<TagRecord, UserRecord>;

/// Single question page, with trimmed tag and author records.
pub type QuestionDetail = QuestionView<TagInfo, AuthorInfo>;

/// Full tag record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagRecord {
    pub id: Uuid,
    pub name: String,
    /// Questions using this tag.
    pub questions: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Full user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    /// Identifier at the external auth provider.
    pub clerk_id: String,
    pub name: String,
    pub picture: String,
    pub reputation: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagInfo {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorInfo {
    pub id: Uuid,
    pub clerk_id: String,
    pub name: String,
    pub picture: String,
}

/// Response from the question listing endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionListResponse {
    pub questions: Vec<QuestionListItem>,
}
