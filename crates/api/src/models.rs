use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::api::{AuthorInfo, TagInfo, TagRecord, UserRecord};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub clerk_id: String,
    pub name: String,
    pub picture: String,
    /// May go negative.
    pub reputation: i32,
    pub created_at: DateTime<Utc>,
}

/// Question row. `tags`, `upvotes` and `downvotes` hold references by id.
///
/// A user id appears in at most one of `upvotes` and `downvotes`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    pub tags: Vec<Uuid>,
    pub upvotes: Vec<Uuid>,
    pub downvotes: Vec<Uuid>,
    pub views: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub questions: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// A user's action on a question. At most one row per (user, action, question).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Interaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub question_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to create a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    /// Tag names, already deduplicated.
    pub tags: Vec<String>,
}

impl From<Tag> for TagRecord {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            questions: tag.questions,
            created_at: tag.created_at,
        }
    }
}

impl From<Tag> for TagInfo {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

impl From<User> for UserRecord {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            clerk_id: user.clerk_id,
            name: user.name,
            picture: user.picture,
            reputation: user.reputation,
            created_at: user.created_at,
        }
    }
}

impl From<User> for AuthorInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            clerk_id: user.clerk_id,
            name: user.name,
            picture: user.picture,
        }
    }
}
