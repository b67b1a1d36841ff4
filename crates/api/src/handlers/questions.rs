//! Question endpoints.
//!
//! Endpoints:
//! - GET /questions - List all questions, newest first, with tags and authors
//! - POST /questions - Ask a question, creating any tags it introduces
//! - GET /questions/{id} - A single question (`null` if it doesn't exist)
//! - POST /questions/{id}/upvote - Add, switch or retract an upvote
//! - POST /questions/{id}/downvote - Add, switch or retract a downvote
//!
//! Mutations signal the front end to revalidate the `path` given in the body.
//!
//! ## Reputation
//!
//! | vote                     | voter | author |
//! |--------------------------|-------|--------|
//! | upvote (add or switch)   | +1    | +10    |
//! | upvote retracted         | -1    | -10    |
//! | downvote (add or switch) | +2    | +10    |
//! | downvote retracted       | -2    | -10    |

use std::collections::{HashMap, HashSet};

use axum::{
    Json, Router, debug_handler,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use garde::Validate;
use shared::api::{
    AuthorInfo, CreateQuestionPayload, CreateQuestionResponse, QuestionDetail,
    QuestionListResponse, QuestionView, QuestionVotePayload, TagInfo, TagRecord, UserRecord,
    VoteResponse,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{NewQuestion, Question},
    repos::unique_tag_names,
    state::AppState,
    voting::{VoteDirection, VotePlan},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_questions).post(create_question))
        .route("/{id}", get(get_question))
        .route("/{id}/upvote", post(upvote_question))
        .route("/{id}/downvote", post(downvote_question))
}

/// Resolve a question's tag and author references against lookup maps.
/// Tags that don't resolve are skipped; tag order is preserved.
fn populate<T: Clone, A: Clone>(
    question: Question,
    tags: &HashMap<Uuid, T>,
    authors: &HashMap<Uuid, A>,
) -> QuestionView<T, A> {
    QuestionView {
        id: question.id,
        title: question.title,
        content: question.content,
        tags: question
            .tags
            .iter()
            .filter_map(|id| tags.get(id).cloned())
            .collect(),
        author: authors.get(&question.author_id).cloned(),
        upvotes: question.upvotes,
        downvotes: question.downvotes,
        views: question.views,
        created_at: question.created_at,
    }
}

fn unique_ids(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

#[debug_handler]
async fn list_questions(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let questions = state.repos.questions.list().await?;

    // Look up tags and authors in bulk
    let tag_ids = unique_ids(questions.iter().flat_map(|q| q.tags.iter().copied()));
    let author_ids = unique_ids(questions.iter().map(|q| q.author_id));

    let tags: HashMap<Uuid, TagRecord> = state
        .repos
        .tags
        .find_by_ids(&tag_ids)
        .await?
        .into_iter()
        .map(|t| (t.id, t.into()))
        .collect();
    let authors: HashMap<Uuid, UserRecord> = state
        .repos
        .users
        .find_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u.into()))
        .collect();

    let questions = questions
        .into_iter()
        .map(|q| populate(q, &tags, &authors))
        .collect();

    Ok(Json(QuestionListResponse { questions }))
}

#[debug_handler]
async fn create_question(
    State(state): State<AppState>,
    Json(payload): Json<CreateQuestionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let tags = unique_tag_names(&payload.tags);
    if tags.is_empty() {
        return Err(AppError::Validation(
            "tags: at least one non-blank tag is required".to_string(),
        ));
    }

    let question = state
        .repos
        .questions
        .create(&NewQuestion {
            title: payload.title,
            content: payload.content,
            author_id: payload.author,
            tags,
        })
        .await?;

    tracing::info!(
        question_id = %question.id,
        author_id = %question.author_id,
        tag_count = question.tags.len(),
        "question created"
    );

    state.revalidator.revalidate(&payload.path).await;

    Ok((
        StatusCode::CREATED,
        Json(CreateQuestionResponse { id: question.id }),
    ))
}

/// Returns `null` rather than 404 when the question doesn't exist.
#[debug_handler]
async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<QuestionDetail>>, AppError> {
    let Some(question) = state.repos.questions.find_by_id(id).await? else {
        return Ok(Json(None));
    };

    let tags: HashMap<Uuid, TagInfo> = state
        .repos
        .tags
        .find_by_ids(&question.tags)
        .await?
        .into_iter()
        .map(|t| (t.id, t.into()))
        .collect();
    let authors: HashMap<Uuid, AuthorInfo> = state
        .repos
        .users
        .find_by_ids(&[question.author_id])
        .await?
        .into_iter()
        .map(|u| (u.id, u.into()))
        .collect();

    Ok(Json(Some(populate(question, &tags, &authors))))
}

#[debug_handler]
async fn upvote_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<QuestionVotePayload>,
) -> Result<Json<VoteResponse>, AppError> {
    cast_vote(&state, id, payload, VoteDirection::Up).await
}

#[debug_handler]
async fn downvote_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<QuestionVotePayload>,
) -> Result<Json<VoteResponse>, AppError> {
    cast_vote(&state, id, payload, VoteDirection::Down).await
}

/// Apply a vote, then revalidate. The vote and both reputation changes commit
/// together; a missing question fails before any of them.
async fn cast_vote(
    state: &AppState,
    question_id: Uuid,
    payload: QuestionVotePayload,
    direction: VoteDirection,
) -> Result<Json<VoteResponse>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let plan = VotePlan::new(direction, payload.has_upvoted, payload.has_downvoted);

    let question = state
        .repos
        .questions
        .apply_vote(question_id, payload.user_id, plan)
        .await?
        .ok_or(AppError::External(
            StatusCode::NOT_FOUND,
            "Question not found",
        ))?;

    tracing::info!(
        question_id = %question_id,
        user_id = %payload.user_id,
        author_id = %question.author_id,
        direction = ?plan.direction,
        transition = ?plan.transition,
        "vote applied"
    );

    state.revalidator.revalidate(&payload.path).await;

    Ok(Json(VoteResponse {
        upvotes: question.upvotes,
        downvotes: question.downvotes,
    }))
}
