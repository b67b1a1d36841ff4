//! View tracking.
//!
//! Every view increments the question's counter, including repeat views by the
//! same user: the counter measures traffic, not unique viewers. Signed-in
//! viewers additionally get one `view` interaction per question. An unknown
//! viewer is rejected before anything is counted.
//!
//! Endpoints:
//! - POST /questions/{id}/view - Record a view (body: `{"user_id": ...}` or `{}`)

use axum::{
    Json, Router, debug_handler,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};
use shared::api::{ViewQuestionPayload, ViewQuestionResponse};
use uuid::Uuid;

use crate::{error::AppError, repos::actions, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/view", post(view_question))
}

#[debug_handler]
async fn view_question(
    State(state): State<AppState>,
    Path(question_id): Path<Uuid>,
    Json(payload): Json<ViewQuestionPayload>,
) -> Result<Json<ViewQuestionResponse>, AppError> {
    // Check the viewer before counting, so a rejected view leaves no trace.
    if let Some(user_id) = payload.user_id {
        let users = state.repos.users.find_by_ids(&[user_id]).await?;
        if users.is_empty() {
            return Err(AppError::External(StatusCode::NOT_FOUND, "User not found"));
        }
    }

    let found = state.repos.questions.increment_views(question_id).await?;
    if !found {
        return Err(AppError::External(
            StatusCode::NOT_FOUND,
            "Question not found",
        ));
    }

    let Some(user_id) = payload.user_id else {
        return Ok(Json(ViewQuestionResponse {
            interaction_recorded: false,
        }));
    };

    let interaction = state
        .repos
        .interactions
        .record(user_id, actions::VIEW, question_id)
        .await?;

    match &interaction {
        Some(i) => {
            tracing::info!(
                question_id = %question_id,
                user_id = %user_id,
                interaction_id = %i.id,
                "view recorded"
            );
        }
        None => {
            tracing::info!(question_id = %question_id, user_id = %user_id, "already viewed");
        }
    }

    Ok(Json(ViewQuestionResponse {
        interaction_recorded: interaction.is_some(),
    }))
}
