//! Handler error type.
//!
//! Store and other internal failures are logged, reported to Sentry and
//! returned as a generic 500. Not-found and validation failures carry a
//! message that is safe to show. A write naming a user that doesn't exist is
//! a not-found, not a store failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug)]
pub enum AppError {
    /// Internal errors (store failures) - logged but return generic 500 to user
    Internal(anyhow::Error),
    /// User-facing errors - message is safe to show
    External(StatusCode, &'static str),
    /// Validation errors - safe to show
    Validation(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Internal(err) => {
                tracing::error!("internal error: {:?}", err);
                sentry::capture_error(
                    err.as_ref() as &(dyn std::error::Error + Send + Sync + 'static)
                );

                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
            AppError::External(status, msg) => (status, msg).into_response(),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
        }
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        if references_unknown_user(&err) {
            return Self::External(StatusCode::NOT_FOUND, "User not found");
        }
        Self::Internal(err)
    }
}

/// Foreign keys from stored rows to `users`.
const USER_FOREIGN_KEYS: &[&str] = &["questions_author_id_fkey", "interactions_user_id_fkey"];

/// True when a write was rejected because the user it names doesn't exist.
fn references_unknown_user(err: &anyhow::Error) -> bool {
    match err.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db)) => {
            db.is_foreign_key_violation()
                && db
                    .constraint()
                    .is_some_and(|name| USER_FOREIGN_KEYS.contains(&name))
        }
        _ => false,
    }
}
