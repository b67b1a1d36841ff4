//! Health check endpoint for load balancers and monitoring.
//!
//! Returns 200 OK if the database is reachable and migrated, 503 Service
//! Unavailable otherwise.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: bool,
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = match state.repos.status.health_check().await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!(error = %e, "database health check failed");
            false
        }
    };

    let response = HealthResponse {
        status: if db_ok { "ok" } else { "unhealthy" },
        database: db_ok,
    };

    let status = if db_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
