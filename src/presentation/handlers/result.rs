use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::application::services::{ReadError, ResultOutcome};
use crate::domain::{JobId, JobStatus, StageProgress};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct NotReadyResponse {
    pub status: JobStatus,
    pub progress: StageProgress,
}

#[derive(Serialize)]
pub struct FailedResponse {
    pub status: JobStatus,
    pub error_message: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state))]
pub async fn result_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&job_id) {
        Ok(u) => u,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid job ID: {}", job_id),
                }),
            )
                .into_response();
        }
    };

    match state.reader.result(JobId::from_uuid(uuid)).await {
        Ok(ResultOutcome::Ready(job)) => (StatusCode::OK, Json(job)).into_response(),
        Ok(ResultOutcome::NotReady { status, progress }) => (
            StatusCode::ACCEPTED,
            Json(NotReadyResponse { status, progress }),
        )
            .into_response(),
        Ok(ResultOutcome::Failed { error_message }) => (
            StatusCode::OK,
            Json(FailedResponse {
                status: JobStatus::Failed,
                error_message,
            }),
        )
            .into_response(),
        Err(ReadError::NotFound(id)) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Job not found: {}", id),
            }),
        )
            .into_response(),
        Err(e @ ReadError::Storage(_)) => {
            tracing::error!(error = %e, "Failed to fetch job result");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch result: {}", e),
                }),
            )
                .into_response()
        }
    }
}
