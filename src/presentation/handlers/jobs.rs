use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::ports::JobFilter;
use crate::application::services::ReadError;
use crate::domain::{JobId, JobStatus};
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct ListParams {
    pub status: Option<JobStatus>,
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: usize,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state, params))]
pub async fn list_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    let filter = JobFilter {
        status: params.status,
        limit: Some(params.limit.unwrap_or(10).min(100)),
        offset: params.offset,
    };

    match state.reader.list(filter).await {
        Ok(summaries) => (StatusCode::OK, Json(summaries)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list jobs");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to list jobs: {}", e),
                }),
            )
                .into_response()
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn delete_handler(
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

    match state.reader.delete(JobId::from_uuid(uuid)).await {
        Ok(()) => (
            StatusCode::OK,
            Json(DeleteResponse {
                message: "Research job deleted".to_string(),
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
            tracing::error!(error = %e, "Failed to delete job");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to delete job: {}", e),
                }),
            )
                .into_response()
        }
    }
}
