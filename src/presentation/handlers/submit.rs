use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::application::services::SubmitError;
use crate::domain::ResearchRequest;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct SubmitResponse {
    pub job_id: String,
    pub status: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state, request), fields(query = %request.query))]
pub async fn submit_handler(
    State(state): State<AppState>,
    Json(request): Json<ResearchRequest>,
) -> impl IntoResponse {
    match state.submission.submit(request).await {
        Ok(job_id) => (
            StatusCode::ACCEPTED,
            Json(SubmitResponse {
                job_id: job_id.to_string(),
                status: "pending".to_string(),
                message: "Research job submitted".to_string(),
            }),
        )
            .into_response(),
        Err(SubmitError::EmptyQuery) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Query must not be empty".to_string(),
            }),
        )
            .into_response(),
        Err(SubmitError::WorkerUnavailable) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "Pipeline worker unavailable".to_string(),
            }),
        )
            .into_response(),
        Err(e @ SubmitError::Storage(_)) => {
            tracing::error!(error = %e, "Failed to submit research job");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to submit job: {}", e),
                }),
            )
                .into_response()
        }
    }
}
