use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::services::{ExportError, ExportFormat, ReadError};
use crate::domain::JobId;
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct ExportParams {
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "structured".to_string()
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[tracing::instrument(skip(state, params))]
pub async fn export_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Query(params): Query<ExportParams>,
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

    let format = match params.format.parse::<ExportFormat>() {
        Ok(f) => f,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: e })).into_response();
        }
    };

    match state.reader.export(JobId::from_uuid(uuid), format).await {
        Ok(payload) => {
            let content_type = match format {
                ExportFormat::Structured => "application/json",
                ExportFormat::Text => "text/markdown; charset=utf-8",
            };
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, content_type)],
                payload,
            )
                .into_response()
        }
        Err(ExportError::Read(ReadError::NotFound(id))) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Job not found: {}", id),
            }),
        )
            .into_response(),
        Err(ExportError::NotCompleted(id)) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: format!("Job {} is not completed yet", id),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to export job result");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to export result: {}", e),
                }),
            )
                .into_response()
        }
    }
}
