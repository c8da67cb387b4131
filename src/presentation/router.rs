use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::presentation::handlers::{
    delete_handler, export_handler, health_handler, list_handler, result_handler, status_handler,
    submit_handler,
};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/research", post(submit_handler))
        .route("/api/v1/research", get(list_handler))
        .route("/api/v1/research/{job_id}", get(result_handler))
        .route("/api/v1/research/{job_id}", delete(delete_handler))
        .route("/api/v1/research/{job_id}/status", get(status_handler))
        .route("/api/v1/research/{job_id}/export", get(export_handler))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
