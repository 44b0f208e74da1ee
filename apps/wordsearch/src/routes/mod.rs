pub mod health;

use axum::{
    http::Uri,
    routing::{delete, get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::errors::AppError;
use crate::jobs::handlers;
use crate::state::AppState;

async fn route_not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

pub fn build_router(state: AppState) -> Router {
    let artifacts = ServeDir::new(&state.config.output_dir);

    Router::new()
        .route("/health", get(health::health_handler))
        // Puzzle jobs
        .route("/generate", post(handlers::handle_generate))
        .route("/status/:job_id", get(handlers::handle_status))
        .route("/jobs/:job_id", delete(handlers::handle_delete))
        // Rendered documents: /output/puzzles/{job_id}/puzzle.svg and puzzleS.svg
        .nest_service("/output", artifacts)
        .fallback(route_not_found)
        .with_state(state)
}
