use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::orchestrator::{DeleteOutcome, JobLookup, SubmitResponse};
use crate::models::puzzle::PuzzleRequest;
use crate::state::AppState;

/// POST /generate
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(req): Json<PuzzleRequest>,
) -> Result<Json<SubmitResponse>, AppError> {
    let response = state.orchestrator.submit(req).await?;
    Ok(Json(response))
}

/// GET /status/:job_id
///
/// Unknown ids, including ones that are not UUIDs, answer `{"status": "not_found"}`.
pub async fn handle_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let Ok(id) = Uuid::parse_str(&job_id) else {
        return Ok(Json(not_found()));
    };
    match state.orchestrator.get_status(id).await {
        JobLookup::Found(job) => Ok(Json(
            serde_json::to_value(job).map_err(anyhow::Error::from)?,
        )),
        JobLookup::NotFound => Ok(Json(not_found())),
    }
}

/// DELETE /jobs/:job_id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Json<DeleteOutcome> {
    let outcome = match Uuid::parse_str(&job_id) {
        Ok(id) => state.orchestrator.delete(id).await,
        Err(_) => DeleteOutcome::NotFound,
    };
    Json(outcome)
}

fn not_found() -> Value {
    json!({ "status": "not_found" })
}
