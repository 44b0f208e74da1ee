use crate::config::Config;
use crate::jobs::JobOrchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub orchestrator: JobOrchestrator,
}
