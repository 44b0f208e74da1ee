mod config;
mod errors;
mod jobs;
mod models;
mod puzzle;
mod render;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::jobs::{InMemoryJobStore, JobOrchestrator, PuzzleGenerator, WorkerPool};
use crate::puzzle::RandomPlacementSolver;
use crate::render::RandomPalette;
use crate::routes::build_router;
use crate::state::AppState;

/// URL prefix the puzzles directory is served under.
const PUZZLES_URL_PREFIX: &str = "/output/puzzles";

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting wordsearch v{}", env!("CARGO_PKG_VERSION"));

    let puzzles_dir = config.puzzles_dir();
    tokio::fs::create_dir_all(&puzzles_dir)
        .await
        .with_context(|| format!("creating {}", puzzles_dir.display()))?;
    info!("Puzzle output directory: {}", puzzles_dir.display());

    let pool = WorkerPool::new(config.worker_pool_size);
    info!("Worker pool initialized ({} workers)", pool.size());

    let generator = PuzzleGenerator::new(
        Arc::new(RandomPlacementSolver::new(config.solver_max_attempts)),
        Arc::new(RandomPalette),
    );
    let orchestrator = JobOrchestrator::new(
        Arc::new(InMemoryJobStore::new()),
        pool,
        generator,
        puzzles_dir,
        PUZZLES_URL_PREFIX,
    );

    let state = AppState {
        config: config.clone(),
        orchestrator: orchestrator.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // In-flight generations finish before the process exits.
    orchestrator.pool().shutdown().await;
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!("Failed to listen for shutdown signal: {e}"),
    }
}
