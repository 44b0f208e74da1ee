use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::jobs::pool::host_parallelism;
use crate::puzzle::solver::DEFAULT_MAX_ATTEMPTS;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Root of the statically served tree. Puzzles live under `{output_dir}/puzzles`.
    pub output_dir: PathBuf,
    pub worker_pool_size: usize,
    pub solver_max_attempts: u32,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8000)?,
            output_dir: std::env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("output")),
            worker_pool_size: parse_env("WORKER_POOL_SIZE", host_parallelism())?,
            solver_max_attempts: parse_env("SOLVER_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn puzzles_dir(&self) -> PathBuf {
        self.output_dir.join("puzzles")
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
