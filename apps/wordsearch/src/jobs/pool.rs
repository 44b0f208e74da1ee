//! Worker pool — bounded execution of CPU-bound generation off the async executor.
//!
//! Each task runs on tokio's blocking thread pool behind a semaphore, so at most
//! `size` generations run at once no matter how many jobs are queued. A panic inside a
//! task is caught at this boundary and returned as `PoolError::Panicked`; it never
//! reaches the caller's task or the runtime.
//!
//! Lifecycle: created once at startup, handed to the orchestrator, and shut down after
//! the HTTP server stops. `shutdown` closes the pool first, so tasks still waiting for
//! a slot fail with `PoolError::ShutDown`, then waits for the tasks already running.

use std::sync::Arc;
use std::thread::available_parallelism;

use thiserror::Error;
use tokio::sync::{RwLock, Semaphore};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("worker pool is shut down")]
    ShutDown,

    #[error("worker panicked: {0}")]
    Panicked(String),

    #[error("worker task was cancelled")]
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    /// Every running task holds a read guard; `shutdown` takes the write side to drain.
    running: Arc<RwLock<()>>,
    size: usize,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            running: Arc::new(RwLock::new(())),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Runs `task` once a worker slot is free.
    pub async fn run<F, T>(&self, task: F) -> Result<T, PoolError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let _permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| PoolError::ShutDown)?;
        let _running = self.running.clone().read_owned().await;
        // A slot granted just before `shutdown` closed the pool must not start.
        if self.permits.is_closed() {
            return Err(PoolError::ShutDown);
        }

        tokio::task::spawn_blocking(task).await.map_err(|e| {
            if e.is_panic() {
                PoolError::Panicked(panic_message(e.into_panic()))
            } else {
                PoolError::Cancelled
            }
        })
    }

    /// Rejects queued and future work, then waits for running tasks to finish.
    pub async fn shutdown(&self) {
        self.permits.close();
        let _drained = self.running.write().await;
        info!(workers = self.size, "Worker pool shut down");
    }
}

pub fn host_parallelism() -> usize {
    available_parallelism().map(|n| n.get()).unwrap_or(1)
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
