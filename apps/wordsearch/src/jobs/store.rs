//! Job store — the keyed record of every known job.
//!
//! `JobOrchestrator` holds an `Arc<dyn JobStore>`; the default backend is process-local
//! and lost on restart. Each key is written only by the task that owns the job, so
//! the store needs per-key atomicity only.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::job::Job;

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert(&self, job: Job);

    async fn get(&self, id: Uuid) -> Option<Job>;

    /// Replaces an existing record. Returns false, storing nothing, if the job is gone.
    async fn update(&self, job: Job) -> bool;

    async fn remove(&self, id: Uuid) -> Option<Job>;
}

/// In-memory store backed by a sharded concurrent map.
#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    jobs: DashMap<Uuid, Job>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn insert(&self, job: Job) {
        self.jobs.insert(job.id, job);
    }

    async fn get(&self, id: Uuid) -> Option<Job> {
        self.jobs.get(&id).map(|entry| entry.value().clone())
    }

    async fn update(&self, job: Job) -> bool {
        match self.jobs.get_mut(&job.id) {
            Some(mut entry) => {
                *entry = job;
                true
            }
            None => false,
        }
    }

    async fn remove(&self, id: Uuid) -> Option<Job> {
        self.jobs.remove(&id).map(|(_, job)| job)
    }
}
