//! Job Orchestrator — submission, background execution, status and cleanup.
//!
//! # Lifecycle
//! 1. `submit` validates the request, stores a `Queued` job and spawns its execution.
//! 2. The execution task marks the job `Processing`, creates the job directory, and
//!    hands the pipeline to the worker pool.
//! 3. The pool result becomes `Completed` (with artifact URLs) or `Failed` (with the
//!    error message). Nothing a job does can fail another job or the orchestrator.
//!
//! Deleting a job does not stop work already on the pool. When that work finishes,
//! the store refuses the update and any files it wrote are removed.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::errors::GenerationError;
use crate::jobs::pipeline::{PuzzleGenerator, PUZZLE_FILE, SOLUTION_FILE};
use crate::jobs::pool::WorkerPool;
use crate::jobs::store::JobStore;
use crate::models::job::{Job, JobResult, JobStatus};
use crate::models::puzzle::PuzzleRequest;

/// Response to a successful submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
}

#[derive(Debug, Clone)]
pub enum JobLookup {
    Found(Job),
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

#[derive(Clone)]
pub struct JobOrchestrator {
    store: Arc<dyn JobStore>,
    pool: WorkerPool,
    generator: PuzzleGenerator,
    puzzles_dir: PathBuf,
    /// URL prefix under which `puzzles_dir` is served.
    public_prefix: String,
}

impl JobOrchestrator {
    pub fn new(
        store: Arc<dyn JobStore>,
        pool: WorkerPool,
        generator: PuzzleGenerator,
        puzzles_dir: impl Into<PathBuf>,
        public_prefix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            pool,
            generator,
            puzzles_dir: puzzles_dir.into(),
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub fn job_dir(&self, id: Uuid) -> PathBuf {
        self.puzzles_dir.join(id.to_string())
    }

    /// Validates and queues a request. Returns immediately; generation happens in the
    /// background. Validation failures create no job.
    pub async fn submit(&self, request: PuzzleRequest) -> Result<SubmitResponse, GenerationError> {
        let request = request.normalize()?;
        let id = Uuid::new_v4();

        self.store.insert(Job::queued(id, request.clone())).await;
        info!(
            job_id = %id,
            size = request.size,
            words = request.wordlist.len(),
            mask = %request.mask(),
            "Puzzle job queued"
        );

        let this = self.clone();
        tokio::spawn(async move {
            this.execute(id, request).await;
        });

        Ok(SubmitResponse {
            job_id: id,
            status: JobStatus::Queued,
        })
    }

    pub async fn get_status(&self, id: Uuid) -> JobLookup {
        match self.store.get(id).await {
            Some(job) => JobLookup::Found(job),
            None => JobLookup::NotFound,
        }
    }

    /// Removes the record and its output directory. Repeated calls return `NotFound`.
    pub async fn delete(&self, id: Uuid) -> DeleteOutcome {
        if self.store.remove(id).await.is_none() {
            return DeleteOutcome::NotFound;
        }
        remove_dir_logged(&self.job_dir(id)).await;
        info!(job_id = %id, "Puzzle job deleted");
        DeleteOutcome::Deleted
    }

    /// Runs one job to a terminal status. Never panics or returns an error.
    async fn execute(&self, id: Uuid, request: PuzzleRequest) {
        let Some(mut job) = self.store.get(id).await else {
            debug!(job_id = %id, "Job deleted before execution started");
            return;
        };

        if let Err(e) = job.start() {
            error!(job_id = %id, "{e}");
            return;
        }
        if !self.store.update(job.clone()).await {
            debug!(job_id = %id, "Job deleted before processing");
            return;
        }

        let dir = self.job_dir(id);
        let outcome = match tokio::fs::create_dir_all(&dir).await {
            Ok(()) => self.run_pipeline(request, dir.clone()).await,
            Err(e) => Err(GenerationError::Io(e)),
        };

        let transition = match outcome {
            Ok(()) => {
                info!(job_id = %id, "Puzzle job completed");
                job.complete(self.result_for(id))
            }
            Err(e) => {
                warn!(job_id = %id, error = %e, "Puzzle job failed");
                job.fail(e.to_string())
            }
        };
        if let Err(e) = transition {
            error!(job_id = %id, "{e}");
            return;
        }

        if !self.store.update(job).await {
            debug!(job_id = %id, "Job deleted while in flight; removing its artifacts");
            remove_dir_logged(&dir).await;
        }
    }

    async fn run_pipeline(&self, request: PuzzleRequest, dir: PathBuf) -> Result<(), GenerationError> {
        let generator = self.generator.clone();
        self.pool
            .run(move || generator.generate_into(&request, &dir).map(|_| ()))
            .await
            .map_err(|e| GenerationError::Worker(e.to_string()))?
    }

    fn result_for(&self, id: Uuid) -> JobResult {
        JobResult {
            puzzle_url: format!("{}/{id}/{PUZZLE_FILE}", self.public_prefix),
            solution_url: format!("{}/{id}/{SOLUTION_FILE}", self.public_prefix),
        }
    }
}

async fn remove_dir_logged(dir: &Path) {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(dir = %dir.display(), error = %e, "Failed to remove job directory"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{mpsc, Mutex};
    use std::time::Duration;

    use crate::jobs::store::InMemoryJobStore;
    use crate::models::puzzle::NMAX;
    use crate::puzzle::solver::SolverError;
    use crate::puzzle::{RandomPlacementSolver, SolveInput, SolvedGrid, Solver};
    use crate::render::palette::FixedPalette;
    use crate::render::svg::Rgb;

    struct FailingSolver;

    impl Solver for FailingSolver {
        fn solve(&self, input: &SolveInput<'_>) -> Result<SolvedGrid, SolverError> {
            Err(SolverError::NoPlacement {
                attempts: 1,
                word: input.words[0].clone(),
            })
        }
    }

    struct PanickingSolver;

    impl Solver for PanickingSolver {
        fn solve(&self, _input: &SolveInput<'_>) -> Result<SolvedGrid, SolverError> {
            panic!("search exploded")
        }
    }

    /// Holds each solve until the test releases it, then defers to the real solver.
    struct GatedSolver {
        calls: AtomicUsize,
        release: Mutex<mpsc::Receiver<()>>,
        inner: RandomPlacementSolver,
    }

    impl Solver for GatedSolver {
        fn solve(&self, input: &SolveInput<'_>) -> Result<SolvedGrid, SolverError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let _ = self.release.lock().unwrap().recv();
            self.inner.solve(input)
        }
    }

    fn orchestrator_with(solver: Arc<dyn Solver>, root: &Path) -> JobOrchestrator {
        JobOrchestrator::new(
            Arc::new(InMemoryJobStore::new()),
            WorkerPool::new(2),
            PuzzleGenerator::new(solver, Arc::new(FixedPalette(Rgb(200, 0, 0)))),
            root.join("puzzles"),
            "/output/puzzles/",
        )
    }

    fn orchestrator(root: &Path) -> JobOrchestrator {
        orchestrator_with(Arc::new(RandomPlacementSolver::default().with_seed(3)), root)
    }

    fn request(list: &[&str], size: usize) -> PuzzleRequest {
        PuzzleRequest::new(list.iter().map(|s| s.to_string()).collect(), size)
    }

    /// Polls until the job reaches a terminal status, asserting statuses never regress.
    async fn wait_terminal(orch: &JobOrchestrator, id: Uuid) -> Job {
        let rank = |s: JobStatus| match s {
            JobStatus::Queued => 0,
            JobStatus::Processing => 1,
            JobStatus::Completed | JobStatus::Failed => 2,
        };
        let mut seen = 0;
        for _ in 0..500 {
            match orch.get_status(id).await {
                JobLookup::Found(job) => {
                    let r = rank(job.status);
                    assert!(r >= seen, "status regressed to {}", job.status);
                    seen = r;
                    if job.status.is_terminal() {
                        return job;
                    }
                }
                JobLookup::NotFound => panic!("job {id} disappeared"),
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("job {id} did not finish");
    }

    #[tokio::test]
    async fn test_submit_returns_queued_immediately() {
        let root = tempfile::tempdir().unwrap();
        let orch = orchestrator(root.path());
        let resp = orch.submit(request(&["CAT", "DOG"], 5)).await.unwrap();
        assert_eq!(resp.status, JobStatus::Queued);
        assert!(matches!(
            orch.get_status(resp.job_id).await,
            JobLookup::Found(_)
        ));
    }

    #[tokio::test]
    async fn test_cat_dog_job_completes_with_artifacts() {
        let root = tempfile::tempdir().unwrap();
        let orch = orchestrator(root.path());
        let resp = orch.submit(request(&["cat", "dog"], 5)).await.unwrap();

        let job = wait_terminal(&orch, resp.job_id).await;
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.error.is_none());
        assert_eq!(job.params.wordlist, vec!["CAT".to_string(), "DOG".to_string()]);

        let id = resp.job_id;
        let result = job.result.unwrap();
        assert_eq!(result.puzzle_url, format!("/output/puzzles/{id}/puzzle.svg"));
        assert_eq!(result.solution_url, format!("/output/puzzles/{id}/puzzleS.svg"));

        let dir = orch.job_dir(id);
        let puzzle = std::fs::read_to_string(dir.join(PUZZLE_FILE)).unwrap();
        let solution = std::fs::read_to_string(dir.join(SOLUTION_FILE)).unwrap();
        assert!(puzzle.contains(">CAT</text>") && puzzle.contains(">DOG</text>"));
        assert!(solution.contains(r#"width="240""#));
    }

    #[tokio::test]
    async fn test_oversized_grid_rejected_before_job_creation() {
        let root = tempfile::tempdir().unwrap();
        let orch = orchestrator(root.path());
        let err = orch.submit(request(&["CAT"], NMAX + 1)).await.unwrap_err();
        assert!(matches!(err, GenerationError::Validation(_)));
        assert!(!orch.puzzles_dir.exists(), "no job directory created");
    }

    #[tokio::test]
    async fn test_solver_failure_marks_job_failed() {
        let root = tempfile::tempdir().unwrap();
        let orch = orchestrator_with(Arc::new(FailingSolver), root.path());
        let resp = orch.submit(request(&["CAT"], 5)).await.unwrap();

        let job = wait_terminal(&orch, resp.job_id).await;
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.result.is_none());
        let error = job.error.unwrap();
        assert!(error.contains("Solver failure"), "{error}");
        assert!(error.contains("CAT"), "{error}");
    }

    #[tokio::test]
    async fn test_worker_panic_marks_only_that_job_failed() {
        let root = tempfile::tempdir().unwrap();
        let broken = orchestrator_with(Arc::new(PanickingSolver), root.path());
        let resp = broken.submit(request(&["CAT"], 5)).await.unwrap();
        let job = wait_terminal(&broken, resp.job_id).await;
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.error.unwrap().contains("search exploded"));

        // The orchestrator keeps serving after the panic.
        let healthy = orchestrator(root.path());
        let resp = healthy.submit(request(&["CAT"], 5)).await.unwrap();
        assert_eq!(
            wait_terminal(&healthy, resp.job_id).await.status,
            JobStatus::Completed
        );
    }

    #[tokio::test]
    async fn test_delete_is_idempotent_and_removes_files() {
        let root = tempfile::tempdir().unwrap();
        let orch = orchestrator(root.path());
        let resp = orch.submit(request(&["CAT", "DOG"], 5)).await.unwrap();
        wait_terminal(&orch, resp.job_id).await;

        let dir = orch.job_dir(resp.job_id);
        assert!(dir.exists());

        assert_eq!(orch.delete(resp.job_id).await, DeleteOutcome::Deleted);
        assert!(!dir.exists());
        assert!(matches!(
            orch.get_status(resp.job_id).await,
            JobLookup::NotFound
        ));
        assert_eq!(orch.delete(resp.job_id).await, DeleteOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_not_found() {
        let root = tempfile::tempdir().unwrap();
        let orch = orchestrator(root.path());
        assert_eq!(orch.delete(Uuid::new_v4()).await, DeleteOutcome::NotFound);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_delete_in_flight_job_is_not_resurrected() {
        let root = tempfile::tempdir().unwrap();
        let (release_tx, release_rx) = mpsc::channel();
        let solver = Arc::new(GatedSolver {
            calls: AtomicUsize::new(0),
            release: Mutex::new(release_rx),
            inner: RandomPlacementSolver::default().with_seed(9),
        });
        let orch = orchestrator_with(solver.clone(), root.path());

        let resp = orch.submit(request(&["CAT", "DOG"], 5)).await.unwrap();
        let id = resp.job_id;
        let dir = orch.job_dir(id);

        // Wait until the job is on the pool, inside the solver.
        for _ in 0..500 {
            if solver.calls.load(Ordering::SeqCst) == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(solver.calls.load(Ordering::SeqCst), 1, "solver never started");
        match orch.get_status(id).await {
            JobLookup::Found(job) => assert_eq!(job.status, JobStatus::Processing),
            JobLookup::NotFound => panic!("job {id} missing while processing"),
        }
        assert!(dir.exists());

        assert_eq!(orch.delete(id).await, DeleteOutcome::Deleted);
        assert!(!dir.exists());
        release_tx.send(()).unwrap();

        // Running work drains; the execution task then records its outcome, which the
        // store must refuse.
        orch.pool().shutdown().await;
        for _ in 0..20 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            assert!(matches!(orch.get_status(id).await, JobLookup::NotFound));
        }
        assert!(!dir.exists());
        assert_eq!(solver.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_queued_job_fails_when_pool_shuts_down() {
        let root = tempfile::tempdir().unwrap();
        let orch = orchestrator(root.path());
        orch.pool().shutdown().await;

        let resp = orch.submit(request(&["CAT"], 5)).await.unwrap();
        let job = wait_terminal(&orch, resp.job_id).await;
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.error.unwrap().contains("shut down"));
    }

    #[test]
    fn test_delete_outcome_serializes_as_status() {
        assert_eq!(
            serde_json::to_value(DeleteOutcome::Deleted).unwrap(),
            serde_json::json!({"status": "deleted"})
        );
        assert_eq!(
            serde_json::to_value(DeleteOutcome::NotFound).unwrap(),
            serde_json::json!({"status": "not_found"})
        );
    }
}
