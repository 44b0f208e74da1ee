pub mod handlers;
pub mod orchestrator;
pub mod pipeline;
pub mod pool;
pub mod store;

pub use orchestrator::JobOrchestrator;
pub use pipeline::PuzzleGenerator;
pub use pool::WorkerPool;
pub use store::InMemoryJobStore;
