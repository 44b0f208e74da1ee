// Puzzle domain: shape masks, the solved grid model, and word placement.
// Everything here is synchronous and CPU-bound; callers run it on the worker pool.

pub mod grid;
pub mod mask;
pub mod solver;

pub use grid::SolvedGrid;
pub use mask::Mask;
pub use solver::{RandomPlacementSolver, SolveInput, Solver};
