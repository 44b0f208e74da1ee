//! Generation pipeline — mask → solve → render → write, for one request.
//!
//! Runs synchronously inside the worker pool and takes only the request's own fields,
//! so nothing here touches the job store. Every failure comes back as a
//! `GenerationError`; the orchestrator records it on the job.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::GenerationError;
use crate::models::puzzle::PuzzleRequest;
use crate::puzzle::solver::SolverError;
use crate::puzzle::{Mask, SolveInput, SolvedGrid, Solver};
use crate::render::{render_puzzle_page, render_solution_page, HighlightPalette, SvgDocument};

pub const PUZZLE_FILE: &str = "puzzle.svg";
pub const SOLUTION_FILE: &str = "puzzleS.svg";

/// Both pages for one solved puzzle.
#[derive(Debug, Clone)]
pub struct RenderedPuzzle {
    pub solved: SolvedGrid,
    pub puzzle: SvgDocument,
    pub solution: SvgDocument,
}

/// Solver plus highlight palette, shared by every job.
#[derive(Clone)]
pub struct PuzzleGenerator {
    solver: Arc<dyn Solver>,
    palette: Arc<dyn HighlightPalette>,
}

impl PuzzleGenerator {
    pub fn new(solver: Arc<dyn Solver>, palette: Arc<dyn HighlightPalette>) -> Self {
        Self { solver, palette }
    }

    /// Builds the mask, solves, and renders both pages. `request` must be normalized.
    pub fn generate(&self, request: &PuzzleRequest) -> Result<RenderedPuzzle, GenerationError> {
        let n = request.size;
        let mask_type = request.mask();
        let mask = Mask::new(n, n, mask_type);
        debug!(size = n, mask = %mask_type, blocked = mask.blocked_count(), "Mask built");

        let solved = self.solver.solve(&SolveInput {
            nrows: n,
            ncols: n,
            words: &request.wordlist,
            allow_backwards: request.allow_backwards,
            mask: &mask,
        })?;

        if let Some(missing) = request
            .wordlist
            .iter()
            .find(|w| !solved.placements.contains_key(w.as_str()))
        {
            return Err(SolverError::MissingPlacement {
                word: missing.clone(),
            }
            .into());
        }

        let puzzle = render_puzzle_page(
            &solved.grid,
            &request.wordlist,
            mask_type,
            request.page_number.as_deref(),
        );
        let solution = render_solution_page(
            &solved.grid,
            &solved.placements,
            mask_type,
            self.palette.as_ref(),
        );

        Ok(RenderedPuzzle {
            solved,
            puzzle,
            solution,
        })
    }

    /// Generates and writes `puzzle.svg` and `puzzleS.svg` into `dir`, which must exist.
    pub fn generate_into(
        &self,
        request: &PuzzleRequest,
        dir: &Path,
    ) -> Result<RenderedPuzzle, GenerationError> {
        let rendered = self.generate(request)?;
        write_artifacts(dir, &rendered)?;
        info!(
            dir = %dir.display(),
            size = request.size,
            words = rendered.solved.placements.len(),
            mask = %request.mask(),
            "Puzzle documents written"
        );
        debug!("Solved grid:\n{}", rendered.solved.grid.to_text());
        Ok(rendered)
    }
}

pub fn write_artifacts(dir: &Path, rendered: &RenderedPuzzle) -> Result<(), GenerationError> {
    std::fs::write(dir.join(PUZZLE_FILE), rendered.puzzle.to_string())?;
    std::fs::write(dir.join(SOLUTION_FILE), rendered.solution.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::puzzle::MaskType;
    use crate::puzzle::grid::{Cell, Grid};
    use crate::puzzle::RandomPlacementSolver;
    use crate::render::palette::FixedPalette;
    use crate::render::svg::Rgb;

    struct NoWordsSolver;

    impl Solver for NoWordsSolver {
        fn solve(&self, input: &SolveInput<'_>) -> Result<SolvedGrid, SolverError> {
            Ok(SolvedGrid {
                grid: Grid::from_rows(vec![
                    vec![Cell::Letter('Z'); input.ncols];
                    input.nrows
                ]),
                placements: Default::default(),
            })
        }
    }

    fn generator() -> PuzzleGenerator {
        PuzzleGenerator::new(
            Arc::new(RandomPlacementSolver::default().with_seed(11)),
            Arc::new(FixedPalette(Rgb(255, 255, 0))),
        )
    }

    fn request(list: &[&str], size: usize) -> PuzzleRequest {
        PuzzleRequest::new(list.iter().map(|s| s.to_string()).collect(), size)
            .normalize()
            .unwrap()
    }

    #[test]
    fn test_cat_dog_on_5x5() {
        let rendered = generator().generate(&request(&["cat", "dog"], 5)).unwrap();
        assert_eq!(rendered.solved.grid.nrows(), 5);
        assert_eq!(rendered.solved.placements.len(), 2);
        assert!(rendered.solved.placements.contains_key("CAT"));
        assert!(rendered.solved.placements.contains_key("DOG"));
        assert_eq!(rendered.solution.width, 5 * 40 + 40);

        let puzzle_svg = rendered.puzzle.to_string();
        assert!(puzzle_svg.contains(">CAT</text>"));
        assert!(puzzle_svg.contains(">DOG</text>"));
        assert!(puzzle_svg.contains(">HIDDEN WORDS</text>"));
    }

    #[test]
    fn test_circle_mask_flows_to_both_pages() {
        let mut req = request(&["SUN", "SKY"], 9);
        req.mask_type = Some(MaskType::Circle);
        let rendered = generator().generate(&req).unwrap();
        assert!(rendered.puzzle.to_string().contains("<circle"));
        assert!(rendered.solution.to_string().contains("<circle"));
    }

    #[test]
    fn test_unplaceable_word_is_solver_failure() {
        let err = generator()
            .generate(&request(&["ABCDEFGHIJ"], 4))
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::SolverFailure(SolverError::NoPlacement { .. })
        ));
    }

    #[test]
    fn test_incomplete_solver_output_rejected() {
        let generator = PuzzleGenerator::new(
            Arc::new(NoWordsSolver),
            Arc::new(FixedPalette(Rgb(0, 0, 0))),
        );
        let err = generator.generate(&request(&["CAT"], 5)).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::SolverFailure(SolverError::MissingPlacement { .. })
        ));
    }

    #[test]
    fn test_generate_into_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        generator()
            .generate_into(&request(&["CAT", "DOG"], 5), dir.path())
            .unwrap();
        let puzzle = std::fs::read_to_string(dir.path().join(PUZZLE_FILE)).unwrap();
        let solution = std::fs::read_to_string(dir.path().join(SOLUTION_FILE)).unwrap();
        assert!(puzzle.starts_with("<?xml"));
        assert!(solution.contains("rgb(255,255,0)"));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("deleted");
        let err = generator()
            .generate_into(&request(&["CAT"], 5), &gone)
            .unwrap_err();
        assert!(matches!(err, GenerationError::Io(_)));
    }
}
