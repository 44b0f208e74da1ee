//! Word placement — the `Solver` seam and the default randomized search.
//!
//! The orchestrator only depends on the `Solver` trait: given dimensions, a word list,
//! the backwards flag and the job's mask, it returns a filled grid with every word's
//! placement, or an explicit `SolverError`. Solving is CPU-bound and synchronous; it is
//! always invoked from the worker pool.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::debug;

use crate::models::puzzle::NMAX;
use crate::puzzle::grid::{Cell, Grid, Placement, Placements, Position, SolvedGrid};
use crate::puzzle::mask::Mask;

const ALPHABET: &[char] = &[
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Right, down, down-right first: the only directions kept when backwards is disallowed.
const DIRECTIONS: [(isize, isize); 8] = [
    (0, 1),
    (1, 0),
    (1, 1),
    (0, -1),
    (-1, 0),
    (-1, -1),
    (1, -1),
    (-1, 1),
];
const FORWARD_DIRECTIONS: usize = 3;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    #[error("grid {nrows}x{ncols} exceeds the maximum of {NMAX}x{NMAX}")]
    GridTooLarge { nrows: usize, ncols: usize },

    #[error("could not place '{word}' after {attempts} attempts")]
    NoPlacement { attempts: u32, word: String },

    #[error("solver returned no placement for '{word}'")]
    MissingPlacement { word: String },
}

/// Everything a solver is given for one job.
#[derive(Debug, Clone, Copy)]
pub struct SolveInput<'a> {
    pub nrows: usize,
    pub ncols: usize,
    pub words: &'a [String],
    pub allow_backwards: bool,
    pub mask: &'a Mask,
}

/// The word-placement search. Implement this to swap search strategies without
/// touching the pipeline or orchestrator.
pub trait Solver: Send + Sync {
    fn solve(&self, input: &SolveInput<'_>) -> Result<SolvedGrid, SolverError>;
}

/// Randomized greedy placement with whole-grid restarts.
///
/// Each attempt shuffles the words, then for each word tries every open start cell
/// in random order and the allowed directions in random order, keeping the first
/// fit. A word that fits nowhere fails the attempt. Duplicate words are placed once.
#[derive(Debug, Clone)]
pub struct RandomPlacementSolver {
    max_attempts: u32,
    seed: Option<u64>,
}

impl Default for RandomPlacementSolver {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl RandomPlacementSolver {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            seed: None,
        }
    }

    /// Makes every solve reproducible.
    #[cfg(test)]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Solver for RandomPlacementSolver {
    fn solve(&self, input: &SolveInput<'_>) -> Result<SolvedGrid, SolverError> {
        if input.nrows > NMAX || input.ncols > NMAX {
            return Err(SolverError::GridTooLarge {
                nrows: input.nrows,
                ncols: input.ncols,
            });
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        // Dedup keeps one placement per distinct word; BTreeSet gives a stable base order.
        let distinct: Vec<&str> = input
            .words
            .iter()
            .map(String::as_str)
            .filter(|w| !w.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut last_failed = String::new();
        for attempt in 1..=self.max_attempts {
            match attempt_fill(input, &distinct, &mut rng) {
                Ok(solved) => {
                    debug!(attempt, words = distinct.len(), "Solver placed all words");
                    return Ok(solved);
                }
                Err(word) => {
                    debug!(attempt, word = %word, "Solver attempt failed");
                    last_failed = word;
                }
            }
        }

        Err(SolverError::NoPlacement {
            attempts: self.max_attempts,
            word: last_failed,
        })
    }
}

/// One full placement attempt. Returns the word that could not be placed on failure.
fn attempt_fill<R: Rng>(
    input: &SolveInput<'_>,
    words: &[&str],
    rng: &mut R,
) -> Result<SolvedGrid, String> {
    let mut board: Vec<Vec<Option<char>>> = vec![vec![None; input.ncols]; input.nrows];
    let mut placements = Placements::new();

    let mut order = words.to_vec();
    order.shuffle(rng);

    let mut directions: Vec<(isize, isize)> = if input.allow_backwards {
        DIRECTIONS.to_vec()
    } else {
        DIRECTIONS[..FORWARD_DIRECTIONS].to_vec()
    };

    for word in order {
        let letters: Vec<char> = word.chars().collect();
        let mut starts = input.mask.open_cells();
        starts.shuffle(rng);

        let mut placed = None;
        'starts: for start in starts {
            directions.shuffle(rng);
            for &(dr, dc) in &directions {
                if fits(&board, input.mask, &letters, start, dr, dc) {
                    placed = Some(write_word(&mut board, &letters, start, dr, dc));
                    break 'starts;
                }
            }
        }

        match placed {
            Some(placement) => {
                placements.insert(word.to_string(), placement);
            }
            None => return Err(word.to_string()),
        }
    }

    let mut rows = Vec::with_capacity(input.nrows);
    for (row, cells) in board.into_iter().enumerate() {
        let mut filled = Vec::with_capacity(cells.len());
        for (col, cell) in cells.into_iter().enumerate() {
            filled.push(if input.mask.is_blocked(row, col) {
                Cell::Blocked
            } else {
                Cell::Letter(cell.unwrap_or_else(|| random_letter(rng)))
            });
        }
        rows.push(filled);
    }

    Ok(SolvedGrid {
        grid: Grid::from_rows(rows),
        placements,
    })
}

fn step(start: Position, dr: isize, dc: isize, i: usize) -> (isize, isize) {
    (
        start.row as isize + dr * i as isize,
        start.col as isize + dc * i as isize,
    )
}

fn fits(
    board: &[Vec<Option<char>>],
    mask: &Mask,
    letters: &[char],
    start: Position,
    dr: isize,
    dc: isize,
) -> bool {
    let (nrows, ncols) = (board.len() as isize, board.first().map_or(0, Vec::len) as isize);
    letters.iter().enumerate().all(|(i, &ch)| {
        let (row, col) = step(start, dr, dc, i);
        if row < 0 || row >= nrows || col < 0 || col >= ncols {
            return false;
        }
        let (row, col) = (row as usize, col as usize);
        if mask.is_blocked(row, col) {
            return false;
        }
        match board[row][col] {
            None => true,
            Some(existing) => existing == ch,
        }
    })
}

/// Writes the letters and returns the placement. Callers check `fits` first.
fn write_word(
    board: &mut [Vec<Option<char>>],
    letters: &[char],
    start: Position,
    dr: isize,
    dc: isize,
) -> Placement {
    for (i, &ch) in letters.iter().enumerate() {
        let (row, col) = step(start, dr, dc, i);
        board[row as usize][col as usize] = Some(ch);
    }
    let (end_row, end_col) = step(start, dr, dc, letters.len().saturating_sub(1));
    Placement::new(start, Position::new(end_row as usize, end_col as usize))
}

fn random_letter<R: Rng>(rng: &mut R) -> char {
    ALPHABET[rng.gen_range(0..ALPHABET.len())]
}
