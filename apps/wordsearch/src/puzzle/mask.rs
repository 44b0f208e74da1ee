//! Shape masks — which grid cells are excluded from placement and from the page.
//!
//! Distances here are measured in grid-index space with integer centers. The circle
//! crop on the puzzle page is computed separately in page units (see
//! `render::puzzle_page`), so the two radii differ slightly for even grids.

use std::collections::HashSet;

use crate::models::puzzle::MaskType;
use crate::puzzle::grid::Position;

/// Fraction of the shorter edge cut away from each corner by the `squares` mask.
const SQUARES_INSET: f64 = 0.38;

/// Returns the set of blocked cells for the given grid dimensions and mask shape.
pub fn blocked_cells(nrows: usize, ncols: usize, kind: MaskType) -> HashSet<Position> {
    let test: fn(isize, isize, isize, isize) -> bool = match kind {
        MaskType::Plain => return HashSet::new(),
        MaskType::Circle => outside_circle,
        MaskType::Squares => outside_squares,
    };

    let (rows, cols) = (nrows as isize, ncols as isize);
    (0..rows)
        .flat_map(|row| (0..cols).map(move |col| (row, col)))
        .filter(|&(row, col)| test(rows, cols, row, col))
        .map(|(row, col)| Position::new(row as usize, col as usize))
        .collect()
}

fn outside_circle(nrows: isize, ncols: isize, row: isize, col: isize) -> bool {
    let radius_squared = nrows.min(ncols).pow(2) / 4;
    let (center_x, center_y) = (ncols / 2, nrows / 2);
    (row - center_y).pow(2) + (col - center_x).pow(2) > radius_squared
}

fn outside_squares(nrows: isize, ncols: isize, row: isize, col: isize) -> bool {
    let a = (SQUARES_INSET * nrows.min(ncols) as f64) as isize;
    let (center_x, center_y) = (ncols / 2, nrows / 2);

    let horizontal_band =
        (a..ncols - a).contains(&col) && (row < center_y - a || row > center_y + a);
    let vertical_band =
        (a..nrows - a).contains(&row) && (col < center_x - a || col > center_x + a);

    horizontal_band || vertical_band
}

/// Blocked-cell predicate for one job, derived once from the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    pub nrows: usize,
    pub ncols: usize,
    pub kind: MaskType,
    blocked: HashSet<Position>,
}

impl Mask {
    pub fn new(nrows: usize, ncols: usize, kind: MaskType) -> Self {
        Self {
            nrows,
            ncols,
            kind,
            blocked: blocked_cells(nrows, ncols, kind),
        }
    }

    pub fn is_blocked(&self, row: usize, col: usize) -> bool {
        self.blocked.contains(&Position::new(row, col))
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked.len()
    }

    /// Open cells in row-major order.
    pub fn open_cells(&self) -> Vec<Position> {
        (0..self.nrows)
            .flat_map(|row| (0..self.ncols).map(move |col| Position::new(row, col)))
            .filter(|p| !self.blocked.contains(p))
            .collect()
    }
}
