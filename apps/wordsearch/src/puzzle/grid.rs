use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Letter(char),
    Blocked,
}

impl Cell {
    pub fn letter(self) -> Option<char> {
        match self {
            Cell::Letter(c) => Some(c),
            Cell::Blocked => None,
        }
    }
}

/// Solved letter grid, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        debug_assert!(
            rows.windows(2).all(|w| w[0].len() == w[1].len()),
            "grid rows must all have the same length"
        );
        Self { rows }
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn ncols(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.rows[row][col]
    }

    /// One line of text per row, blocked cells shown as `*`.
    pub fn to_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| c.letter().unwrap_or('*').to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Straight line a placed word occupies, endpoints inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub start: Position,
    pub end: Position,
}

impl Placement {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Cells visited by a word of `len` letters, stepping each differing axis by
    /// `(end - start) / (len - 1)`. A one-letter word has no step.
    pub fn cells(&self, len: usize) -> Vec<Position> {
        let steps = len.saturating_sub(1) as isize;
        let axis = |start: usize, end: usize, i: isize| -> usize {
            if start == end || steps == 0 {
                return start;
            }
            let delta = end as isize - start as isize;
            (start as isize + (i * delta).div_euclid(steps)) as usize
        };

        (0..len as isize)
            .map(|i| {
                Position::new(
                    axis(self.start.row, self.end.row, i),
                    axis(self.start.col, self.end.col, i),
                )
            })
            .collect()
    }
}

/// Word → placement. Ordered so rendering is reproducible.
pub type Placements = BTreeMap<String, Placement>;

/// Solver output: the filled grid and where each word sits in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolvedGrid {
    pub grid: Grid,
    pub placements: Placements,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_horizontal_cells() {
        let cells = Placement::new(p(2, 1), p(2, 4)).cells(4);
        assert_eq!(cells, vec![p(2, 1), p(2, 2), p(2, 3), p(2, 4)]);
    }

    #[test]
    fn test_backwards_vertical_cells() {
        let cells = Placement::new(p(4, 0), p(0, 0)).cells(5);
        assert_eq!(cells, vec![p(4, 0), p(3, 0), p(2, 0), p(1, 0), p(0, 0)]);
    }

    #[test]
    fn test_anti_diagonal_cells() {
        let cells = Placement::new(p(0, 3), p(3, 0)).cells(4);
        assert_eq!(cells, vec![p(0, 3), p(1, 2), p(2, 1), p(3, 0)]);
    }

    #[test]
    fn test_single_letter_has_zero_step() {
        let cells = Placement::new(p(1, 1), p(1, 1)).cells(1);
        assert_eq!(cells, vec![p(1, 1)]);
    }

    #[test]
    fn test_cells_are_distinct_and_len_matches() {
        let placement = Placement::new(p(5, 5), p(0, 0));
        let cells = placement.cells(6);
        assert_eq!(cells.len(), 6);
        let unique: std::collections::HashSet<_> = cells.iter().collect();
        assert_eq!(unique.len(), 6);
    }

    #[test]
    fn test_grid_dimensions_and_text() {
        let grid = Grid::from_rows(vec![
            vec![Cell::Letter('A'), Cell::Blocked],
            vec![Cell::Letter('C'), Cell::Letter('D')],
        ]);
        assert_eq!(grid.nrows(), 2);
        assert_eq!(grid.ncols(), 2);
        assert_eq!(grid.cell(0, 1), Cell::Blocked);
        assert_eq!(grid.to_text(), "A *\nC D");
    }
}
