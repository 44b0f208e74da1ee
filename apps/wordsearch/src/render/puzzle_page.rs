//! Puzzle page — the letter grid and its word list, centered on a portrait page.
//!
//! # Layout
//! - `cell_size = min((W − 2·margin) / N, (H / 2) / N)` so the grid never takes more than
//!   half the page height.
//! - The word list is three columns with a 40-unit pitch plus an 80-unit header allowance.
//! - Grid, gap and word list form one block centered vertically; the grid is centered
//!   horizontally.
//!
//! The circle crop works in page units from the drawn grid, independent of the
//! grid-index radius used by `puzzle::mask`. Both are kept as-is.

use crate::models::puzzle::MaskType;
use crate::puzzle::grid::Grid;
use crate::render::svg::{Element, Stroke, SvgDocument, BLACK, RED};

pub const PAGE_WIDTH: i64 = 2480;
pub const PAGE_HEIGHT: i64 = 3508;
pub const MARGIN: i64 = 100;

const VERTICAL_GAP: i64 = 100;
const WORD_COLUMNS: i64 = 3;
const WORD_ROW_PITCH: i64 = 40;
const WORD_LIST_HEADER: i64 = 80;
const CIRCLE_BORDER_OFFSET: i64 = 40;
const OUTLINE_WIDTH: i64 = 5;

const GRID_FONT_SIZE: u32 = 30;
const TITLE_FONT_SIZE: u32 = 40;
const WORDS_FONT_SIZE: u32 = 30;
const PAGE_NUMBER_FONT_SIZE: u32 = 30;

pub const TITLE: &str = "HIDDEN WORDS";

/// Page geometry for an N×N grid and K listed words. All values are page units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleLayout {
    pub grid_size: i64,
    pub cell_size: i64,
    /// Width and height of the drawn grid.
    pub grid_extent: i64,
    pub grid_x: i64,
    pub grid_y: i64,
    pub word_rows: i64,
    pub word_list_height: i64,
    pub combined_height: i64,
    pub center_x: i64,
    pub center_y: i64,
    /// Crop radius for circle-masked grids.
    pub radius: i64,
    pub title_y: i64,
    pub words_y: i64,
    pub column_width: i64,
}

impl PuzzleLayout {
    pub fn compute(grid_size: usize, word_count: usize) -> Self {
        let n = (grid_size as i64).max(1);
        let cell_size = ((PAGE_WIDTH - 2 * MARGIN) / n).min((PAGE_HEIGHT / 2) / n);
        let grid_extent = n * cell_size;

        let word_rows = (word_count as i64 + WORD_COLUMNS - 1) / WORD_COLUMNS;
        let word_list_height = word_rows * WORD_ROW_PITCH + WORD_LIST_HEADER;

        let combined_height = grid_extent + VERTICAL_GAP + word_list_height;
        let grid_y = (PAGE_HEIGHT - combined_height) / 2;
        let grid_x = (PAGE_WIDTH - grid_extent) / 2;

        let title_y = grid_y + grid_extent + VERTICAL_GAP;

        Self {
            grid_size: n,
            cell_size,
            grid_extent,
            grid_x,
            grid_y,
            word_rows,
            word_list_height,
            combined_height,
            center_x: grid_x + grid_extent / 2,
            center_y: grid_y + grid_extent / 2,
            radius: grid_extent / 2,
            title_y,
            words_y: title_y + WORD_LIST_HEADER,
            column_width: (PAGE_WIDTH - 2 * MARGIN) / WORD_COLUMNS,
        }
    }

    /// Top-left corner of a cell.
    pub fn cell_origin(&self, row: usize, col: usize) -> (i64, i64) {
        (
            self.grid_x + col as i64 * self.cell_size,
            self.grid_y + row as i64 * self.cell_size,
        )
    }

    /// Whether the cell's center lies within the crop circle.
    pub fn inside_circle(&self, row: usize, col: usize) -> bool {
        let (x, y) = self.cell_origin(row, col);
        let half = self.cell_size as f64 / 2.0;
        let dx = x as f64 + half - self.center_x as f64;
        let dy = y as f64 + half - self.center_y as f64;
        (dx * dx + dy * dy).sqrt() <= self.radius as f64
    }

    /// Anchor of the `index`-th word in sorted order, filled row by row.
    pub fn word_anchor(&self, index: usize) -> (i64, i64) {
        let col = index as i64 % WORD_COLUMNS;
        let row = index as i64 / WORD_COLUMNS;
        (
            MARGIN + col * self.column_width + self.column_width / 2,
            self.words_y + row * WORD_ROW_PITCH,
        )
    }
}

/// Renders the puzzle page for a solved grid.
///
/// `words` is listed sorted regardless of input order. Blocked cells are left blank;
/// with a circle mask, cells outside the crop circle are skipped entirely.
pub fn render_puzzle_page(
    grid: &Grid,
    words: &[String],
    mask: MaskType,
    page_number: Option<&str>,
) -> SvgDocument {
    let layout = PuzzleLayout::compute(grid.nrows(), words.len());
    let circle = mask == MaskType::Circle;
    let cell = layout.cell_size;

    let mut doc = SvgDocument::new(PAGE_WIDTH, PAGE_HEIGHT);
    let mut grid_group = Vec::new();
    let mut cell_borders = Vec::new();

    for row in 0..grid.nrows() {
        for col in 0..grid.ncols() {
            if circle && !layout.inside_circle(row, col) {
                continue;
            }
            let Some(letter) = grid.cell(row, col).letter() else {
                continue;
            };
            let (x, y) = layout.cell_origin(row, col);
            grid_group.push(Element::text(
                x + cell / 2,
                y + cell / 2,
                letter.to_uppercase().to_string(),
                GRID_FONT_SIZE,
            ));
            if !circle {
                cell_borders.push(Element::outline_rect(x, y, cell, cell, Stroke::thin(BLACK)));
            }
        }
    }
    grid_group.extend(cell_borders);
    doc.push(Element::Group(grid_group));

    if circle {
        doc.push(Element::outline_circle(
            layout.center_x,
            layout.center_y,
            layout.radius + CIRCLE_BORDER_OFFSET,
            Stroke::wide(RED, OUTLINE_WIDTH),
        ));
    } else {
        doc.push(Element::outline_rect(
            layout.grid_x,
            layout.grid_y,
            layout.grid_extent,
            layout.grid_extent,
            Stroke::wide(RED, OUTLINE_WIDTH),
        ));
    }

    doc.push(Element::text(
        PAGE_WIDTH / 2,
        layout.title_y,
        TITLE,
        TITLE_FONT_SIZE,
    ));

    let mut sorted: Vec<&String> = words.iter().collect();
    sorted.sort();
    for (i, word) in sorted.into_iter().enumerate() {
        let (x, y) = layout.word_anchor(i);
        doc.push(Element::text(x, y, word.to_uppercase(), WORDS_FONT_SIZE));
    }

    if let Some(page) = page_number {
        doc.push(Element::text(
            PAGE_WIDTH / 2,
            PAGE_HEIGHT - MARGIN,
            page,
            PAGE_NUMBER_FONT_SIZE,
        ));
    }

    doc
}
