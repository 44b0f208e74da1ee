//! Solution page — the answer key, sized exactly to the grid.
//!
//! Paint order matters: letters, then one filled block per word cell, then the word
//! letters again so they stay legible over the highlight.

use std::collections::BTreeMap;

use crate::models::puzzle::MaskType;
use crate::puzzle::grid::{Grid, Placements};
use crate::render::palette::HighlightPalette;
use crate::render::svg::{Element, Paint, Rgb, Stroke, SvgDocument, BLACK, RED};

pub const CELL_SIZE: i64 = 40;
pub const PADDING: i64 = 20;

const FONT_SIZE: u32 = 24;
const BORDER_WIDTH: i64 = 5;
const CIRCLE_BORDER_OFFSET: i64 = 20;

pub fn page_size(grid_size: usize) -> i64 {
    grid_size as i64 * CELL_SIZE + 2 * PADDING
}

fn cell_origin(row: usize, col: usize) -> (i64, i64) {
    (
        PADDING + col as i64 * CELL_SIZE,
        PADDING + row as i64 * CELL_SIZE,
    )
}

pub fn render_solution_page(
    grid: &Grid,
    placements: &Placements,
    mask: MaskType,
    palette: &dyn HighlightPalette,
) -> SvgDocument {
    let n = grid.nrows();
    let size = page_size(n);
    let circle = mask == MaskType::Circle;
    let mut doc = SvgDocument::new(size, size);

    for row in 0..n {
        for col in 0..grid.ncols() {
            let Some(letter) = grid.cell(row, col).letter() else {
                continue;
            };
            let (x, y) = cell_origin(row, col);
            if !circle {
                doc.push(Element::outline_rect(
                    x,
                    y,
                    CELL_SIZE,
                    CELL_SIZE,
                    Stroke::thin(BLACK),
                ));
            }
            doc.push(Element::text(
                x + CELL_SIZE / 2,
                y + CELL_SIZE / 2,
                letter.to_uppercase().to_string(),
                FONT_SIZE,
            ));
        }
    }

    let colors: BTreeMap<&str, Rgb> = placements
        .keys()
        .map(|word| (word.as_str(), palette.color_for(word)))
        .collect();

    for (word, placement) in placements {
        let fill = Paint::Rgb(colors[word.as_str()]);
        for pos in placement.cells(word.chars().count()) {
            let (x, y) = cell_origin(pos.row, pos.col);
            doc.push(Element::filled_rect(x, y, CELL_SIZE, CELL_SIZE, fill));
        }
    }

    for (word, placement) in placements {
        let letters = word.chars().collect::<Vec<_>>();
        for (pos, letter) in placement.cells(letters.len()).into_iter().zip(letters) {
            let (x, y) = cell_origin(pos.row, pos.col);
            doc.push(Element::text(
                x + CELL_SIZE / 2,
                y + CELL_SIZE / 2,
                letter.to_uppercase().to_string(),
                FONT_SIZE,
            ));
        }
    }

    let extent = n as i64 * CELL_SIZE;
    if circle {
        doc.push(Element::outline_circle(
            PADDING + extent / 2,
            PADDING + extent / 2,
            extent / 2 + CIRCLE_BORDER_OFFSET,
            Stroke::wide(RED, BORDER_WIDTH),
        ));
    } else {
        doc.push(Element::outline_rect(
            PADDING,
            PADDING,
            extent,
            extent,
            Stroke::wide(RED, BORDER_WIDTH),
        ));
    }

    doc
}
