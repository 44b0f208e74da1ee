// Rendering engine: solved grid + placements -> puzzle page and solution page.
// Pure transforms with no state; the highlight palette is injected by the caller.

pub mod palette;
pub mod puzzle_page;
pub mod solution_page;
pub mod svg;

pub use palette::{HighlightPalette, RandomPalette};
pub use puzzle_page::render_puzzle_page;
pub use solution_page::render_solution_page;
pub use svg::SvgDocument;
