//! Highlight colors for the solution page.
//!
//! The renderer asks for one color per word and reuses it for every cell of that
//! word. Production draws random colors; tests plug in `FixedPalette`.

use rand::Rng;

use crate::render::svg::Rgb;

pub trait HighlightPalette: Send + Sync {
    fn color_for(&self, word: &str) -> Rgb;
}

/// Uniformly random RGB per call, unseeded.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPalette;

impl HighlightPalette for RandomPalette {
    fn color_for(&self, _word: &str) -> Rgb {
        let mut rng = rand::thread_rng();
        Rgb(rng.gen(), rng.gen(), rng.gen())
    }
}

/// The same color for every word.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedPalette(pub Rgb);

#[cfg(test)]
impl HighlightPalette for FixedPalette {
    fn color_for(&self, _word: &str) -> Rgb {
        self.0
    }
}
