use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;

/// Largest grid edge the solver accepts.
pub const NMAX: usize = 32;

/// Three columns of 39 rows is all the word list space left below a half-page grid.
pub const MAX_WORDS: usize = 117;

const DEFAULT_SIZE: usize = 15;
const DEFAULT_BOOK_NAME: &str = "Where's Word-o";

/// Shape constraint applied to the grid before solving and when drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskType {
    #[default]
    #[serde(rename = "none")]
    Plain,
    Circle,
    Squares,
}

impl std::fmt::Display for MaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaskType::Plain => write!(f, "none"),
            MaskType::Circle => write!(f, "circle"),
            MaskType::Squares => write!(f, "squares"),
        }
    }
}

/// Request body for puzzle generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleRequest {
    pub wordlist: Vec<String>,
    #[serde(default = "default_size")]
    pub size: usize,
    #[serde(default)]
    pub mask_type: Option<MaskType>,
    #[serde(default = "default_book_name")]
    pub book_name: String,
    /// Forwarded to the solver; when false words only run right, down or down-right.
    #[serde(default = "default_allow_backwards")]
    pub allow_backwards: bool,
    /// Footer printed at the bottom of the puzzle page.
    #[serde(default)]
    pub page_number: Option<String>,
}

fn default_size() -> usize {
    DEFAULT_SIZE
}

fn default_book_name() -> String {
    DEFAULT_BOOK_NAME.to_string()
}

fn default_allow_backwards() -> bool {
    true
}

impl PuzzleRequest {
    #[cfg(test)]
    pub fn new(wordlist: Vec<String>, size: usize) -> Self {
        Self {
            wordlist,
            size,
            mask_type: None,
            book_name: default_book_name(),
            allow_backwards: true,
            page_number: None,
        }
    }

    pub fn mask(&self) -> MaskType {
        self.mask_type.unwrap_or_default()
    }

    /// Upper-cases every word and strips its whitespace, dropping words left empty,
    /// then checks the grid and word list bounds.
    pub fn normalize(mut self) -> Result<Self, GenerationError> {
        self.wordlist = self
            .wordlist
            .iter()
            .map(|w| normalize_word(w))
            .filter(|w| !w.is_empty())
            .collect();

        if self.wordlist.is_empty() {
            return Err(GenerationError::Validation(
                "wordlist must contain at least one word".to_string(),
            ));
        }
        if self.wordlist.len() > MAX_WORDS {
            return Err(GenerationError::Validation(format!(
                "wordlist has {} words; at most {MAX_WORDS} fit on a page",
                self.wordlist.len()
            )));
        }
        if self.size == 0 {
            return Err(GenerationError::Validation(
                "size must be at least 1".to_string(),
            ));
        }
        if self.size > NMAX {
            return Err(GenerationError::Validation(format!(
                "Maximum grid size is {NMAX}x{NMAX}, got {}",
                self.size
            )));
        }

        Ok(self)
    }
}

pub fn normalize_word(word: &str) -> String {
    word.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}
