//! Layout configuration shared by the text and terminal renderers.

use crate::genetic_code::{GeneticCode, STANDARD};
use crate::rows::DEFAULT_ROW_WIDTH;
use crate::segment::ReadingFrame;

/// Inputs to a layout pass other than the sequence and annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Maximum bases per row. Must be positive.
    pub row_width: usize,
    pub frame: ReadingFrame,
    pub genetic_code: GeneticCode,
    /// Whether renderers draw the amino-acid line under each row.
    pub show_translation: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            row_width: DEFAULT_ROW_WIDTH,
            frame: ReadingFrame::Zero,
            genetic_code: STANDARD,
            show_translation: true,
        }
    }
}

impl LayoutConfig {
    pub fn with_row_width(mut self, row_width: usize) -> Self {
        self.row_width = row_width;
        self
    }

    pub fn with_frame(mut self, frame: ReadingFrame) -> Self {
        self.frame = frame;
        self
    }

    pub fn with_genetic_code(mut self, genetic_code: GeneticCode) -> Self {
        self.genetic_code = genetic_code;
        self
    }

    pub fn with_translation(mut self, show_translation: bool) -> Self {
        self.show_translation = show_translation;
        self
    }
}
