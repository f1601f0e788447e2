//! Data model for the sequence viewer.
//!
//! This module contains all data structures for representing:
//! - Validated sequences, annotations and comments
//! - Viewport state
//! - Application state of the interactive viewer

use std::fmt;
use std::str::FromStr;

use crate::config::LayoutConfig;
use crate::coverage::covering_annotation;
use crate::lanes::pack_lanes;
use crate::layout::SequenceLayout;
use crate::segment::ReadingFrame;

/// Color used for annotations that do not specify one.
pub const DEFAULT_ANNOTATION_COLOR: &str = "#3b82f6";

/// Nucleotide alphabet of a validated sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceType {
    /// A, C, G, T
    Dna,
    /// A, C, G, U
    Rna,
}

impl fmt::Display for SequenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceType::Dna => write!(f, "DNA"),
            SequenceType::Rna => write!(f, "RNA"),
        }
    }
}

impl FromStr for SequenceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DNA" => Ok(SequenceType::Dna),
            "RNA" => Ok(SequenceType::Rna),
            _ => Err(format!("type must be either \"DNA\" or \"RNA\" (got {s:?})")),
        }
    }
}

/// A validated nucleotide sequence.
///
/// Only the validators in [`crate::alphabet`] and [`crate::formats::fasta`]
/// build one, so the bases are always uppercase `ACGT` or `ACGU`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    /// Optional display name (e.g. from a FASTA header)
    pub name: Option<String>,
    bases: String,
    seq_type: SequenceType,
}

impl Sequence {
    pub(crate) fn from_validated(bases: String, seq_type: SequenceType) -> Self {
        Self {
            name: None,
            bases,
            seq_type,
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn bases(&self) -> &str {
        &self.bases
    }

    pub fn seq_type(&self) -> SequenceType {
        self.seq_type
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Base at a 1-indexed position.
    pub fn base_at(&self, position: usize) -> Option<char> {
        let index = position.checked_sub(1)?;
        self.bases.as_bytes().get(index).map(|&b| b as char)
    }
}

/// A labeled, colored interval over a sequence (1-indexed, inclusive).
///
/// `start <= end` is expected; the store and the annotation file reader
/// reject anything else before building one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub id: String,
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub color: String,
    /// Free-form feature type (e.g. "gene", "promoter")
    pub kind: Option<String>,
}

impl Annotation {
    pub fn new(
        id: impl Into<String>,
        start: usize,
        end: usize,
        label: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        debug_assert!(start <= end, "annotation start {start} is past its end {end}");
        Self {
            id: id.into(),
            start,
            end,
            label: label.into(),
            color: color.into(),
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Number of bases covered; zero for an inverted range.
    pub fn len(&self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the annotation shares at least one coordinate with `[start, end]`.
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start <= end && self.end >= start
    }

    pub fn covers(&self, position: usize) -> bool {
        self.start <= position && position <= self.end
    }
}

/// A note attached to an annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: String,
    pub annotation_id: String,
    pub author: String,
    pub text: String,
}

/// The viewport defines which display rows are currently visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Index of the first visible display row
    pub first_row: usize,
    /// Number of terminal lines available for rows
    pub visible_lines: usize,
    /// Number of terminal columns available for rows
    pub visible_cols: usize,
}

impl Viewport {
    pub fn new(visible_lines: usize, visible_cols: usize) -> Self {
        Self {
            first_row: 0,
            visible_lines,
            visible_cols,
        }
    }

    pub fn resize(&mut self, visible_lines: usize, visible_cols: usize) {
        self.visible_lines = visible_lines;
        self.visible_cols = visible_cols;
    }
}

/// Application mode for handling different input states.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Command input mode (after pressing ':')
    Command(String),
}

/// The complete application state.
#[derive(Debug)]
pub struct AppState {
    pub sequence: Sequence,
    /// Annotation snapshot, in creation order
    pub annotations: Vec<Annotation>,
    pub config: LayoutConfig,
    pub layout: SequenceLayout,
    /// Lane count per display row, refreshed on every layout pass
    lane_counts: Vec<usize>,
    pub viewport: Viewport,
    /// 1-indexed base under the cursor
    pub cursor: usize,
    pub mode: AppMode,
    pub should_quit: bool,
    pub status_message: Option<String>,
    /// Whether bar caps and fills use box-drawing glyphs
    pub fancy_glyphs: bool,
    pub show_help: bool,
}

impl AppState {
    pub fn new(sequence: Sequence, annotations: Vec<Annotation>, config: LayoutConfig) -> Self {
        let layout = SequenceLayout::compute(&sequence, &config);
        let mut state = Self {
            sequence,
            annotations,
            config,
            layout,
            lane_counts: Vec::new(),
            viewport: Viewport::new(0, 0),
            cursor: 1,
            mode: AppMode::Normal,
            should_quit: false,
            status_message: None,
            fancy_glyphs: false,
            show_help: false,
        };
        state.refresh_lane_counts();
        state
    }

    /// Recomputes the whole layout from the current sequence, config and annotations.
    pub fn relayout(&mut self) {
        self.layout = SequenceLayout::compute(&self.sequence, &self.config);
        self.refresh_lane_counts();
        self.ensure_cursor_visible();
    }

    fn refresh_lane_counts(&mut self) {
        self.lane_counts = self
            .layout
            .rows()
            .map(|row| pack_lanes(&self.annotations, row.start(), row.end()).len())
            .collect();
    }

    /// Terminal lines used by a display row: bases, optional translation, lanes.
    pub fn row_height(&self, row: usize) -> usize {
        1 + usize::from(self.config.show_translation) + self.lane_counts.get(row).copied().unwrap_or(0)
    }

    /// Display row holding the cursor.
    pub fn cursor_row(&self) -> usize {
        self.layout.row_of_position(self.cursor).unwrap_or(0)
    }

    /// Number of display rows that fit on screen starting at the first visible row.
    pub fn rows_on_screen(&self) -> usize {
        let mut used = 0;
        let mut count = 0;
        for row in self.viewport.first_row..self.layout.row_count() {
            used += self.row_height(row);
            if used > self.viewport.visible_lines {
                break;
            }
            count += 1;
        }
        count.max(1)
    }

    pub fn update_viewport_size(&mut self, lines: usize, cols: usize) {
        self.viewport.resize(lines, cols);
        self.ensure_cursor_visible();
    }

    pub fn move_left(&mut self) {
        if self.cursor > 1 {
            self.cursor -= 1;
            self.ensure_cursor_visible();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.sequence.len() {
            self.cursor += 1;
            self.ensure_cursor_visible();
        }
    }

    /// Moves to the same column of the previous row.
    pub fn move_up(&mut self) {
        let row = self.cursor_row();
        if row > 0 {
            self.move_to_row(row - 1);
        }
    }

    /// Moves to the same column of the next row.
    pub fn move_down(&mut self) {
        let row = self.cursor_row();
        if row + 1 < self.layout.row_count() {
            self.move_to_row(row + 1);
        }
    }

    fn move_to_row(&mut self, target: usize) {
        let (Some(current), Some(next)) = (self.layout.row(self.cursor_row()), self.layout.row(target))
        else {
            return;
        };
        let column = self.cursor - current.start();
        self.cursor = (next.start() + column).min(next.end());
        self.ensure_cursor_visible();
    }

    pub fn page_up(&mut self) {
        for _ in 0..self.rows_on_screen() {
            self.move_up();
        }
    }

    pub fn page_down(&mut self) {
        for _ in 0..self.rows_on_screen() {
            self.move_down();
        }
    }

    /// Goes to the first base of the cursor's row.
    pub fn goto_row_start(&mut self) {
        if let Some(row) = self.layout.row(self.cursor_row()) {
            self.cursor = row.start();
        }
    }

    /// Goes to the last base of the cursor's row.
    pub fn goto_row_end(&mut self) {
        if let Some(row) = self.layout.row(self.cursor_row()) {
            self.cursor = row.end();
        }
    }

    /// Goes to a 1-indexed base position.
    pub fn goto_position(&mut self, position: usize) {
        if position >= 1 && position <= self.sequence.len() {
            self.cursor = position;
            self.ensure_cursor_visible();
        } else {
            self.status_message = Some(format!("Invalid position: {}", position));
        }
    }

    pub fn set_frame(&mut self, frame: ReadingFrame) {
        if self.config.frame != frame {
            self.config.frame = frame;
            self.relayout();
        }
        self.status_message = Some(format!("Reading frame {}", frame));
    }

    pub fn set_row_width(&mut self, width: usize) {
        if width == 0 {
            self.status_message = Some("Row width must be at least 1".to_string());
            return;
        }
        self.config.row_width = width;
        self.relayout();
        self.status_message = Some(format!("Row width {}", width));
    }

    pub fn toggle_translation(&mut self) {
        self.config.show_translation = !self.config.show_translation;
        self.ensure_cursor_visible();
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Topmost annotation under the cursor.
    pub fn annotation_at_cursor(&self) -> Option<&Annotation> {
        covering_annotation(self.cursor, &self.annotations)
    }

    /// Keeps the cursor's row inside the viewport.
    fn ensure_cursor_visible(&mut self) {
        let row = self.cursor_row();
        if row < self.viewport.first_row {
            self.viewport.first_row = row;
            return;
        }
        while self.viewport.first_row < row {
            let needed: usize = (self.viewport.first_row..=row).map(|r| self.row_height(r)).sum();
            if needed <= self.viewport.visible_lines {
                break;
            }
            self.viewport.first_row += 1;
        }
    }

    /// Enters command mode.
    pub fn enter_command_mode(&mut self) {
        self.mode = AppMode::Command(String::new());
    }

    /// Handles a character input in command mode.
    pub fn command_input(&mut self, c: char) {
        if let AppMode::Command(ref mut cmd) = self.mode {
            cmd.push(c);
        }
    }

    /// Handles backspace in command mode.
    pub fn command_backspace(&mut self) {
        if let AppMode::Command(ref mut cmd) = self.mode {
            cmd.pop();
            if cmd.is_empty() {
                self.mode = AppMode::Normal;
            }
        }
    }

    /// Executes the current command.
    pub fn execute_command(&mut self) {
        if let AppMode::Command(cmd) = std::mem::take(&mut self.mode) {
            let mut parts = cmd.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some("q" | "quit"), None) => self.should_quit = true,
                (Some("h" | "help"), None) => self.show_help = true,
                (Some("w" | "width"), Some(n)) => match n.parse::<usize>() {
                    Ok(width) => self.set_row_width(width),
                    Err(_) => self.status_message = Some(format!("Invalid width: {}", n)),
                },
                (Some("f" | "frame"), Some(n)) => match n.parse::<u8>() {
                    Ok(frame @ 1..=3) => self.set_frame(ReadingFrame::from_offset(frame as usize - 1)),
                    _ => self.status_message = Some(format!("Invalid frame: {} (use 1-3)", n)),
                },
                (Some(n), None) => match n.parse::<usize>() {
                    Ok(position) => self.goto_position(position),
                    Err(_) => self.status_message = Some(format!("Unknown command: {}", cmd)),
                },
                _ => self.status_message = Some(format!("Unknown command: {}", cmd)),
            }
        }
        self.mode = AppMode::Normal;
    }

    /// Cancels command mode and returns to normal mode.
    pub fn cancel_command(&mut self) {
        self.mode = AppMode::Normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::validate_sequence;

    fn state(bases: &str, annotations: Vec<Annotation>) -> AppState {
        let sequence = validate_sequence(bases).unwrap();
        let mut state = AppState::new(sequence, annotations, LayoutConfig::default().with_row_width(9));
        state.update_viewport_size(20, 80);
        state
    }

    #[test]
    fn test_sequence_accessors() {
        let seq = validate_sequence("ACGT").unwrap().with_name(Some("seq1".to_string()));
        assert_eq!(seq.name.as_deref(), Some("seq1"));
        assert_eq!(seq.base_at(1), Some('A'));
        assert_eq!(seq.base_at(4), Some('T'));
        assert_eq!(seq.base_at(0), None);
        assert_eq!(seq.base_at(5), None);
    }

    #[test]
    fn test_sequence_type_parsing() {
        assert_eq!("dna".parse::<SequenceType>(), Ok(SequenceType::Dna));
        assert_eq!("RNA".parse::<SequenceType>(), Ok(SequenceType::Rna));
        assert!("protein".parse::<SequenceType>().is_err());
        assert_eq!(SequenceType::Rna.to_string(), "RNA");
    }

    #[test]
    fn test_annotation_geometry() {
        let a = Annotation::new("1", 5, 10, "gene", "#fff").with_kind("CDS");
        assert_eq!(a.len(), 6);
        assert!(a.overlaps(10, 20));
        assert!(!a.overlaps(11, 20));
        assert!(a.covers(5) && a.covers(10) && !a.covers(4));
        assert_eq!(a.kind.as_deref(), Some("CDS"));
        assert!(!a.is_empty());

        // Fields are public, so an inverted range can still be built by hand
        let mut inverted = a.clone();
        inverted.end = 2;
        assert_eq!(inverted.len(), 0);
        assert!(inverted.is_empty());
    }

    #[test]
    fn test_cursor_movement() {
        let mut state = state(&"ACG".repeat(10), vec![]);

        state.move_right();
        assert_eq!(state.cursor, 2);
        state.move_down();
        assert_eq!(state.cursor, 11);
        state.goto_row_end();
        assert_eq!(state.cursor, 18);
        state.move_up();
        assert_eq!(state.cursor, 9);
        state.goto_row_start();
        assert_eq!(state.cursor, 1);

        // Boundary: can't go past the first base
        state.move_left();
        assert_eq!(state.cursor, 1);
        state.move_up();
        assert_eq!(state.cursor, 1);
    }

    #[test]
    fn test_move_down_clamps_to_shorter_row() {
        let mut state = state(&"ACG".repeat(4), vec![]);
        state.goto_position(9);
        state.move_down();
        assert_eq!(state.cursor, 12);
    }

    #[test]
    fn test_frame_change_relayouts() {
        let mut state = state(&"ACG".repeat(10), vec![]);
        state.set_frame(ReadingFrame::One);
        assert_eq!(state.layout.row(0).unwrap().end(), 7);
        assert!(state.layout.groups()[0].is_orphan);
    }

    #[test]
    fn test_row_height_counts_lanes() {
        let annotations = vec![
            Annotation::new("1", 1, 5, "a", "#f00"),
            Annotation::new("2", 3, 8, "b", "#0f0"),
        ];
        let mut state = state(&"ACG".repeat(10), annotations);
        assert_eq!(state.row_height(0), 4);
        assert_eq!(state.row_height(1), 2);
        state.toggle_translation();
        assert_eq!(state.row_height(1), 1);
    }

    #[test]
    fn test_viewport_follows_cursor() {
        let mut state = state(&"ACG".repeat(30), vec![]);
        state.update_viewport_size(4, 80);
        state.goto_position(90);
        assert_eq!(state.cursor_row(), 9);
        assert_eq!(state.viewport.first_row, 8);
        state.goto_position(1);
        assert_eq!(state.viewport.first_row, 0);
    }

    #[test]
    fn test_commands() {
        let mut state = state(&"ACG".repeat(10), vec![]);

        state.enter_command_mode();
        for c in "15".chars() {
            state.command_input(c);
        }
        state.execute_command();
        assert_eq!(state.cursor, 15);
        assert_eq!(state.mode, AppMode::Normal);

        state.enter_command_mode();
        for c in "w 6".chars() {
            state.command_input(c);
        }
        state.execute_command();
        assert_eq!(state.config.row_width, 6);
        assert_eq!(state.layout.row_count(), 5);

        state.enter_command_mode();
        for c in "frame 4".chars() {
            state.command_input(c);
        }
        state.execute_command();
        assert_eq!(state.config.frame, ReadingFrame::Zero);
        assert!(state.status_message.as_deref().unwrap().starts_with("Invalid frame"));

        state.enter_command_mode();
        state.command_input('h');
        state.execute_command();
        assert!(state.show_help);

        state.enter_command_mode();
        state.command_input('q');
        state.execute_command();
        assert!(state.should_quit);
    }

    #[test]
    fn test_annotation_at_cursor() {
        let annotations = vec![
            Annotation::new("1", 1, 10, "outer", "#f00"),
            Annotation::new("2", 3, 4, "inner", "#0f0"),
        ];
        let mut state = state(&"ACG".repeat(10), annotations);
        state.goto_position(3);
        assert_eq!(state.annotation_at_cursor().unwrap().label, "inner");
        state.goto_position(11);
        assert!(state.annotation_at_cursor().is_none());
    }
}
