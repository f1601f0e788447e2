//! TUI rendering module.
//!
//! This module handles all visual rendering using ratatui:
//! - Sequence rows with a position gutter, codon groups and translation
//! - Annotation lanes below each row, bases tinted by covering annotation
//! - Status bar with position, frame and annotation info
//! - Command line and help overlay

pub mod glyphs;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::coverage::row_colors;
use crate::lanes::{pack_lanes, Lane};
use crate::model::{AppMode, AppState};
use crate::rows::Row;
use crate::text_view::{bar_offsets, base_columns, render_lane, render_translation};
use glyphs::Glyphs;

/// Height of the status bar.
const STATUS_BAR_HEIGHT: u16 = 1;
/// Width of the help overlay.
const HELP_WIDTH: u16 = 60;

const HELP_TEXT: &str = "h/l or arrows: move one base. j/k: move one row. \
0/$: start/end of row. PageUp/PageDown: move one screen. \
1/2/3: reading frame +1/+2/+3. t: toggle translation. \
:<n> jumps to base n, :w <n> sets the row width, :f <n> sets the frame, :q quits. \
Press any key to close this help.";

/// Color scheme for nucleotides.
pub trait ColorScheme {
    fn get_color(&self, c: char) -> Color;
}

/// Nucleotide color scheme: A green, T/U red, G yellow, C blue.
pub struct NucleotideColorScheme;

impl ColorScheme for NucleotideColorScheme {
    fn get_color(&self, c: char) -> Color {
        match c.to_ascii_uppercase() {
            'A' => Color::Green,
            'T' | 'U' => Color::Red,
            'G' => Color::Yellow,
            'C' => Color::Blue,
            _ => Color::Gray,
        }
    }
}

/// Parses an annotation color: `#rgb`, `#rrggbb` or a named terminal color.
pub fn parse_color(color: &str) -> Option<Color> {
    let color = color.trim();
    if let Some(hex) = color.strip_prefix('#') {
        if hex.len() == 3 && hex.is_ascii() {
            let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
            return parse_color(&format!("#{expanded}"));
        }
    }
    color.parse().ok()
}

/// Renders the complete UI.
pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(STATUS_BAR_HEIGHT)])
        .split(area);

    render_sequence_panel(frame, state, main_layout[0]);
    render_status_bar(frame, state, main_layout[1]);

    if state.show_help {
        render_help(frame, area);
    }
}

/// Renders the visible rows with their translation and lanes.
fn render_sequence_panel(frame: &mut Frame, state: &AppState, area: Rect) {
    let glyphs = glyphs::select(state.fancy_glyphs);
    let visible_lines = area.height.saturating_sub(2) as usize;
    let gutter = state.sequence.len().to_string().len();
    let mut lines: Vec<Line> = Vec::new();

    for index in state.viewport.first_row..state.layout.row_count() {
        // The first row is always drawn, even when its lanes overflow
        if !lines.is_empty() && lines.len() + state.row_height(index) > visible_lines {
            break;
        }
        let Some(row) = state.layout.row(index) else {
            break;
        };

        lines.push(bases_line(state, &row, gutter));
        if state.config.show_translation {
            lines.push(Line::from(vec![
                Span::raw(format!("{:gutter$} ", "")),
                Span::styled(render_translation(&row), Style::default().fg(Color::Magenta)),
            ]));
        }
        for lane in pack_lanes(&state.annotations, row.start(), row.end()) {
            lines.push(lane_line(&lane, &row, &glyphs, gutter));
        }
    }
    lines.truncate(visible_lines);

    let name = state.sequence.name.as_deref().unwrap_or("unnamed");
    let title = format!(
        "{} [{} | {} bp | frame {} | {} annotations]",
        name,
        state.sequence.seq_type(),
        state.sequence.len(),
        state.config.frame,
        state.annotations.len()
    );
    let block = Block::default().borders(Borders::ALL).title(title);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Base line: position gutter, then colored bases grouped by codon.
fn bases_line<'a>(state: &'a AppState, row: &Row<'_>, gutter: usize) -> Line<'a> {
    let scheme = NucleotideColorScheme;
    let colors = row_colors(row, &state.annotations);
    let mut spans = vec![Span::styled(
        format!("{:>gutter$} ", row.start()),
        Style::default().fg(Color::DarkGray),
    )];

    let mut position = row.start();
    for (i, group) in row.groups().iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        for c in group.bases.chars() {
            let mut style = Style::default().fg(scheme.get_color(c));
            if let Some(bg) = colors[position - row.start()].and_then(parse_color) {
                style = style.bg(bg);
            }
            if group.is_orphan {
                style = style.add_modifier(Modifier::DIM);
            }
            if position == state.cursor {
                style = Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD);
            }
            spans.push(Span::styled(c.to_string(), style));
            position += 1;
        }
    }

    Line::from(spans)
}

/// Lane line: bars drawn with glyphs, each in its annotation's color.
fn lane_line<'a>(lane: &Lane<'_>, row: &Row<'_>, glyphs: &Glyphs, gutter: usize) -> Line<'a> {
    let text: Vec<char> = render_lane(lane, row, glyphs).chars().collect();
    let columns = base_columns(row);
    let mut colors: Vec<Option<Color>> = vec![None; text.len()];

    for bar in lane.bars() {
        let (first, last) = bar_offsets(bar, columns.len());
        let color = parse_color(&bar.annotation.color).unwrap_or(Color::Cyan);
        for col in columns[first]..=columns[last] {
            if let Some(slot) = colors.get_mut(col) {
                *slot = Some(color);
            }
        }
    }

    let mut spans = vec![Span::raw(format!("{:gutter$} ", ""))];
    for (c, color) in text.into_iter().zip(colors) {
        let style = color.map_or_else(Style::default, |fg| Style::default().fg(fg));
        spans.push(Span::styled(c.to_string(), style));
    }
    Line::from(spans)
}

/// Renders the status bar at the bottom.
fn render_status_bar(frame: &mut Frame, state: &AppState, area: Rect) {
    let (mode_str, command_str) = match &state.mode {
        AppMode::Normal => ("NORMAL", String::new()),
        AppMode::Command(cmd) => ("COMMAND", format!(":{}", cmd)),
    };

    let annotation = state
        .annotation_at_cursor()
        .map(|a| format!("{} ({}-{}) | ", a.label, a.start, a.end))
        .unwrap_or_default();
    let position_info = format!(
        "{}Pos {}/{} | Row {}/{} ",
        annotation,
        state.cursor,
        state.sequence.len(),
        state.cursor_row() + 1,
        state.layout.row_count()
    );

    let message = state.status_message.as_deref().unwrap_or("");
    let left_content = if command_str.is_empty() {
        format!(" {} | {} ", mode_str, message)
    } else {
        format!(" {} | {} ", mode_str, command_str)
    };

    let left_len = left_content.chars().count();
    let status_line = Line::from(vec![
        Span::styled(left_content, Style::default().fg(Color::Black).bg(Color::Cyan)),
        Span::styled(
            " ".repeat((area.width as usize).saturating_sub(left_len + position_info.chars().count())),
            Style::default().bg(Color::Cyan),
        ),
        Span::styled(
            position_info,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    frame.render_widget(Paragraph::new(status_line), area);
}

/// Wraps help text to the overlay's inner width.
pub fn help_lines(width: u16) -> Vec<String> {
    let inner = width.saturating_sub(2).max(10) as usize;
    textwrap::wrap(HELP_TEXT, inner)
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

/// Renders the help overlay centered in `area`.
fn render_help(frame: &mut Frame, area: Rect) {
    let width = HELP_WIDTH.min(area.width);
    let lines = help_lines(width);
    let height = (lines.len() as u16 + 2).min(area.height);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    let text: Vec<Line> = lines.into_iter().map(Line::from).collect();
    let block = Block::default().borders(Borders::ALL).title("Help");
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(text).block(block), popup);
}

/// Calculates the lines and columns available for sequence rows.
pub fn calculate_visible_dimensions(terminal_width: u16, terminal_height: u16) -> (usize, usize) {
    // Account for borders and status bar
    let visible_lines = (terminal_height.saturating_sub(STATUS_BAR_HEIGHT + 2)) as usize;
    let visible_cols = (terminal_width.saturating_sub(2)) as usize;
    (visible_lines, visible_cols)
}
