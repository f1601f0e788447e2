//! Plain-text rendering of a sequence layout.
//!
//! Each row prints as a base line (codon groups separated by one space),
//! an optional translation line and one line per annotation lane:
//!
//! ```text
//!  1 ATG GCA TAA
//!     M   A   *
//!    [gene=]
//! ```
//!
//! Bars are placed from the fractional lane geometry, mapped onto the
//! character columns of the row (which include the gaps between groups).

use std::io::{self, Write};

use crate::config::LayoutConfig;
use crate::lanes::{Lane, LaneBar};
use crate::layout::SequenceLayout;
use crate::model::{Annotation, Sequence};
use crate::rows::Row;
use crate::ui::glyphs::Glyphs;

/// Character column of every base in a row, gaps between groups included.
pub fn base_columns(row: &Row<'_>) -> Vec<usize> {
    let mut columns = Vec::with_capacity(row.base_count());
    let mut col = 0;
    for group in row.groups() {
        for _ in 0..group.len() {
            columns.push(col);
            col += 1;
        }
        col += 1;
    }
    columns
}

/// Base offsets `(first, last)` within the row covered by a bar.
///
/// Converts the fractional `left`/`width` back to whole bases.
pub fn bar_offsets(bar: &LaneBar<'_>, bases_in_row: usize) -> (usize, usize) {
    let n = bases_in_row as f64;
    let first = ((bar.left * n).round() as usize).min(bases_in_row - 1);
    let len = ((bar.width * n).round() as usize).max(1);
    let last = (first + len - 1).min(bases_in_row - 1);
    (first, last)
}

/// Width in characters of a rendered base line.
pub fn line_width(columns: &[usize]) -> usize {
    columns.last().map_or(0, |&c| c + 1)
}

/// Codon groups separated by single spaces.
pub fn render_bases(row: &Row<'_>) -> String {
    row.groups()
        .iter()
        .map(|g| g.bases.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Amino-acid symbols under the middle base of each complete codon.
pub fn render_translation(row: &Row<'_>) -> String {
    let columns = base_columns(row);
    let mut line = vec![' '; line_width(&columns)];
    let mut offset = 0;
    for group in row.groups() {
        if let Some(aa) = group.amino_acid {
            line[columns[offset + group.len() / 2]] = aa.symbol();
        }
        offset += group.len();
    }
    line.into_iter().collect::<String>().trim_end().to_string()
}

/// Draws one lane as a line of characters.
pub fn render_lane(lane: &Lane<'_>, row: &Row<'_>, glyphs: &Glyphs) -> String {
    let columns = base_columns(row);
    let mut line = vec![' '; line_width(&columns)];

    for bar in lane.bars() {
        let (first, last) = bar_offsets(bar, columns.len());
        let (from, to) = (columns[first], columns[last]);

        for cell in &mut line[from..=to] {
            *cell = glyphs.bar_fill;
        }
        if to > from {
            line[from] = glyphs.left_cap(bar.continues_left);
            line[to] = glyphs.right_cap(bar.continues_right);
        } else if bar.continues_left || bar.continues_right {
            // Single cell: only a continuation is worth a cap
            line[from] = if bar.continues_left {
                glyphs.continues_left
            } else {
                glyphs.continues_right
            };
        }

        let label: Vec<char> = bar.annotation.label.chars().collect();
        let interior = to.saturating_sub(from + 1);
        if !label.is_empty() && label.len() <= interior {
            line[from + 1..from + 1 + label.len()].copy_from_slice(&label);
        }
    }

    line.into_iter().collect::<String>().trim_end().to_string()
}

/// Writes the whole layout.
pub fn write_layout<W: Write>(
    out: &mut W,
    sequence: &Sequence,
    layout: &SequenceLayout,
    annotations: &[Annotation],
    config: &LayoutConfig,
    glyphs: &Glyphs,
) -> io::Result<()> {
    writeln!(
        out,
        "# {} | {} | {} bp | frame {} | code {}",
        sequence.name.as_deref().unwrap_or("unnamed"),
        sequence.seq_type(),
        sequence.len(),
        config.frame,
        config.genetic_code.id
    )?;

    let gutter = sequence.len().to_string().len();
    for row_layout in layout.row_layouts(annotations) {
        let row = &row_layout.row;
        writeln!(out, "{:>gutter$} {}", row.start(), render_bases(row))?;
        if config.show_translation {
            let translation = render_translation(row);
            writeln!(out, "{:gutter$} {}", "", translation)?;
        }
        for lane in &row_layout.lanes {
            writeln!(out, "{:gutter$} {}", "", render_lane(lane, row, glyphs))?;
        }
    }
    Ok(())
}

/// Renders the whole layout to a string.
pub fn render_layout(
    sequence: &Sequence,
    layout: &SequenceLayout,
    annotations: &[Annotation],
    config: &LayoutConfig,
    glyphs: &Glyphs,
) -> io::Result<String> {
    let mut buf = Vec::new();
    write_layout(&mut buf, sequence, layout, annotations, config, glyphs)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
