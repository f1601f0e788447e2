//! Per-base annotation coverage.
//!
//! When several annotations cover the same coordinate, the one that comes
//! last in the snapshot (the most recently created) wins.

use crate::model::Annotation;
use crate::rows::Row;

/// The topmost annotation covering a 1-indexed `position`, if any.
pub fn covering_annotation(position: usize, annotations: &[Annotation]) -> Option<&Annotation> {
    annotations.iter().rev().find(|a| a.covers(position))
}

/// Color of the topmost annotation covering `position`.
pub fn covering_color(position: usize, annotations: &[Annotation]) -> Option<&str> {
    covering_annotation(position, annotations).map(|a| a.color.as_str())
}

/// Covering color for every base of `row`, in order.
///
/// Equivalent to calling [`covering_color`] per base, but only the
/// annotations overlapping the row are scanned.
pub fn row_colors<'a>(row: &Row<'_>, annotations: &'a [Annotation]) -> Vec<Option<&'a str>> {
    let (start, end) = (row.start(), row.end());
    let mut colors = vec![None; end - start + 1];

    // Later annotations overwrite earlier ones: last write wins
    for annotation in annotations.iter().filter(|a| !a.is_empty() && a.overlaps(start, end)) {
        let from = annotation.start.max(start) - start;
        let to = annotation.end.min(end) - start;
        for slot in &mut colors[from..=to] {
            *slot = Some(annotation.color.as_str());
        }
    }

    colors
}
