//! Greedy packing of codon groups into fixed-width display rows.

use std::ops::Range;

use crate::segment::CodonGroup;

/// Canonical number of bases per display row.
pub const DEFAULT_ROW_WIDTH: usize = 60;

/// A contiguous, non-empty run of codon groups shown on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row<'a> {
    groups: &'a [CodonGroup],
}

impl<'a> Row<'a> {
    /// Wraps a non-empty slice of groups.
    pub(crate) fn new(groups: &'a [CodonGroup]) -> Self {
        debug_assert!(!groups.is_empty(), "rows are never empty");
        Self { groups }
    }

    pub fn groups(&self) -> &'a [CodonGroup] {
        self.groups
    }

    /// 1-indexed position of the first base.
    pub fn start(&self) -> usize {
        self.groups[0].position
    }

    /// 1-indexed position of the last base.
    pub fn end(&self) -> usize {
        let last = &self.groups[self.groups.len() - 1];
        last.position + last.len() - 1
    }

    pub fn base_count(&self) -> usize {
        self.groups.iter().map(CodonGroup::len).sum()
    }
}

/// Index ranges into `groups`, one per row.
///
/// A group is never split: a group that would push the current row past
/// `max_bases` starts a new row, and a group wider than `max_bases` sits
/// alone in its own (over-wide) row.
///
/// # Panics
///
/// Panics if `max_bases` is zero.
pub fn chunk_row_ranges(groups: &[CodonGroup], max_bases: usize) -> Vec<Range<usize>> {
    assert!(max_bases > 0, "row width must be positive");

    let mut ranges = Vec::new();
    let mut row_start = 0;
    let mut row_len = 0;

    for (i, group) in groups.iter().enumerate() {
        if row_len + group.len() > max_bases && i > row_start {
            ranges.push(row_start..i);
            row_start = i;
            row_len = 0;
        }
        row_len += group.len();
    }

    if row_start < groups.len() {
        ranges.push(row_start..groups.len());
    }

    ranges
}

/// Splits codon groups into display rows of at most `max_bases` bases.
///
/// # Panics
///
/// Panics if `max_bases` is zero.
pub fn chunk_rows(groups: &[CodonGroup], max_bases: usize) -> Vec<Row<'_>> {
    chunk_row_ranges(groups, max_bases)
        .into_iter()
        .map(|range| Row::new(&groups[range]))
        .collect()
}
