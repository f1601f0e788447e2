//! Full layout pipeline: segmentation, row chunking and lane packing.
//!
//! A [`SequenceLayout`] owns the codon groups of one sequence in one reading
//! frame and the row boundaries over them. Lanes borrow the annotation
//! snapshot and are computed per row on demand, since they are row-local.
//! Every pass recomputes from scratch; identical inputs give identical output.

use std::ops::Range;

use tracing::debug;

use crate::config::LayoutConfig;
use crate::lanes::{pack_lanes, Lane};
use crate::model::{Annotation, Sequence};
use crate::rows::{chunk_row_ranges, Row};
use crate::segment::{split_into_codon_groups_with, CodonGroup};

/// Codon groups of a sequence arranged into rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceLayout {
    groups: Vec<CodonGroup>,
    rows: Vec<Range<usize>>,
}

/// A row together with its packed annotation lanes.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLayout<'a> {
    pub row: Row<'a>,
    pub lanes: Vec<Lane<'a>>,
}

impl SequenceLayout {
    /// Segments `sequence` and chunks it into rows according to `config`.
    ///
    /// # Panics
    ///
    /// Panics if `config.row_width` is zero.
    pub fn compute(sequence: &Sequence, config: &LayoutConfig) -> Self {
        let groups = split_into_codon_groups_with(sequence, config.frame, &config.genetic_code);
        let rows = chunk_row_ranges(&groups, config.row_width);
        debug!(
            length = sequence.len(),
            frame = %config.frame,
            row_width = config.row_width,
            groups = groups.len(),
            rows = rows.len(),
            "computed sequence layout"
        );
        Self { groups, rows }
    }

    pub fn groups(&self) -> &[CodonGroup] {
        &self.groups
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|range| Row::new(&self.groups[range.clone()]))
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        self.rows.iter().map(|range| Row::new(&self.groups[range.clone()]))
    }

    /// Index of the row containing the 1-indexed base `position`.
    pub fn row_of_position(&self, position: usize) -> Option<usize> {
        let index = self
            .rows
            .partition_point(|range| self.groups[range.end - 1].end() < position);
        self.row(index)
            .filter(|row| row.start() <= position)
            .map(|_| index)
    }

    /// Every row with its lanes, in order.
    pub fn row_layouts<'a>(&'a self, annotations: &'a [Annotation]) -> Vec<RowLayout<'a>> {
        self.rows()
            .map(|row| RowLayout {
                lanes: pack_lanes(annotations, row.start(), row.end()),
                row,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::validate_sequence;
    use crate::segment::ReadingFrame;
    use proptest::prelude::*;

    #[test]
    fn test_layout_rows_and_lanes() {
        let sequence = validate_sequence(&"ATGGCATAA".repeat(10)).unwrap();
        let config = LayoutConfig::default().with_row_width(30);
        let layout = SequenceLayout::compute(&sequence, &config);
        let annotations = vec![
            Annotation::new("1", 1, 10, "gene", "#ff0000"),
            Annotation::new("2", 5, 40, "promoter", "#00ff00"),
            Annotation::new("3", 85, 90, "tail", "#0000ff"),
        ];

        assert_eq!(layout.row_count(), 3);
        let rows = layout.row_layouts(&annotations);
        assert_eq!(rows[0].lanes.len(), 2);
        assert_eq!(rows[1].lanes.len(), 1);
        assert!(rows[1].lanes[0].bars()[0].continues_left);
        assert_eq!(rows[2].lanes.len(), 1);
        assert_eq!(rows[2].lanes[0].bars()[0].annotation.id, "3");
    }

    #[test]
    fn test_row_of_position() {
        let sequence = validate_sequence(&"A".repeat(100)).unwrap();
        let layout = SequenceLayout::compute(&sequence, &LayoutConfig::default());

        assert_eq!(layout.row_of_position(1), Some(0));
        assert_eq!(layout.row_of_position(60), Some(0));
        assert_eq!(layout.row_of_position(61), Some(1));
        assert_eq!(layout.row_of_position(100), Some(1));
        assert_eq!(layout.row_of_position(101), None);
        assert_eq!(layout.row_of_position(0), None);
    }

    #[test]
    fn test_frame_changes_row_boundaries() {
        let sequence = validate_sequence(&"ACG".repeat(30)).unwrap();
        let config = LayoutConfig::default().with_frame(ReadingFrame::One);
        let layout = SequenceLayout::compute(&sequence, &config);

        let bounds: Vec<_> = layout.rows().map(|r| (r.start(), r.end())).collect();
        assert_eq!(bounds, vec![(1, 58), (59, 90)]);
    }

    proptest! {
        #[test]
        fn pipeline_is_idempotent(
            s in proptest::collection::vec(prop_oneof![Just('A'), Just('C'), Just('G'), Just('U')], 1..400)
                .prop_map(|v| v.into_iter().collect::<String>()),
            offset in 0usize..3,
            width in 1usize..90,
            spans in proptest::collection::vec((1usize..400, 0usize..50), 0..20),
        ) {
            let sequence = validate_sequence(&s).unwrap();
            let annotations: Vec<Annotation> = spans
                .iter()
                .enumerate()
                .map(|(i, &(start, len))| Annotation::new(i.to_string(), start, start + len, "f", "#000"))
                .collect();
            let config = LayoutConfig::default()
                .with_frame(ReadingFrame::from_offset(offset))
                .with_row_width(width);

            let first = SequenceLayout::compute(&sequence, &config);
            let second = SequenceLayout::compute(&sequence, &config);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.row_layouts(&annotations), second.row_layouts(&annotations));
        }
    }
}
