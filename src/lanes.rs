//! Annotation lane packing.
//!
//! Annotations overlapping a row are stacked into lanes so that no two bars
//! in the same lane share a coordinate. Packing is greedy first-fit over the
//! annotations sorted by start (stable, so input order breaks ties). This is
//! deterministic but not guaranteed to use the minimum number of lanes.
//!
//! Bar geometry is expressed as fractions of the row, leaving the
//! conversion to characters or pixels to the renderer.

use crate::model::Annotation;

/// One annotation placed inside a row.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneBar<'a> {
    pub annotation: &'a Annotation,
    /// First visible coordinate, clipped to the row.
    pub visible_start: usize,
    /// Last visible coordinate, clipped to the row.
    pub visible_end: usize,
    /// Offset of the bar from the row start, as a fraction of the row's bases.
    pub left: f64,
    /// Width of the bar, as a fraction of the row's bases.
    pub width: f64,
    /// The annotation starts before this row.
    pub continues_left: bool,
    /// The annotation ends after this row.
    pub continues_right: bool,
}

impl LaneBar<'_> {
    /// Offset of the first visible base within the row (0-based).
    pub fn offset_in_row(&self, row_start: usize) -> usize {
        self.visible_start - row_start
    }

    pub fn visible_len(&self) -> usize {
        self.visible_end - self.visible_start + 1
    }
}

/// A row-local track of mutually non-overlapping bars.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Lane<'a> {
    bars: Vec<LaneBar<'a>>,
    rightmost_end: usize,
}

impl<'a> Lane<'a> {
    pub fn bars(&self) -> &[LaneBar<'a>] {
        &self.bars
    }

    /// Largest unclipped end coordinate among the members.
    pub fn rightmost_end(&self) -> usize {
        self.rightmost_end
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Whether `annotation` may join this lane: it must start strictly after
    /// the lane's rightmost end, so touching inclusive ranges never share a lane.
    fn accepts(&self, annotation: &Annotation) -> bool {
        annotation.start > self.rightmost_end
    }
}

/// Annotations overlapping `[row_start, row_end]`, sorted by start with
/// input order breaking ties.
pub fn overlapping<'a>(annotations: &'a [Annotation], row_start: usize, row_end: usize) -> Vec<&'a Annotation> {
    let mut visible: Vec<&Annotation> = annotations
        .iter()
        .filter(|a| !a.is_empty() && a.overlaps(row_start, row_end))
        .collect();
    // sort_by_key is stable
    visible.sort_by_key(|a| a.start);
    visible
}

fn place<'a>(annotation: &'a Annotation, row_start: usize, row_end: usize) -> LaneBar<'a> {
    let bases_in_row = (row_end - row_start + 1) as f64;
    let visible_start = annotation.start.max(row_start);
    let visible_end = annotation.end.min(row_end);

    LaneBar {
        annotation,
        visible_start,
        visible_end,
        left: (visible_start - row_start) as f64 / bases_in_row,
        width: (visible_end - visible_start + 1) as f64 / bases_in_row,
        continues_left: annotation.start < row_start,
        continues_right: annotation.end > row_end,
    }
}

/// Packs the annotations visible in `[row_start, row_end]` into lanes.
///
/// Lanes are returned in creation order; an empty or non-overlapping
/// annotation set yields no lanes.
///
/// # Panics
///
/// Panics if `row_start` is 0 or greater than `row_end`.
pub fn pack_lanes<'a>(annotations: &'a [Annotation], row_start: usize, row_end: usize) -> Vec<Lane<'a>> {
    assert!(
        row_start >= 1 && row_start <= row_end,
        "invalid row window [{row_start}, {row_end}]"
    );

    let mut lanes: Vec<Lane<'a>> = Vec::new();

    for annotation in overlapping(annotations, row_start, row_end) {
        let bar = place(annotation, row_start, row_end);
        match lanes.iter_mut().find(|lane| lane.accepts(annotation)) {
            Some(lane) => {
                lane.rightmost_end = lane.rightmost_end.max(annotation.end);
                lane.bars.push(bar);
            }
            None => lanes.push(Lane {
                bars: vec![bar],
                rightmost_end: annotation.end,
            }),
        }
    }

    lanes
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ann(id: &str, start: usize, end: usize) -> Annotation {
        Annotation::new(id, start, end, format!("feature {id}"), "#ff0000")
    }

    fn lane_ids<'a>(lanes: &[Lane<'a>]) -> Vec<Vec<&'a str>> {
        lanes
            .iter()
            .map(|lane| lane.bars().iter().map(|b| b.annotation.id.as_str()).collect())
            .collect()
    }

    #[test]
    fn test_first_fit_packing() {
        let annotations = vec![ann("1", 1, 10), ann("2", 5, 15), ann("3", 20, 25)];
        let lanes = pack_lanes(&annotations, 1, 30);

        assert_eq!(lane_ids(&lanes), vec![vec!["1", "3"], vec!["2"]]);
        assert_eq!(lanes[0].rightmost_end(), 25);
        assert_eq!(lanes[1].rightmost_end(), 15);
    }

    #[test]
    fn test_touching_intervals_use_separate_lanes() {
        let annotations = vec![ann("a", 1, 10), ann("b", 10, 20), ann("c", 11, 12)];
        let lanes = pack_lanes(&annotations, 1, 30);
        assert_eq!(lane_ids(&lanes), vec![vec!["a", "c"], vec!["b"]]);
    }

    #[test]
    fn test_sorted_by_start_with_stable_ties() {
        let annotations = vec![ann("late", 20, 22), ann("x", 5, 8), ann("y", 5, 6)];
        let lanes = pack_lanes(&annotations, 1, 30);
        assert_eq!(lane_ids(&lanes), vec![vec!["x", "late"], vec!["y"]]);
    }

    #[test]
    fn test_filters_to_row_window() {
        let annotations = vec![ann("before", 1, 9), ann("inside", 12, 14), ann("after", 21, 30)];
        let lanes = pack_lanes(&annotations, 10, 20);
        assert_eq!(lane_ids(&lanes), vec![vec!["inside"]]);
    }

    #[test]
    fn test_inverted_annotation_is_skipped() {
        let mut inverted = ann("bad", 5, 5);
        inverted.start = 9;
        let annotations = vec![inverted, ann("ok", 2, 4)];
        let lanes = pack_lanes(&annotations, 1, 30);
        assert_eq!(lane_ids(&lanes), vec![vec!["ok"]]);
    }

    #[test]
    fn test_empty_snapshot_yields_no_lanes() {
        assert!(pack_lanes(&[], 1, 60).is_empty());
    }

    #[test]
    fn test_fractional_geometry() {
        let annotations = vec![ann("1", 16, 30)];
        let lanes = pack_lanes(&annotations, 1, 60);
        let bar = &lanes[0].bars()[0];

        assert_eq!(bar.left, 0.25);
        assert_eq!(bar.width, 0.25);
        assert_eq!(bar.offset_in_row(1), 15);
        assert_eq!(bar.visible_len(), 15);
        assert!(!bar.continues_left);
        assert!(!bar.continues_right);
    }

    #[test]
    fn test_clipped_bar_flags() {
        let annotations = vec![ann("long", 50, 150)];
        let lanes = pack_lanes(&annotations, 61, 120);
        let bar = &lanes[0].bars()[0];

        assert_eq!((bar.visible_start, bar.visible_end), (61, 120));
        assert_eq!(bar.left, 0.0);
        assert_eq!(bar.width, 1.0);
        assert!(bar.continues_left);
        assert!(bar.continues_right);

        // Clipping does not change the lane's unclipped end
        assert_eq!(lanes[0].rightmost_end(), 150);
    }

    #[test]
    #[should_panic(expected = "invalid row window")]
    fn test_inverted_window_panics() {
        pack_lanes(&[], 10, 5);
    }

    fn annotation_set() -> impl Strategy<Value = Vec<Annotation>> {
        proptest::collection::vec((1usize..120, 0usize..40), 0..30).prop_map(|spans| {
            spans
                .into_iter()
                .enumerate()
                .map(|(i, (start, len))| ann(&i.to_string(), start, start + len))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn lanes_are_non_overlapping_and_complete(
            annotations in annotation_set(),
            row_start in 1usize..100,
            row_len in 1usize..60,
        ) {
            let row_end = row_start + row_len - 1;
            let lanes = pack_lanes(&annotations, row_start, row_end);

            for lane in &lanes {
                prop_assert!(!lane.is_empty());
                for (i, a) in lane.bars().iter().enumerate() {
                    for b in &lane.bars()[i + 1..] {
                        let (a, b) = (a.annotation, b.annotation);
                        prop_assert!(a.start > b.end || b.start > a.end);
                    }
                }
                for bar in lane.bars() {
                    prop_assert!(bar.left >= 0.0 && bar.left + bar.width <= 1.0 + 1e-9);
                }
            }

            let mut placed: Vec<&str> = lanes
                .iter()
                .flat_map(|l| l.bars().iter().map(|b| b.annotation.id.as_str()))
                .collect();
            placed.sort_unstable();
            let mut expected: Vec<&str> = overlapping(&annotations, row_start, row_end)
                .into_iter()
                .map(|a| a.id.as_str())
                .collect();
            expected.sort_unstable();
            prop_assert_eq!(placed, expected);

            prop_assert_eq!(lanes.clone(), pack_lanes(&annotations, row_start, row_end));
        }
    }
}
