//! Pairwise interval operations over logical ranges.
//!
//! All operations are pure and normalize their operands before comparing.
//! Intervals are closed: ranges that touch at a single position intersect.
//! Any incomparable boundary makes `intersects`/`contains` false and
//! `merge` fail, so stale ranges are left alone rather than rewritten.

use crate::highlight::ids::IdGenerator;
use crate::highlight::position::{
    PositionOrder, at_or_after, at_or_before, earliest, latest, strictly_before,
};
use crate::highlight::range::{LogicalRange, Spanned};

/// `a` and `b` overlap or touch
pub fn intersects(order: &dyn PositionOrder, a: &impl Spanned, b: &impl Spanned) -> bool {
    let (a_start, a_end) = a.bounds(order);
    let (b_start, b_end) = b.bounds(order);
    at_or_after(order, a_end, b_start) && at_or_after(order, b_end, a_start)
}

/// Every position of `inner` lies within `outer`
pub fn contains(order: &dyn PositionOrder, outer: &impl Spanned, inner: &impl Spanned) -> bool {
    let (outer_start, outer_end) = outer.bounds(order);
    let (inner_start, inner_end) = inner.bounds(order);
    at_or_before(order, outer_start, inner_start) && at_or_after(order, outer_end, inner_end)
}

/// `original` minus the part covered by `cut`, as zero, one or two fresh fragments.
///
/// Fragments keep the original color and never reuse its id. A cut that
/// does not intersect (or cannot be ordered against) the original leaves
/// a single fragment spanning all of it.
pub fn split(
    order: &dyn PositionOrder,
    original: &LogicalRange,
    cut: &impl Spanned,
    ids: &mut dyn IdGenerator,
) -> Vec<LogicalRange> {
    let (start, end) = original.bounds(order);

    if !intersects(order, original, cut) {
        return vec![LogicalRange::new(
            ids.next_id(),
            start.clone(),
            end.clone(),
            original.color.clone(),
        )];
    }

    let (cut_start, cut_end) = cut.bounds(order);
    let mut fragments = Vec::with_capacity(2);

    // Strict comparisons: collapsed fragments are never emitted
    if strictly_before(order, start, cut_start) {
        fragments.push(LogicalRange::new(
            ids.next_id(),
            start.clone(),
            cut_start.clone(),
            original.color.clone(),
        ));
    }
    if strictly_before(order, cut_end, end) {
        fragments.push(LogicalRange::new(
            ids.next_id(),
            cut_end.clone(),
            end.clone(),
            original.color.clone(),
        ));
    }

    fragments
}

/// Union of two same-colored ranges that overlap or touch, under a fresh id
pub fn merge(
    order: &dyn PositionOrder,
    a: &LogicalRange,
    b: &LogicalRange,
    ids: &mut dyn IdGenerator,
) -> Option<LogicalRange> {
    if a.color != b.color {
        return None;
    }
    if !intersects(order, a, b) {
        return None;
    }

    let (a_start, a_end) = a.bounds(order);
    let (b_start, b_end) = b.bounds(order);

    Some(LogicalRange::new(
        ids.next_id(),
        earliest(order, a_start, b_start).clone(),
        latest(order, a_end, b_end).clone(),
        a.color.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::ids::{RangeId, SequentialIdGenerator};
    use crate::highlight::position::LogicalPosition;
    use crate::highlight::range::{HighlightColor, Region};
    use crate::tests::{SyntheticOrder, pos, range, spans};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn region(start: usize, end: usize) -> Region {
        Region {
            start: pos(start),
            end: pos(end),
        }
    }

    #[rstest]
    #[case((0, 10), (5, 15), true)]
    #[case((0, 10), (10, 15), true)] // touching counts
    #[case((10, 15), (0, 10), true)]
    #[case((0, 10), (11, 15), false)]
    #[case((3, 4), (0, 10), true)]
    #[case((0, 10), (3, 4), true)]
    fn test_intersects(
        #[case] a: (usize, usize),
        #[case] b: (usize, usize),
        #[case] expected: bool,
    ) {
        let order = SyntheticOrder::new();
        let a = range("a", a.0, a.1, HighlightColor::YELLOW);
        let b = range("b", b.0, b.1, HighlightColor::BLUE);
        assert_eq!(intersects(&order, &a, &b), expected);
        assert_eq!(intersects(&order, &b, &a), expected);
    }

    #[rstest]
    #[case((0, 10), (0, 10), true)]
    #[case((0, 10), (2, 5), true)]
    #[case((0, 10), (0, 11), false)]
    #[case((2, 5), (0, 10), false)]
    #[case((0, 10), (8, 15), false)]
    fn test_contains(
        #[case] outer: (usize, usize),
        #[case] inner: (usize, usize),
        #[case] expected: bool,
    ) {
        let order = SyntheticOrder::new();
        let outer = region(outer.0, outer.1);
        let inner = range("in", inner.0, inner.1, HighlightColor::YELLOW);
        assert_eq!(contains(&order, &outer, &inner), expected);
    }

    #[test]
    fn test_reversed_operands_are_normalized() {
        let order = SyntheticOrder::new();
        let reversed = Region {
            start: pos(10),
            end: pos(0),
        };
        let inner = range("in", 2, 5, HighlightColor::YELLOW);

        assert!(contains(&order, &reversed, &inner));
        assert!(intersects(&order, &inner, &reversed));
    }

    #[test]
    fn test_incomparable_never_intersects_or_contains() {
        let order = SyntheticOrder::new();
        let stale = LogicalRange::new(
            RangeId::from("stale"),
            LogicalPosition::new("gone", 0),
            LogicalPosition::new("gone", 10),
            HighlightColor::YELLOW,
        );
        let live = region(0, 100);

        assert!(!intersects(&order, &stale, &live));
        assert!(!contains(&order, &live, &stale));
    }

    fn across(start: (&str, usize), end: (&str, usize)) -> Region {
        Region {
            start: LogicalPosition::new(start.0, start.1),
            end: LogicalPosition::new(end.0, end.1),
        }
    }

    #[rstest]
    #[case::spans_into_next_node((("a", 5), ("b", 3)), (("a", 8), ("a", 10)), true, true)]
    #[case::ends_where_next_node_starts((("a", 0), ("b", 0)), (("b", 0), ("b", 2)), true, false)]
    #[case::separate_nodes((("a", 0), ("a", 4)), (("b", 0), ("b", 2)), false, false)]
    #[case::later_node_offsets_rank_higher((("a", 50), ("b", 1)), (("b", 0), ("b", 1)), true, true)]
    #[case::one_end_on_stale_node((("a", 0), ("gone", 3)), (("a", 1), ("a", 2)), false, false)]
    #[case::fully_stale_inner((("a", 0), ("b", 9)), (("gone", 1), ("gone", 2)), false, false)]
    fn test_cross_node_ordering(
        #[case] outer: ((&str, usize), (&str, usize)),
        #[case] inner: ((&str, usize), (&str, usize)),
        #[case] expected_intersects: bool,
        #[case] expected_contains: bool,
    ) {
        let order = SyntheticOrder::with_nodes(&["a", "b"]);
        let outer = across(outer.0, outer.1);
        let inner = across(inner.0, inner.1);

        assert_eq!(intersects(&order, &outer, &inner), expected_intersects);
        assert_eq!(intersects(&order, &inner, &outer), expected_intersects);
        assert_eq!(contains(&order, &outer, &inner), expected_contains);
    }

    #[rstest]
    #[case::cut_in_middle((0, 10), (4, 6), vec![(0, 4), (6, 10)])]
    #[case::cut_at_start((0, 10), (0, 3), vec![(3, 10)])]
    #[case::cut_overlapping_start((5, 10), (0, 7), vec![(7, 10)])]
    #[case::cut_overlapping_end((0, 10), (8, 15), vec![(0, 8)])]
    #[case::cut_covers_all((2, 5), (0, 10), vec![])]
    #[case::cut_exactly_equal((0, 10), (0, 10), vec![])]
    #[case::cut_touching_end((0, 10), (10, 15), vec![(0, 10)])]
    #[case::disjoint((0, 5), (8, 10), vec![(0, 5)])]
    fn test_split(
        #[case] original: (usize, usize),
        #[case] cut: (usize, usize),
        #[case] expected: Vec<(usize, usize)>,
    ) {
        let order = SyntheticOrder::new();
        let mut ids = SequentialIdGenerator::new("f");
        let original = range("orig", original.0, original.1, HighlightColor::GREEN);

        let fragments = split(&order, &original, &region(cut.0, cut.1), &mut ids);

        assert_eq!(spans(&fragments), expected);
        for fragment in &fragments {
            assert_eq!(fragment.color, HighlightColor::GREEN);
            assert_ne!(fragment.id, original.id);
            assert!(!fragment.is_collapsed());
        }
    }

    #[test]
    fn test_split_fragments_get_distinct_fresh_ids() {
        let order = SyntheticOrder::new();
        let mut ids = SequentialIdGenerator::new("f");
        let original = range("orig", 0, 10, HighlightColor::YELLOW);

        let fragments = split(&order, &original, &region(4, 6), &mut ids);

        let ids: Vec<&str> = fragments.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["f1", "f2"]);
    }

    #[rstest]
    #[case::overlapping((0, 10), (8, 15), Some((0, 15)))]
    #[case::touching((0, 10), (10, 15), Some((0, 15)))]
    #[case::contained((0, 10), (2, 4), Some((0, 10)))]
    #[case::reverse_argument_order((8, 15), (0, 10), Some((0, 15)))]
    #[case::gap((0, 10), (11, 15), None)]
    fn test_merge_same_color(
        #[case] a: (usize, usize),
        #[case] b: (usize, usize),
        #[case] expected: Option<(usize, usize)>,
    ) {
        let order = SyntheticOrder::new();
        let mut ids = SequentialIdGenerator::new("m");
        let a = range("a", a.0, a.1, HighlightColor::YELLOW);
        let b = range("b", b.0, b.1, HighlightColor::YELLOW);

        let merged = merge(&order, &a, &b, &mut ids);

        assert_eq!(
            merged.as_ref().map(|m| (m.start.offset, m.end.offset)),
            expected
        );
        if let Some(merged) = merged {
            assert_eq!(merged.id, RangeId::from("m1"));
            assert_eq!(merged.color, HighlightColor::YELLOW);
        }
    }

    #[test]
    fn test_merge_different_colors_is_none() {
        let order = SyntheticOrder::new();
        let mut ids = SequentialIdGenerator::new("m");
        let a = range("a", 0, 10, HighlightColor::YELLOW);
        let b = range("b", 5, 15, HighlightColor::BLUE);

        assert_eq!(merge(&order, &a, &b, &mut ids), None);
        assert_eq!(ids.issued(), 0);
    }

    #[test]
    fn test_merge_color_tags_match_exactly() {
        let order = SyntheticOrder::new();
        let mut ids = SequentialIdGenerator::new("m");
        let a = range("a", 0, 10, HighlightColor::from("yellow"));
        let b = range("b", 5, 15, HighlightColor::from("YELLOW"));

        assert_eq!(merge(&order, &a, &b, &mut ids), None);
    }
}
