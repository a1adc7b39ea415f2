use serde::Serialize;

use crate::highlight::ids::{DocumentId, RangeId};
use crate::highlight::range::{HighlightColor, LogicalRange};
use crate::highlight::store::HighlightStore;

/// Visual rectangle in the reading pane's coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

/// Maps a logical range back to the rectangles it occupies on screen.
///
/// Ranges that cannot be resolved produce no rectangles.
pub trait RectResolver {
    fn resolve_range_to_rects(&self, range: &LogicalRange) -> Vec<Rect>;
}

/// Everything the UI needs to paint one highlight
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightOverlay {
    pub range_id: RangeId,
    pub color: HighlightColor,
    pub rects: Vec<Rect>,
}

/// Overlay geometry for a document's highlights, in visual order (top, then left).
///
/// Read-only and idempotent: safe to re-run after every layout change.
pub fn overlay_rects(
    store: &HighlightStore,
    document: &DocumentId,
    resolver: &dyn RectResolver,
) -> Vec<HighlightOverlay> {
    let mut overlays: Vec<HighlightOverlay> = store
        .get(document)
        .iter()
        .filter_map(|range| {
            let rects = resolver.resolve_range_to_rects(range);
            if rects.is_empty() {
                log::debug!("highlight {} has no visible geometry", range.id);
                return None;
            }
            Some(HighlightOverlay {
                range_id: range.id.clone(),
                color: range.color.clone(),
                rects,
            })
        })
        .collect();

    overlays.sort_by(|a, b| {
        let (a, b) = (a.rects[0], b.rects[0]);
        a.top.total_cmp(&b.top).then(a.left.total_cmp(&b.left))
    });
    overlays
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::range;
    use pretty_assertions::assert_eq;

    /// One line per 10 offsets, 1 unit per offset
    struct GridResolver;

    impl RectResolver for GridResolver {
        fn resolve_range_to_rects(&self, range: &LogicalRange) -> Vec<Rect> {
            if range.start.node_id.as_str() != crate::tests::NODE {
                return Vec::new();
            }
            let (start, end) = (range.start.offset, range.end.offset);
            vec![Rect {
                top: (start / 10) as f32,
                left: (start % 10) as f32,
                width: (end - start) as f32,
                height: 1.0,
            }]
        }
    }

    #[test]
    fn test_overlays_sorted_by_visual_position() {
        let document = DocumentId::from("US-1");
        let mut store = HighlightStore::new();
        store.add(&document, range("late", 25, 28, HighlightColor::BLUE));
        store.add(&document, range("right", 4, 6, HighlightColor::YELLOW));
        store.add(&document, range("left", 1, 3, HighlightColor::GREEN));

        let overlays = overlay_rects(&store, &document, &GridResolver);

        let order: Vec<&str> = overlays.iter().map(|o| o.range_id.as_str()).collect();
        assert_eq!(order, vec!["left", "right", "late"]);
        assert_eq!(overlays[0].color, HighlightColor::GREEN);
    }

    #[test]
    fn test_unresolvable_ranges_are_skipped() {
        let document = DocumentId::from("US-1");
        let mut store = HighlightStore::new();
        store.add(
            &document,
            LogicalRange::new(
                RangeId::from("stale"),
                crate::highlight::LogicalPosition::new("gone", 0),
                crate::highlight::LogicalPosition::new("gone", 5),
                HighlightColor::YELLOW,
            ),
        );

        assert!(overlay_rects(&store, &document, &GridResolver).is_empty());
    }

    #[test]
    fn test_overlay_is_read_only_and_repeatable() {
        let document = DocumentId::from("US-1");
        let mut store = HighlightStore::new();
        store.add(&document, range("a", 1, 3, HighlightColor::GREEN));
        let before = store.get(&document).to_vec();

        let first = overlay_rects(&store, &document, &GridResolver);
        let second = overlay_rects(&store, &document, &GridResolver);

        assert_eq!(first, second);
        assert_eq!(store.get(&document), before.as_slice());
    }
}
