//! Add/remove entry points over a whole document's highlights.
//!
//! Both operations compute the full change against a read of the store and
//! only then commit it (`remove_by_ids` followed by `add`), so callers never
//! observe a half-applied reconciliation. A missing document is an empty
//! one, and collapsed selections are no-ops.

use std::collections::HashSet;

use crate::highlight::algebra::{contains, intersects, merge, split};
use crate::highlight::ids::{DocumentId, IdGenerator, RangeId};
use crate::highlight::patch::HighlightPatch;
use crate::highlight::position::PositionOrder;
use crate::highlight::range::{HighlightColor, LogicalRange, Selection};
use crate::highlight::store::HighlightStore;

/// Highlight `selection` in `color`.
///
/// Same-colored ranges that overlap or touch the selection are absorbed
/// into one merged range. Differently-colored ranges that intersect the
/// result are cut back around it, so the newer color wins.
pub fn add_highlight(
    store: &mut HighlightStore,
    document: &DocumentId,
    order: &dyn PositionOrder,
    selection: &Selection,
    color: HighlightColor,
    ids: &mut dyn IdGenerator,
) -> HighlightPatch {
    let Some(region) = selection.to_region(order) else {
        log::debug!("add_highlight on {document}: collapsed selection, nothing to do");
        return HighlightPatch::unchanged(document.clone(), store.version(document));
    };

    let mut candidate = LogicalRange::from_region(ids.next_id(), region, color);
    let existing = store.get(document);
    let mut consumed: HashSet<RangeId> = HashSet::new();

    // Absorbing one range can make the candidate reach another, so repeat
    // until a full pass merges nothing.
    loop {
        let mut absorbed = false;
        for range in existing {
            if range.color != candidate.color || consumed.contains(&range.id) {
                continue;
            }
            if let Some(merged) = merge(order, range, &candidate, ids) {
                log::debug!("merging {range} into {merged}");
                consumed.insert(range.id.clone());
                candidate = merged;
                absorbed = true;
            }
        }
        if !absorbed {
            break;
        }
    }

    let mut fragments = Vec::new();
    for range in existing {
        if range.color == candidate.color || consumed.contains(&range.id) {
            continue;
        }
        if intersects(order, range, &candidate) {
            let pieces = split(order, range, &candidate, ids);
            log::debug!(
                "{} overrides {range}, leaving {} fragment(s)",
                candidate.color,
                pieces.len()
            );
            consumed.insert(range.id.clone());
            fragments.extend(pieces);
        }
    }

    let removed = ordered_ids(existing, &consumed);
    commit(store, document, &consumed, removed, Some(candidate), fragments)
}

/// Clear highlighting over `selection`, whatever its color.
///
/// Ranges inside the selection are deleted; ranges that partially overlap
/// it are trimmed to the parts outside. `reference_color` is advisory and
/// never matched against stored ranges.
pub fn remove_highlight(
    store: &mut HighlightStore,
    document: &DocumentId,
    order: &dyn PositionOrder,
    selection: &Selection,
    reference_color: Option<&HighlightColor>,
    ids: &mut dyn IdGenerator,
) -> HighlightPatch {
    let Some(region) = selection.to_region(order) else {
        log::debug!("remove_highlight on {document}: collapsed selection, nothing to do");
        return HighlightPatch::unchanged(document.clone(), store.version(document));
    };

    if let Some(color) = reference_color {
        log::debug!("remove_highlight on {document} requested from a {color} highlight");
    }

    let existing = store.get(document);
    let mut consumed: HashSet<RangeId> = HashSet::new();
    let mut fragments = Vec::new();

    for range in existing {
        if contains(order, &region, range) {
            log::debug!("removing {range}");
            consumed.insert(range.id.clone());
        } else if intersects(order, range, &region) {
            let pieces = split(order, range, &region, ids);
            log::debug!("trimming {range} into {} fragment(s)", pieces.len());
            consumed.insert(range.id.clone());
            fragments.extend(pieces);
        }
    }

    if consumed.is_empty() {
        return HighlightPatch::unchanged(document.clone(), store.version(document));
    }

    let removed = ordered_ids(existing, &consumed);
    commit(store, document, &consumed, removed, None, fragments)
}

/// Ids of `consumed` ranges in store order, for a deterministic patch
fn ordered_ids(existing: &[LogicalRange], consumed: &HashSet<RangeId>) -> Vec<RangeId> {
    existing
        .iter()
        .filter(|range| consumed.contains(&range.id))
        .map(|range| range.id.clone())
        .collect()
}

fn commit(
    store: &mut HighlightStore,
    document: &DocumentId,
    consumed: &HashSet<RangeId>,
    removed: Vec<RangeId>,
    candidate: Option<LogicalRange>,
    fragments: Vec<LogicalRange>,
) -> HighlightPatch {
    store.remove_by_ids(document, consumed);

    let mut added = Vec::with_capacity(fragments.len() + 1);
    for range in candidate.into_iter().chain(fragments) {
        let id = range.id.clone();
        if store.add(document, range) {
            added.push(id);
        }
    }

    let version = store.advance_version(document);
    HighlightPatch {
        document: document.clone(),
        removed,
        added,
        version,
    }
}
