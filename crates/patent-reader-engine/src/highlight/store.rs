use std::collections::{HashMap, HashSet};

use crate::highlight::algebra::contains;
use crate::highlight::ids::{DocumentId, RangeId};
use crate::highlight::position::{LogicalPosition, PositionOrder};
use crate::highlight::range::{LogicalRange, Region};

/// Per-document collection of highlight ranges.
///
/// A keyed collection with id-uniqueness enforcement and nothing else: no
/// operation here performs range algebra. Insertion order carries no
/// meaning. A document whose sequence becomes empty is dropped entirely,
/// so `contains_document` is false for a document with no highlights.
#[derive(Debug, Default, Clone)]
pub struct HighlightStore {
    documents: HashMap<DocumentId, Vec<LogicalRange>>,
    /// Commit counter per document; survives the entry being dropped
    versions: HashMap<DocumentId, u64>,
}

impl HighlightStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a range unless it is collapsed or its id is already stored.
    ///
    /// Returns true if the range was inserted.
    pub fn add(&mut self, document: &DocumentId, range: LogicalRange) -> bool {
        if range.is_collapsed() {
            log::warn!("refusing collapsed highlight {range} in {document}");
            return false;
        }
        let ranges = self.documents.entry(document.clone()).or_default();
        if ranges.iter().any(|existing| existing.id == range.id) {
            return false;
        }
        ranges.push(range);
        true
    }

    /// Remove every range whose id is in `ids`, dropping the document's entry
    /// once it is empty. Returns the number of ranges removed.
    pub fn remove_by_ids(&mut self, document: &DocumentId, ids: &HashSet<RangeId>) -> usize {
        let Some(ranges) = self.documents.get_mut(document) else {
            return 0;
        };

        let before = ranges.len();
        ranges.retain(|range| !ids.contains(&range.id));
        let removed = before - ranges.len();

        if ranges.is_empty() {
            self.documents.remove(document);
        }
        removed
    }

    /// Overwrite a document's sequence, as done when hydrating from persisted state.
    ///
    /// Duplicate ids keep their first occurrence and collapsed ranges are
    /// dropped, since neither may ever be stored.
    pub fn replace_all(&mut self, document: &DocumentId, ranges: Vec<LogicalRange>) {
        let mut seen = HashSet::new();
        let mut accepted = Vec::with_capacity(ranges.len());

        for range in ranges {
            if range.is_collapsed() {
                log::warn!("dropping collapsed highlight {range} in {document}");
                continue;
            }
            if !seen.insert(range.id.clone()) {
                log::warn!("dropping duplicate highlight id {} in {document}", range.id);
                continue;
            }
            accepted.push(range);
        }

        if accepted.is_empty() {
            self.documents.remove(document);
        } else {
            self.documents.insert(document.clone(), accepted);
        }
    }

    /// Current ranges for a document; empty if it has none
    pub fn get(&self, document: &DocumentId) -> &[LogicalRange] {
        self.documents
            .get(document)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Look up one range by id
    pub fn find(&self, document: &DocumentId, id: &RangeId) -> Option<&LogicalRange> {
        self.get(document).iter().find(|range| &range.id == id)
    }

    /// Ranges whose closed interval covers `position`
    pub fn highlights_at(
        &self,
        document: &DocumentId,
        order: &dyn PositionOrder,
        position: &LogicalPosition,
    ) -> Vec<&LogicalRange> {
        let point = Region {
            start: position.clone(),
            end: position.clone(),
        };
        self.get(document)
            .iter()
            .filter(|range| contains(order, *range, &point))
            .collect()
    }

    /// Whether the document currently has an entry
    pub fn contains_document(&self, document: &DocumentId) -> bool {
        self.documents.contains_key(document)
    }

    /// Documents that currently hold at least one range
    pub fn documents(&self) -> impl Iterator<Item = &DocumentId> {
        self.documents.keys()
    }

    /// Forget everything about a document (its tab was closed)
    pub fn discard(&mut self, document: &DocumentId) {
        self.documents.remove(document);
        self.versions.remove(document);
    }

    /// Number of committed changes for a document
    pub fn version(&self, document: &DocumentId) -> u64 {
        self.versions.get(document).copied().unwrap_or(0)
    }

    pub(crate) fn advance_version(&mut self, document: &DocumentId) -> u64 {
        let version = self.versions.entry(document.clone()).or_insert(0);
        *version += 1;
        *version
    }
}
