use crate::highlight::ids::{DocumentId, RangeId};

/// Result of a reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightPatch {
    pub document: DocumentId,
    /// Ids that left the store, in their previous store order
    pub removed: Vec<RangeId>,
    /// Ids that entered the store, in insertion order
    pub added: Vec<RangeId>,
    /// Store version after the change
    pub version: u64,
}

impl HighlightPatch {
    /// A patch describing no change at the given version
    pub fn unchanged(document: DocumentId, version: u64) -> Self {
        Self {
            document,
            removed: Vec::new(),
            added: Vec::new(),
            version,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}
