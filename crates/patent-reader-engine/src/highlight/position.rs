use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one addressable content unit (paragraph, claim, heading) in a document
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A character position inside one content node
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicalPosition {
    pub node_id: NodeId,
    /// Character offset within the node's text
    pub offset: usize,
}

impl LogicalPosition {
    pub fn new(node_id: impl Into<NodeId>, offset: usize) -> Self {
        Self {
            node_id: node_id.into(),
            offset,
        }
    }
}

impl fmt::Display for LogicalPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.node_id, self.offset)
    }
}

/// Document order over logical positions, provided by the live document.
///
/// Node identifiers alone carry no order, so the highlight core never
/// compares positions itself. Implementations return `None` when either
/// position cannot be resolved against the current document structure
/// (for example, its node was deleted).
pub trait PositionOrder {
    fn compare_positions(&self, a: &LogicalPosition, b: &LogicalPosition) -> Option<Ordering>;
}

impl<T: PositionOrder + ?Sized> PositionOrder for &T {
    fn compare_positions(&self, a: &LogicalPosition, b: &LogicalPosition) -> Option<Ordering> {
        (**self).compare_positions(a, b)
    }
}

/// Compare two positions in document order.
///
/// Identical positions are equal without consulting the document. `None`
/// means incomparable; callers treat that as "does not intersect".
pub fn compare(
    order: &dyn PositionOrder,
    a: &LogicalPosition,
    b: &LogicalPosition,
) -> Option<Ordering> {
    if a == b {
        return Some(Ordering::Equal);
    }

    let result = order.compare_positions(a, b);
    if result.is_none() {
        log::debug!("positions {a} and {b} are incomparable in the current document");
    }
    result
}

/// `a <= b`, false when incomparable
pub fn at_or_before(order: &dyn PositionOrder, a: &LogicalPosition, b: &LogicalPosition) -> bool {
    matches!(compare(order, a, b), Some(Ordering::Less | Ordering::Equal))
}

/// `a >= b`, false when incomparable
pub fn at_or_after(order: &dyn PositionOrder, a: &LogicalPosition, b: &LogicalPosition) -> bool {
    matches!(compare(order, a, b), Some(Ordering::Greater | Ordering::Equal))
}

/// `a < b`, false when incomparable
pub fn strictly_before(order: &dyn PositionOrder, a: &LogicalPosition, b: &LogicalPosition) -> bool {
    compare(order, a, b) == Some(Ordering::Less)
}

/// The earlier of two positions; `a` when they are equal or incomparable
pub fn earliest<'a>(
    order: &dyn PositionOrder,
    a: &'a LogicalPosition,
    b: &'a LogicalPosition,
) -> &'a LogicalPosition {
    if compare(order, a, b) == Some(Ordering::Greater) {
        b
    } else {
        a
    }
}

/// The later of two positions; `a` when they are equal or incomparable
pub fn latest<'a>(
    order: &dyn PositionOrder,
    a: &'a LogicalPosition,
    b: &'a LogicalPosition,
) -> &'a LogicalPosition {
    if compare(order, a, b) == Some(Ordering::Less) {
        b
    } else {
        a
    }
}
