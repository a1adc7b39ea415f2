use std::cmp::Ordering;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::highlight::{HighlightColor, LogicalPosition, LogicalRange, PositionOrder, RangeId};

/// Node used by [`pos`]
pub const NODE: &str = "n";

/// Mock document order: known nodes in sequence, offsets within a node.
/// Positions on any other node are incomparable.
pub struct SyntheticOrder {
    nodes: Vec<String>,
}

impl SyntheticOrder {
    pub fn new() -> Self {
        Self::with_nodes(&[NODE])
    }

    pub fn with_nodes(nodes: &[&str]) -> Self {
        Self {
            nodes: nodes.iter().map(|node| node.to_string()).collect(),
        }
    }

    fn index(&self, position: &LogicalPosition) -> Option<usize> {
        self.nodes
            .iter()
            .position(|node| node == position.node_id.as_str())
    }
}

impl PositionOrder for SyntheticOrder {
    fn compare_positions(&self, a: &LogicalPosition, b: &LogicalPosition) -> Option<Ordering> {
        let a_index = self.index(a)?;
        let b_index = self.index(b)?;
        Some((a_index, a.offset).cmp(&(b_index, b.offset)))
    }
}

/// Position at `offset` on the default synthetic node
pub fn pos(offset: usize) -> LogicalPosition {
    LogicalPosition::new(NODE, offset)
}

/// Range on the default synthetic node
pub fn range(id: &str, start: usize, end: usize, color: HighlightColor) -> LogicalRange {
    LogicalRange::new(RangeId::from(id), pos(start), pos(end), color)
}

/// `(start, end)` offsets sorted by start
pub fn spans(ranges: &[LogicalRange]) -> Vec<(usize, usize)> {
    let mut spans: Vec<_> = ranges
        .iter()
        .map(|range| (range.start.offset, range.end.offset))
        .collect();
    spans.sort();
    spans
}

/// `(start, end, color)` sorted by start
pub fn colored_spans(ranges: &[LogicalRange]) -> Vec<(usize, usize, &str)> {
    let mut spans: Vec<_> = ranges
        .iter()
        .map(|range| (range.start.offset, range.end.offset, range.color.as_str()))
        .collect();
    spans.sort();
    spans
}

/// Create a temporary patents directory
pub fn create_test_patents_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a test document file with content
pub fn create_test_file(patents_dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = patents_dir.path().join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&file_path, content).unwrap();
    file_path
}
