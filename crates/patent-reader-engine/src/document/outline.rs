use std::cmp::Ordering;
use std::collections::HashMap;

use crate::highlight::overlay::{Rect, RectResolver};
use crate::highlight::position::{LogicalPosition, NodeId, PositionOrder};
use crate::highlight::range::{LogicalRange, Spanned};

#[derive(Debug, thiserror::Error)]
pub enum OutlineError {
    #[error("Document is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("Duplicate node id: {0}")]
    DuplicateNode(NodeId),
}

#[derive(Debug, Clone, PartialEq)]
struct OutlineNode {
    id: NodeId,
    text: String,
    /// Length in characters, which is what offsets count
    char_len: usize,
}

/// A document as an ordered list of content nodes (paragraphs, claims).
///
/// This is the reference document collaborator: it orders positions by
/// node index then offset, and lays text out on a monospace grid to
/// resolve overlay rectangles.
#[derive(Debug, Clone, Default)]
pub struct OutlineDocument {
    nodes: Vec<OutlineNode>,
    index: HashMap<NodeId, usize>,
}

impl OutlineDocument {
    /// Split text into blank-line separated paragraphs named `p0`, `p1`, ...
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, OutlineError> {
        let text = std::str::from_utf8(bytes)?;
        let paragraphs = text
            .replace("\r\n", "\n")
            .split("\n\n")
            .map(str::trim)
            .filter(|paragraph| !paragraph.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();

        Self::from_nodes(
            paragraphs
                .into_iter()
                .enumerate()
                .map(|(i, text)| (NodeId::new(format!("p{i}")), text)),
        )
    }

    /// Build from explicit `(id, text)` pairs in document order
    pub fn from_nodes(
        nodes: impl IntoIterator<Item = (NodeId, String)>,
    ) -> Result<Self, OutlineError> {
        let mut document = Self::default();
        for (id, text) in nodes {
            if document.index.contains_key(&id) {
                return Err(OutlineError::DuplicateNode(id));
            }
            document.index.insert(id.clone(), document.nodes.len());
            let char_len = text.chars().count();
            document.nodes.push(OutlineNode { id, text, char_len });
        }
        Ok(document)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in document order
    pub fn nodes(&self) -> impl Iterator<Item = (&NodeId, &str)> {
        self.nodes.iter().map(|node| (&node.id, node.text.as_str()))
    }

    pub fn node_text(&self, id: &NodeId) -> Option<&str> {
        self.node(id).map(|node| node.text.as_str())
    }

    /// Total length in characters across all nodes
    pub fn char_len(&self) -> usize {
        self.nodes.iter().map(|node| node.char_len).sum()
    }

    /// Map a document-wide character offset to a position.
    ///
    /// An offset on a node boundary maps to the start of the later node;
    /// the very end of the document maps to the end of the last node.
    pub fn position_at(&self, global_offset: usize) -> Option<LogicalPosition> {
        let mut node_start = 0;
        for node in &self.nodes {
            if global_offset < node_start + node.char_len {
                return Some(LogicalPosition::new(
                    node.id.clone(),
                    global_offset - node_start,
                ));
            }
            node_start += node.char_len;
        }

        let last = self.nodes.last()?;
        (global_offset == node_start)
            .then(|| LogicalPosition::new(last.id.clone(), last.char_len))
    }

    /// Parse `node:offset`, or a plain document-wide offset
    pub fn parse_position(&self, input: &str) -> Option<LogicalPosition> {
        let input = input.trim();
        if let Some((node, offset)) = input.rsplit_once(':') {
            let node = NodeId::from(node);
            let offset: usize = offset.parse().ok()?;
            let len = self.node(&node)?.char_len;
            return (offset <= len).then(|| LogicalPosition::new(node, offset));
        }
        self.position_at(input.parse().ok()?)
    }

    /// Clamp a position's offset to its node's length; `None` for unknown nodes
    pub fn clamp(&self, position: &LogicalPosition) -> Option<LogicalPosition> {
        let node = self.node(&position.node_id)?;
        Some(LogicalPosition::new(
            node.id.clone(),
            position.offset.min(node.char_len),
        ))
    }

    /// Text covered by a span, joining nodes with a blank line
    pub fn text_of(&self, span: &impl Spanned) -> Option<String> {
        let (start, end) = span.bounds(self);
        let start_index = *self.index.get(&start.node_id)?;
        let end_index = *self.index.get(&end.node_id)?;
        if start_index > end_index {
            return None;
        }

        let pieces: Vec<String> = (start_index..=end_index)
            .map(|i| {
                let node = &self.nodes[i];
                let from = if i == start_index { start.offset } else { 0 };
                let to = if i == end_index { end.offset } else { node.char_len };
                node.text
                    .chars()
                    .skip(from)
                    .take(to.saturating_sub(from))
                    .collect()
            })
            .collect();
        Some(pieces.join("\n\n"))
    }

    /// Lay the document out on a monospace grid
    pub fn layout(&self, metrics: OverlayMetrics) -> OutlineLayout<'_> {
        OutlineLayout {
            document: self,
            metrics,
        }
    }

    fn node(&self, id: &NodeId) -> Option<&OutlineNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }
}

impl PositionOrder for OutlineDocument {
    fn compare_positions(&self, a: &LogicalPosition, b: &LogicalPosition) -> Option<Ordering> {
        let a_index = self.index.get(&a.node_id)?;
        let b_index = self.index.get(&b.node_id)?;
        Some((a_index, a.offset).cmp(&(b_index, b.offset)))
    }
}

/// Grid metrics for the monospace reference layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayMetrics {
    pub line_height: f32,
    pub char_width: f32,
    /// Characters per visual line; zero disables wrapping
    pub wrap_column: usize,
}

impl Default for OverlayMetrics {
    fn default() -> Self {
        Self {
            line_height: 20.0,
            char_width: 8.0,
            wrap_column: 80,
        }
    }
}

/// An [`OutlineDocument`] laid out with fixed metrics.
///
/// Every node starts on a fresh line and wraps at `wrap_column`.
#[derive(Debug, Clone, Copy)]
pub struct OutlineLayout<'a> {
    document: &'a OutlineDocument,
    metrics: OverlayMetrics,
}

impl OutlineLayout<'_> {
    fn rows_for(&self, char_len: usize) -> usize {
        match self.metrics.wrap_column {
            0 => 1,
            wrap => char_len.div_ceil(wrap).max(1),
        }
    }

    /// First visual row of each node
    fn row_starts(&self) -> Vec<usize> {
        let mut row = 0;
        self.document
            .nodes
            .iter()
            .map(|node| {
                let start = row;
                row += self.rows_for(node.char_len);
                start
            })
            .collect()
    }

    fn rect(&self, row: usize, from_col: usize, to_col: usize) -> Rect {
        Rect {
            top: row as f32 * self.metrics.line_height,
            left: from_col as f32 * self.metrics.char_width,
            width: (to_col - from_col) as f32 * self.metrics.char_width,
            height: self.metrics.line_height,
        }
    }

    /// Rectangles for characters `[from, to)` of the node starting at `first_row`
    fn node_rects(&self, first_row: usize, from: usize, to: usize, rects: &mut Vec<Rect>) {
        if from >= to {
            return;
        }
        let wrap = match self.metrics.wrap_column {
            0 => usize::MAX,
            wrap => wrap,
        };

        let mut offset = from;
        while offset < to {
            let row = offset / wrap;
            let row_end = ((row + 1).saturating_mul(wrap)).min(to);
            rects.push(self.rect(first_row + row, offset % wrap, offset % wrap + (row_end - offset)));
            offset = row_end;
        }
    }
}

impl RectResolver for OutlineLayout<'_> {
    fn resolve_range_to_rects(&self, range: &LogicalRange) -> Vec<Rect> {
        let document = self.document;
        let (start, end) = range.bounds(document);
        let (Some(&start_index), Some(&end_index)) = (
            document.index.get(&start.node_id),
            document.index.get(&end.node_id),
        ) else {
            return Vec::new();
        };

        let row_starts = self.row_starts();
        let mut rects = Vec::new();
        for i in start_index..=end_index {
            let node = &document.nodes[i];
            let from = if i == start_index { start.offset } else { 0 };
            let to = if i == end_index { end.offset } else { node.char_len };
            self.node_rects(
                row_starts[i],
                from.min(node.char_len),
                to.min(node.char_len),
                &mut rects,
            );
        }
        rects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::{HighlightColor, RangeId};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const CLAIMS: &str = "1. A widget comprising a frame.\n\n2. The widget of claim 1, wherein the frame is steel.\n";

    fn doc() -> OutlineDocument {
        OutlineDocument::from_bytes(CLAIMS.as_bytes()).unwrap()
    }

    fn at(node: &str, offset: usize) -> LogicalPosition {
        LogicalPosition::new(node, offset)
    }

    fn span(start: LogicalPosition, end: LogicalPosition) -> LogicalRange {
        LogicalRange::new(RangeId::from("r"), start, end, HighlightColor::YELLOW)
    }

    #[test]
    fn test_from_bytes_splits_paragraphs() {
        let doc = doc();
        let ids: Vec<&str> = doc.nodes().map(|(id, _)| id.as_str()).collect();

        assert_eq!(ids, vec!["p0", "p1"]);
        assert_eq!(
            doc.node_text(&NodeId::from("p0")),
            Some("1. A widget comprising a frame.")
        );
    }

    #[test]
    fn test_from_bytes_handles_crlf_and_extra_blank_lines() {
        let doc = OutlineDocument::from_bytes(b"first\r\n\r\n\r\n\r\nsecond").unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.node_text(&NodeId::from("p1")), Some("second"));
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let result = OutlineDocument::from_bytes(&[0xff, 0xfe]);
        assert!(matches!(result, Err(OutlineError::InvalidUtf8(_))));
    }

    #[test]
    fn test_duplicate_node_ids_are_rejected() {
        let result = OutlineDocument::from_nodes([
            (NodeId::from("claim-1"), "a".to_string()),
            (NodeId::from("claim-1"), "b".to_string()),
        ]);
        assert!(matches!(result, Err(OutlineError::DuplicateNode(_))));
    }

    #[rstest]
    #[case(at("p0", 3), at("p0", 9), Some(Ordering::Less))]
    #[case(at("p1", 0), at("p0", 20), Some(Ordering::Greater))]
    #[case(at("p1", 4), at("p1", 4), Some(Ordering::Equal))]
    #[case(at("p9", 0), at("p0", 0), None)]
    fn test_position_order(
        #[case] a: LogicalPosition,
        #[case] b: LogicalPosition,
        #[case] expected: Option<Ordering>,
    ) {
        assert_eq!(doc().compare_positions(&a, &b), expected);
    }

    #[test]
    fn test_position_at_global_offsets() {
        let doc = doc();
        let first_len = "1. A widget comprising a frame.".chars().count();

        assert_eq!(doc.position_at(0), Some(at("p0", 0)));
        assert_eq!(doc.position_at(first_len), Some(at("p1", 0)));
        assert_eq!(
            doc.position_at(doc.char_len()),
            Some(at("p1", doc.char_len() - first_len))
        );
        assert_eq!(doc.position_at(doc.char_len() + 1), None);
    }

    #[test]
    fn test_parse_position() {
        let doc = doc();

        assert_eq!(doc.parse_position("p1:4"), Some(at("p1", 4)));
        assert_eq!(doc.parse_position(" 5 "), Some(at("p0", 5)));
        assert_eq!(doc.parse_position("p7:1"), None);
        assert_eq!(doc.parse_position("p0:999"), None);
        assert_eq!(doc.parse_position("nonsense"), None);
    }

    #[test]
    fn test_clamp() {
        let doc = doc();
        assert_eq!(doc.clamp(&at("p0", 500)), Some(at("p0", 31)));
        assert_eq!(doc.clamp(&at("p0", 3)), Some(at("p0", 3)));
        assert_eq!(doc.clamp(&at("gone", 3)), None);
    }

    #[test]
    fn test_text_of_within_and_across_nodes() {
        let doc = doc();

        assert_eq!(
            doc.text_of(&span(at("p0", 5), at("p0", 11))),
            Some("widget".to_string())
        );
        assert_eq!(
            doc.text_of(&span(at("p0", 25), at("p1", 2))),
            Some("frame.\n\n2.".to_string())
        );
        assert_eq!(doc.text_of(&span(at("gone", 0), at("p0", 2))), None);
    }

    #[test]
    fn test_rects_single_line() {
        let doc = doc();
        let layout = doc.layout(OverlayMetrics::default());

        let rects = layout.resolve_range_to_rects(&span(at("p0", 5), at("p0", 11)));

        assert_eq!(
            rects,
            vec![Rect {
                top: 0.0,
                left: 40.0,
                width: 48.0,
                height: 20.0
            }]
        );
    }

    #[test]
    fn test_rects_wrap_and_cross_nodes() {
        let doc = OutlineDocument::from_bytes(b"abcdefghij\n\nklmno").unwrap();
        let layout = doc.layout(OverlayMetrics {
            line_height: 10.0,
            char_width: 1.0,
            wrap_column: 4,
        });

        // p0 occupies rows 0..3 ("abcd", "efgh", "ij"), p1 starts on row 3
        let rects = layout.resolve_range_to_rects(&span(at("p0", 2), at("p1", 2)));

        let boxes: Vec<(f32, f32, f32)> = rects.iter().map(|r| (r.top, r.left, r.width)).collect();
        assert_eq!(
            boxes,
            vec![
                (0.0, 2.0, 2.0),
                (10.0, 0.0, 4.0),
                (20.0, 0.0, 2.0),
                (30.0, 0.0, 2.0),
            ]
        );
    }

    #[test]
    fn test_rects_for_unknown_node_are_empty() {
        let doc = doc();
        let layout = doc.layout(OverlayMetrics::default());

        assert!(
            layout
                .resolve_range_to_rects(&span(at("gone", 0), at("p0", 3)))
                .is_empty()
        );
    }
}
