use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::highlight::ids::RangeId;
use crate::highlight::position::{LogicalPosition, PositionOrder, compare};

/// Highlight color tag.
///
/// Colors compare by exact, case-sensitive tag equality. The palette
/// constants cover the reader's built-in swatches; any other tag is a
/// custom color.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighlightColor(Cow<'static, str>);

impl HighlightColor {
    pub const YELLOW: HighlightColor = HighlightColor(Cow::Borrowed("yellow"));
    pub const GREEN: HighlightColor = HighlightColor(Cow::Borrowed("green"));
    pub const BLUE: HighlightColor = HighlightColor(Cow::Borrowed("blue"));
    pub const PINK: HighlightColor = HighlightColor(Cow::Borrowed("pink"));
    pub const ORANGE: HighlightColor = HighlightColor(Cow::Borrowed("orange"));

    pub const PALETTE: [HighlightColor; 5] = [
        Self::YELLOW,
        Self::GREEN,
        Self::BLUE,
        Self::PINK,
        Self::ORANGE,
    ];

    pub fn new(tag: impl Into<String>) -> Self {
        Self(Cow::Owned(tag.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this tag is one of the built-in swatches
    pub fn is_palette(&self) -> bool {
        Self::PALETTE.contains(self)
    }
}

impl fmt::Display for HighlightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HighlightColor {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for HighlightColor {
    fn from(tag: String) -> Self {
        Self(Cow::Owned(tag))
    }
}

/// Anything with a start and an end position
pub trait Spanned {
    fn start(&self) -> &LogicalPosition;
    fn end(&self) -> &LogicalPosition;

    /// Start and end in document order, swapping a reversed pair
    fn bounds(&self, order: &dyn PositionOrder) -> (&LogicalPosition, &LogicalPosition) {
        if compare(order, self.start(), self.end()) == Some(Ordering::Greater) {
            (self.end(), self.start())
        } else {
            (self.start(), self.end())
        }
    }
}

/// Raw user selection; the anchor may come after the focus
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub anchor: LogicalPosition,
    pub focus: LogicalPosition,
}

impl Selection {
    pub fn new(anchor: LogicalPosition, focus: LogicalPosition) -> Self {
        Self { anchor, focus }
    }

    /// Normalize into an ordered region.
    ///
    /// Returns `None` for collapsed selections and for selections whose
    /// ends cannot be ordered against each other.
    pub fn to_region(&self, order: &dyn PositionOrder) -> Option<Region> {
        match compare(order, &self.anchor, &self.focus) {
            Some(Ordering::Less) | Some(Ordering::Greater) => {
                let (start, end) = normalize(order, &self.anchor, &self.focus);
                Some(Region { start, end })
            }
            Some(Ordering::Equal) => None,
            None => {
                log::warn!(
                    "ignoring selection {} -> {}: ends cannot be ordered",
                    self.anchor,
                    self.focus
                );
                None
            }
        }
    }
}

/// A normalized, non-stored span used as the operand of a reconciliation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub start: LogicalPosition,
    pub end: LogicalPosition,
}

impl Spanned for Region {
    fn start(&self) -> &LogicalPosition {
        &self.start
    }

    fn end(&self) -> &LogicalPosition {
        &self.end
    }
}

/// A stored highlight
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalRange {
    pub id: RangeId,
    pub start: LogicalPosition,
    pub end: LogicalPosition,
    pub color: HighlightColor,
}

impl LogicalRange {
    /// Build a range from already-ordered bounds
    pub fn new(
        id: RangeId,
        start: LogicalPosition,
        end: LogicalPosition,
        color: HighlightColor,
    ) -> Self {
        Self {
            id,
            start,
            end,
            color,
        }
    }

    /// Wrap a region as a new highlight
    pub fn from_region(id: RangeId, region: Region, color: HighlightColor) -> Self {
        Self::new(id, region.start, region.end, color)
    }

    /// Structurally collapsed: both ends are the same position
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

impl Spanned for LogicalRange {
    fn start(&self) -> &LogicalPosition {
        &self.start
    }

    fn end(&self) -> &LogicalPosition {
        &self.end
    }
}

impl fmt::Display for LogicalRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}, {}) {}", self.id, self.start, self.end, self.color)
    }
}

/// Order an anchor/focus pair into `(start, end)`.
///
/// Incomparable pairs keep the order they were given in.
pub fn normalize(
    order: &dyn PositionOrder,
    anchor: &LogicalPosition,
    focus: &LogicalPosition,
) -> (LogicalPosition, LogicalPosition) {
    match compare(order, anchor, focus) {
        Some(Ordering::Greater) => (focus.clone(), anchor.clone()),
        _ => (anchor.clone(), focus.clone()),
    }
}
