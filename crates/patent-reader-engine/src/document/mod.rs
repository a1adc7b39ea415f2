//! Document collaborators the highlight core is driven against.

pub mod outline;

pub use outline::{OutlineDocument, OutlineError, OutlineLayout, OverlayMetrics};
