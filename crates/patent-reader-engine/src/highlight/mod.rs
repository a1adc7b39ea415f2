/*!
 * # Highlight Range Model
 *
 * Highlights are persisted as **logical ranges**: a start and end position, each a
 * content node identifier plus a character offset. Node identifiers carry no order
 * of their own, so every comparison goes through a [`PositionOrder`] supplied by
 * the live document.
 *
 * ## Layers (leaves first)
 *
 * - **`position`**: `LogicalPosition`, the `PositionOrder` capability and `compare`
 * - **`range`**: `LogicalRange`, `Selection`, `Region` and the `normalize` step
 * - **`algebra`**: pure `intersects` / `contains` / `split` / `merge`
 * - **`store`**: per-document collection with id uniqueness and empty-entry hygiene
 * - **`reconcile`**: `add_highlight` / `remove_highlight`, compute then commit
 * - **`session`**: store ownership, hydration, persistence and change notification
 * - **`overlay`**: read-only mapping from stored ranges to visual rectangles
 *
 * ## Invariants after every commit
 *
 * - No two ranges in a document share an id
 * - No stored range is collapsed
 * - Ranges of the same color never overlap or touch (they are merged)
 * - Ranges of different colors never overlap (the later color wins)
 *
 * ## Usage Pattern
 *
 * ```rust
 * use patent_reader_engine::*;
 *
 * let doc = OutlineDocument::from_bytes(b"A method for widget assembly.").unwrap();
 * let mut session = HighlightSession::new(MemoryPersistence::default());
 * let document = DocumentId::from("US-1234567");
 *
 * let selection = Selection::new(LogicalPosition::new("p0", 9), LogicalPosition::new("p0", 2));
 * let patch = session.add_highlight(&document, &doc, &selection, HighlightColor::YELLOW);
 *
 * assert_eq!(patch.added.len(), 1);
 * assert_eq!(session.highlights(&document)[0].start.offset, 2);
 * ```
 */

pub mod algebra;
pub mod ids;
pub mod overlay;
pub mod patch;
pub mod position;
pub mod range;
pub mod reconcile;
pub mod session;
pub mod store;

pub use ids::{DocumentId, IdGenerator, RangeId};
pub use position::{LogicalPosition, NodeId, PositionOrder};
pub use range::{HighlightColor, LogicalRange, Region, Selection};
