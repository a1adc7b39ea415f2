use std::collections::HashSet;

use crate::highlight::ids::{DocumentId, IdGenerator, UuidIdGenerator};
use crate::highlight::overlay::{HighlightOverlay, RectResolver, overlay_rects};
use crate::highlight::patch::HighlightPatch;
use crate::highlight::position::{LogicalPosition, PositionOrder};
use crate::highlight::range::{HighlightColor, LogicalRange, Selection};
use crate::highlight::reconcile;
use crate::highlight::store::HighlightStore;
use crate::persistence::HighlightPersistence;

/// Notified after every committed highlight change
pub trait HighlightObserver {
    fn on_highlights_changed(&mut self, patch: &HighlightPatch);
}

impl<F: FnMut(&HighlightPatch)> HighlightObserver for F {
    fn on_highlights_changed(&mut self, patch: &HighlightPatch) {
        self(patch)
    }
}

/// Handle returned by [`HighlightSession::subscribe`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// The workspace session's highlight state.
///
/// Owns the store for every open document together with its collaborators.
/// Mutations run to completion synchronously; persistence is best effort
/// and its failures are logged, never returned.
pub struct HighlightSession<P, G = UuidIdGenerator> {
    store: HighlightStore,
    persistence: P,
    ids: G,
    open: HashSet<DocumentId>,
    /// Open documents whose load failed; never saved, so stored data survives
    unhydrated: HashSet<DocumentId>,
    observers: Vec<(ObserverId, Box<dyn HighlightObserver>)>,
    next_observer: u64,
}

impl<P: HighlightPersistence> HighlightSession<P, UuidIdGenerator> {
    pub fn new(persistence: P) -> Self {
        Self::with_id_generator(persistence, UuidIdGenerator)
    }
}

impl<P: HighlightPersistence, G: IdGenerator> HighlightSession<P, G> {
    pub fn with_id_generator(persistence: P, ids: G) -> Self {
        Self {
            store: HighlightStore::new(),
            persistence,
            ids,
            open: HashSet::new(),
            unhydrated: HashSet::new(),
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    /// Hydrate a document from persistence. Opening an open document does nothing.
    ///
    /// If loading fails the document starts empty and its changes stay in
    /// memory until it is closed and reopened successfully.
    pub fn open_document(&mut self, document: &DocumentId) {
        if self.open.contains(document) {
            return;
        }

        match self.persistence.load(document) {
            Ok(ranges) => {
                log::info!("opened {document} with {} highlight(s)", ranges.len());
                self.store.replace_all(document, ranges);
            }
            Err(e) => {
                log::warn!("could not load highlights for {document}, starting empty: {e}");
                self.store.replace_all(document, Vec::new());
                self.unhydrated.insert(document.clone());
            }
        }
        self.open.insert(document.clone());
    }

    /// Drop a document's in-memory highlights; persisted data is kept
    pub fn close_document(&mut self, document: &DocumentId) {
        self.unhydrated.remove(document);
        if self.open.remove(document) {
            log::info!("closed {document}");
        }
        self.store.discard(document);
    }

    pub fn is_open(&self, document: &DocumentId) -> bool {
        self.open.contains(document)
    }

    /// Highlight a selection. Documents not yet open are hydrated first.
    pub fn add_highlight(
        &mut self,
        document: &DocumentId,
        order: &dyn PositionOrder,
        selection: &Selection,
        color: HighlightColor,
    ) -> HighlightPatch {
        self.open_document(document);
        let patch = reconcile::add_highlight(
            &mut self.store,
            document,
            order,
            selection,
            color,
            &mut self.ids,
        );
        self.after_commit(&patch);
        patch
    }

    /// Clear highlighting under a selection. Documents not yet open are hydrated first.
    pub fn remove_highlight(
        &mut self,
        document: &DocumentId,
        order: &dyn PositionOrder,
        selection: &Selection,
        reference_color: Option<&HighlightColor>,
    ) -> HighlightPatch {
        self.open_document(document);
        let patch = reconcile::remove_highlight(
            &mut self.store,
            document,
            order,
            selection,
            reference_color,
            &mut self.ids,
        );
        self.after_commit(&patch);
        patch
    }

    pub fn highlights(&self, document: &DocumentId) -> &[LogicalRange] {
        self.store.get(document)
    }

    pub fn highlights_at(
        &self,
        document: &DocumentId,
        order: &dyn PositionOrder,
        position: &LogicalPosition,
    ) -> Vec<&LogicalRange> {
        self.store.highlights_at(document, order, position)
    }

    pub fn overlay_rects(
        &self,
        document: &DocumentId,
        resolver: &dyn RectResolver,
    ) -> Vec<HighlightOverlay> {
        overlay_rects(&self.store, document, resolver)
    }

    pub fn store(&self) -> &HighlightStore {
        &self.store
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn persistence_mut(&mut self) -> &mut P {
        &mut self.persistence
    }

    pub fn subscribe(&mut self, observer: impl HighlightObserver + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if the observer was not subscribed
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    fn after_commit(&mut self, patch: &HighlightPatch) {
        if patch.is_empty() {
            return;
        }

        if self.unhydrated.contains(&patch.document) {
            log::warn!(
                "not saving highlights for {}: its stored highlights were never loaded",
                patch.document
            );
        } else {
            let ranges = self.store.get(&patch.document);
            if let Err(e) = self.persistence.save(&patch.document, ranges) {
                log::warn!("could not save highlights for {}: {e}", patch.document);
            }
        }

        for (_, observer) in &mut self.observers {
            observer.on_highlights_changed(patch);
        }
    }
}
