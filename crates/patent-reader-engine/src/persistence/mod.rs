use std::collections::HashMap;
use std::path::PathBuf;

use crate::highlight::{DocumentId, LogicalRange};

pub mod json_file;

pub use json_file::JsonFilePersistence;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Failed to access highlight file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to serialize highlights for {document}: {source}")]
    Serialize {
        document: DocumentId,
        source: serde_json::Error,
    },
    #[error("Failed to parse highlight file at {path}: {source}")]
    Deserialize {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Highlight storage unavailable: {0}")]
    Unavailable(String),
}

/// Where a session's highlights live between runs.
///
/// Invoked at hydration and after each committed change. Failures are
/// reported here but never reach the reconciliation path.
pub trait HighlightPersistence {
    /// Load a document's ranges; a document never saved loads as empty
    fn load(&self, document: &DocumentId) -> Result<Vec<LogicalRange>, PersistenceError>;

    /// Replace a document's persisted ranges
    fn save(&mut self, document: &DocumentId, ranges: &[LogicalRange])
    -> Result<(), PersistenceError>;
}

/// In-memory persistence, also able to simulate an unavailable backend
#[derive(Debug, Default, Clone)]
pub struct MemoryPersistence {
    documents: HashMap<DocumentId, Vec<LogicalRange>>,
    failing: bool,
    saves: usize,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a document, as if saved by an earlier session
    pub fn with_document(mut self, document: DocumentId, ranges: Vec<LogicalRange>) -> Self {
        self.documents.insert(document, ranges);
        self
    }

    /// Make every subsequent load and save fail
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// Persisted ranges for a document, if any
    pub fn stored(&self, document: &DocumentId) -> Option<&[LogicalRange]> {
        self.documents.get(document).map(Vec::as_slice)
    }

    /// Number of successful saves
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl HighlightPersistence for MemoryPersistence {
    fn load(&self, document: &DocumentId) -> Result<Vec<LogicalRange>, PersistenceError> {
        if self.failing {
            return Err(PersistenceError::Unavailable(format!(
                "cannot load {document}"
            )));
        }
        Ok(self.documents.get(document).cloned().unwrap_or_default())
    }

    fn save(
        &mut self,
        document: &DocumentId,
        ranges: &[LogicalRange],
    ) -> Result<(), PersistenceError> {
        if self.failing {
            return Err(PersistenceError::Unavailable(format!(
                "cannot save {document}"
            )));
        }
        if ranges.is_empty() {
            self.documents.remove(document);
        } else {
            self.documents.insert(document.clone(), ranges.to_vec());
        }
        self.saves += 1;
        Ok(())
    }
}
