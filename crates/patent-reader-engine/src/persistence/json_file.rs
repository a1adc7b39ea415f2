use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::highlight::{DocumentId, LogicalRange};
use crate::persistence::{HighlightPersistence, PersistenceError};

/// On-disk shape of one document's highlights
#[derive(Debug, Serialize, Deserialize)]
struct HighlightFile {
    document: DocumentId,
    highlights: Vec<LogicalRange>,
}

/// One pretty-printed JSON file per document under a directory
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    dir: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding a document's highlights.
    ///
    /// Document ids are usually relative paths, so the id is percent-encoded
    /// to keep the name flat and unique.
    pub fn file_for(&self, document: &DocumentId) -> PathBuf {
        let name = urlencoding::encode(document.as_str());
        self.dir.join(format!("{name}.json"))
    }
}

impl HighlightPersistence for JsonFilePersistence {
    fn load(&self, document: &DocumentId) -> Result<Vec<LogicalRange>, PersistenceError> {
        let path = self.file_for(document);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(PersistenceError::Io { path, source }),
        };

        let file: HighlightFile = serde_json::from_str(&content)
            .map_err(|source| PersistenceError::Deserialize { path, source })?;
        if &file.document != document {
            log::warn!(
                "highlight file for {document} names {}; loading it anyway",
                file.document
            );
        }
        Ok(file.highlights)
    }

    fn save(
        &mut self,
        document: &DocumentId,
        ranges: &[LogicalRange],
    ) -> Result<(), PersistenceError> {
        let path = self.file_for(document);

        if ranges.is_empty() {
            return match fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(source) => Err(PersistenceError::Io { path, source }),
            };
        }

        fs::create_dir_all(&self.dir).map_err(|source| PersistenceError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let file = HighlightFile {
            document: document.clone(),
            highlights: ranges.to_vec(),
        };
        let content =
            serde_json::to_string_pretty(&file).map_err(|source| PersistenceError::Serialize {
                document: document.clone(),
                source,
            })?;

        fs::write(&path, content).map_err(|source| PersistenceError::Io { path, source })
    }
}
