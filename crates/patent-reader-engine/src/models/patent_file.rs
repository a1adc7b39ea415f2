use relative_path::{RelativePath, RelativePathBuf};

use crate::highlight::DocumentId;

/// Suffixes hidden from display names
const DOCUMENT_SUFFIXES: [&str; 2] = [".md", ".txt"];

/// A patent document on disk, addressed relative to the patents directory
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PatentFile {
    relative_path: RelativePathBuf,
    display_name: String,
    display_path: String,
}

impl PatentFile {
    pub fn new(relative_path: RelativePathBuf) -> Self {
        let display_name = relative_path
            .file_name()
            .map(strip_document_suffix)
            .unwrap_or("Untitled")
            .to_string();
        let display_path = strip_document_suffix(relative_path.as_str()).to_string();

        Self {
            relative_path,
            display_name,
            display_path,
        }
    }

    pub fn from_relative_str(path: &str) -> Self {
        Self::new(RelativePathBuf::from(path))
    }

    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    /// File name without its document extension
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Relative path without its document extension, for titles
    pub fn display_path(&self) -> &str {
        &self.display_path
    }

    /// Highlights are keyed by the full relative path, extension included
    pub fn document_id(&self) -> DocumentId {
        DocumentId::new(self.relative_path.as_str())
    }
}

fn strip_document_suffix(name: &str) -> &str {
    DOCUMENT_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .unwrap_or(name)
}

impl From<RelativePathBuf> for PatentFile {
    fn from(path: RelativePathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&str> for PatentFile {
    fn from(path: &str) -> Self {
        Self::from_relative_str(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("US-1234567.md", "US-1234567", "US-1234567")]
    #[case("us/2024/EP-99.txt", "EP-99", "us/2024/EP-99")]
    #[case("notes.markdown", "notes.markdown", "notes.markdown")]
    fn test_display_names(#[case] path: &str, #[case] name: &str, #[case] display_path: &str) {
        let file = PatentFile::from(path);
        assert_eq!(file.display_name(), name);
        assert_eq!(file.display_path(), display_path);
        assert_eq!(file.relative_path().as_str(), path);
    }

    #[test]
    fn test_document_id_keeps_extension() {
        let file = PatentFile::from_relative_str("us/US-1.md");
        assert_eq!(file.document_id(), DocumentId::from("us/US-1.md"));
    }
}
