use crate::models::PatentFile;
use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions treated as readable patent documents
const DOCUMENT_EXTENSIONS: [&str; 2] = ["md", "txt"];

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid patents directory: {0}")]
    InvalidPatentsDir(String),
}

/// Read a patent document and return its raw bytes
pub fn read_document(relative_path: &RelativePath, patents_root: &Path) -> Result<Vec<u8>, IoError> {
    let absolute_path = relative_path.to_path(patents_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read(&absolute_path).map_err(IoError::Io)
}

/// Write a patent document
pub fn write_document(
    relative_path: &RelativePath,
    patents_root: &Path,
    content: &[u8],
) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(patents_root);

    // Create parent directories if they don't exist
    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(&absolute_path, content).map_err(IoError::Io)
}

/// Scan for patent documents under the patents directory, sorted by path.
///
/// Hidden directories (such as the highlight store) are skipped.
pub fn scan_documents(patents_root: &Path) -> Result<Vec<PatentFile>, IoError> {
    if !patents_root.exists() {
        return Err(IoError::InvalidPatentsDir(
            "patents directory not found".to_string(),
        ));
    }

    let mut files = Vec::new();
    scan_directory_recursive(patents_root, patents_root, &mut files)?;
    files.sort();
    Ok(files.into_iter().map(PatentFile::new).collect())
}

fn scan_directory_recursive(
    root: &Path,
    dir: &Path,
    files: &mut Vec<RelativePathBuf>,
) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if is_hidden(&path) {
            continue;
        }

        if path.is_dir() {
            scan_directory_recursive(root, &path, files)?;
        } else if let Some(ext) = path.extension().and_then(|ext| ext.to_str())
            && DOCUMENT_EXTENSIONS.contains(&ext)
            && let Ok(relative) = path.strip_prefix(root)
            && let Ok(relative) = RelativePathBuf::from_path(relative)
        {
            files.push(relative);
        }
    }

    Ok(())
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

pub fn validate_patents_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidPatentsDir(
            "Directory does not exist".to_string(),
        ));
    }

    Ok(())
}
