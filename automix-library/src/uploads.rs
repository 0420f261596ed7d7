//! Importing local audio files into the library
//!
//! Nothing is decoded: an upload only records file metadata in the store.
//! Invalid files are skipped and reported, never aborting the batch.

use crate::store::{KeyValueStore, StorageKey, StoreError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{info, warn};

/// File extensions accepted as audio
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["mp3", "wav", "flac", "ogg", "m4a", "aac"];

/// Why a single file was skipped
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("{0}: file not found")]
    NotFound(PathBuf),
    #[error("{0}: file is empty")]
    Empty(PathBuf),
    #[error("{path}: unsupported format '{extension}'")]
    UnsupportedFormat { path: PathBuf, extension: String },
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not save uploads: {0}")]
    Store(#[from] StoreError),
}

/// Metadata of an imported file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: String,
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Lowercase extension
    pub format: String,
    /// Seconds since the Unix epoch
    pub added_at: u64,
}

/// Outcome of an import batch
#[derive(Debug, Default)]
pub struct UploadReport {
    pub added: Vec<UploadedFile>,
    pub errors: Vec<UploadError>,
}

impl UploadReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// One-line description for a status message
    pub fn summary(&self) -> String {
        match (self.added.len(), self.errors.len()) {
            (added, 0) => format!("Uploaded {} file(s)", added),
            (0, failed) => format!("Upload failed: {} file(s) skipped", failed),
            (added, failed) => format!("Uploaded {} file(s), {} skipped", added, failed),
        }
    }
}

/// Previously uploaded files
pub fn uploaded_files(store: &KeyValueStore) -> Vec<UploadedFile> {
    store.get(StorageKey::UploadedAudioFiles, Vec::new())
}

/// Check one path and build its metadata
fn inspect(path: &Path, added_at: u64) -> Result<UploadedFile, UploadError> {
    let metadata = match std::fs::metadata(path) {
        Ok(m) if m.is_file() => m,
        Ok(_) => return Err(UploadError::NotFound(path.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(UploadError::NotFound(path.to_path_buf()))
        }
        Err(source) => {
            return Err(UploadError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(UploadError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        });
    }

    if metadata.len() == 0 {
        return Err(UploadError::Empty(path.to_path_buf()));
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(UploadedFile {
        id: format!(
            "upload-{:08x}-{}",
            automix_analysis::hash_str(&path.to_string_lossy()),
            added_at
        ),
        name,
        path: path.to_path_buf(),
        size_bytes: metadata.len(),
        format: extension,
        added_at,
    })
}

/// Import files into the store
///
/// Valid files are appended to the stored upload list; a path that is
/// already uploaded replaces its earlier entry.
pub fn import_files<P: AsRef<Path>>(store: &KeyValueStore, paths: &[P]) -> UploadReport {
    let added_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let mut report = UploadReport::default();
    for path in paths {
        match inspect(path.as_ref(), added_at) {
            Ok(file) => report.added.push(file),
            Err(e) => {
                warn!(error = %e, "skipping upload");
                report.errors.push(e);
            }
        }
    }

    if report.added.is_empty() {
        return report;
    }

    let mut files = uploaded_files(store);
    files.retain(|f| !report.added.iter().any(|a| a.path == f.path));
    files.extend(report.added.iter().cloned());

    match store.set(StorageKey::UploadedAudioFiles, &files) {
        Ok(()) => info!(count = report.added.len(), "imported uploads"),
        Err(e) => {
            warn!(error = %e, "failed to persist uploads");
            report.errors.push(UploadError::Store(e));
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_import_valid_and_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("set.MP3");
        let empty = dir.path().join("empty.wav");
        let text = dir.path().join("notes.txt");
        fs::write(&good, b"ID3fake").unwrap();
        fs::write(&empty, b"").unwrap();
        fs::write(&text, b"hello").unwrap();
        let missing = dir.path().join("gone.flac");

        let store = KeyValueStore::in_memory().unwrap();
        let report = import_files(&store, &[&good, &empty, &text, &missing]);

        assert_eq!(report.added.len(), 1);
        assert_eq!(report.added[0].format, "mp3");
        assert_eq!(report.added[0].name, "set.MP3");
        assert_eq!(report.added[0].size_bytes, 7);
        assert_eq!(report.errors.len(), 3);
        assert!(matches!(report.errors[0], UploadError::Empty(_)));
        assert!(matches!(report.errors[1], UploadError::UnsupportedFormat { .. }));
        assert!(matches!(report.errors[2], UploadError::NotFound(_)));
        assert_eq!(report.summary(), "Uploaded 1 file(s), 3 skipped");

        assert_eq!(uploaded_files(&store), report.added);
    }

    #[test]
    fn test_appends_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.flac");
        let b = dir.path().join("b.ogg");
        fs::write(&a, b"aaaa").unwrap();
        fs::write(&b, b"bb").unwrap();

        let store = KeyValueStore::in_memory().unwrap();
        import_files(&store, &[&a]);
        import_files(&store, &[&b]);
        fs::write(&a, b"aaaaaaaa").unwrap();
        import_files(&store, &[&a]);

        let files = uploaded_files(&store);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, b);
        assert_eq!(files[1].size_bytes, 8);
    }

    #[test]
    fn test_all_invalid_leaves_store_untouched() {
        let store = KeyValueStore::in_memory().unwrap();
        let report = import_files(&store, &["/definitely/not/here.mp3"]);
        assert!(report.added.is_empty());
        assert!(report.has_errors());
        assert!(store.keys().unwrap().is_empty());
        assert_eq!(report.summary(), "Upload failed: 1 file(s) skipped");
    }

    #[test]
    fn test_corrupt_upload_list_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.wav");
        fs::write(&a, b"RIFF").unwrap();

        let store = KeyValueStore::in_memory().unwrap();
        store.set_raw("uploadedAudioFiles", "not json").unwrap();
        let report = import_files(&store, &[&a]);
        assert!(!report.has_errors());
        assert_eq!(uploaded_files(&store).len(), 1);
    }
}
