//! Persistent key/value store for UI state
//!
//! Every value is a JSON blob under a fixed string key, kept in a small
//! SQLite table. Reads never fail: a missing key, a database error or a
//! blob that no longer parses all yield the caller's default.

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Errors that can occur when writing to the store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Fixed keys of the persisted UI state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Metadata of imported audio files
    UploadedAudioFiles,
    /// Column layout of the audio library table
    AudioLibraryColumns,
    /// Column layout of the analysis table
    AudioAnalysisColumns,
    /// Column layout of the DNA library table
    DnaLibraryColumns,
    /// Ids of favorite tracks
    DnaFavoriteTracks,
}

impl StorageKey {
    pub const ALL: [StorageKey; 5] = [
        StorageKey::UploadedAudioFiles,
        StorageKey::AudioLibraryColumns,
        StorageKey::AudioAnalysisColumns,
        StorageKey::DnaLibraryColumns,
        StorageKey::DnaFavoriteTracks,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::UploadedAudioFiles => "uploadedAudioFiles",
            StorageKey::AudioLibraryColumns => "audioLibraryColumns",
            StorageKey::AudioAnalysisColumns => "audioAnalysisColumns",
            StorageKey::DnaLibraryColumns => "dnaLibraryColumns",
            StorageKey::DnaFavoriteTracks => "dnaFavoriteTracks",
        }
    }
}

/// Key/value store backed by SQLite
pub struct KeyValueStore {
    conn: Connection,
}

impl KeyValueStore {
    /// SQL schema for the kv table
    const SCHEMA: &'static str = r#"
        CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        );
    "#;

    /// Open or create a store at the given path
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        conn.execute_batch(Self::SCHEMA)?;
        Ok(Self { conn })
    }

    /// Open a throwaway in-memory store
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(Self::SCHEMA)?;
        Ok(Self { conn })
    }

    /// Default store location
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("automix")
            .join("storage.db")
    }

    /// Raw JSON stored under a key
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    /// Store raw JSON under a key, replacing any previous value
    pub fn set_raw(&self, key: &str, json: &str) -> Result<(), StoreError> {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, json, now],
        )?;
        Ok(())
    }

    /// Typed read that falls back to `default` on any failure
    pub fn get<T: DeserializeOwned>(&self, key: StorageKey, default: T) -> T {
        let raw = match self.get_raw(key.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "store read failed, using default");
                return default;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "stored value unreadable, using default");
                default
            }
        }
    }

    /// Typed write
    pub fn set<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key.as_str(), &json)
    }

    /// Remove a key; returns whether it existed
    pub fn remove(&self, key: StorageKey) -> Result<bool, StoreError> {
        let affected = self
            .conn
            .execute("DELETE FROM kv WHERE key = ?1", [key.as_str()])?;
        Ok(affected > 0)
    }

    /// All stored keys, sorted
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv ORDER BY key ASC")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_returns_default() {
        let store = KeyValueStore::in_memory().unwrap();
        let favorites: Vec<String> = store.get(StorageKey::DnaFavoriteTracks, vec!["x".into()]);
        assert_eq!(favorites, vec!["x".to_string()]);
    }

    #[test]
    fn test_set_and_get() {
        let store = KeyValueStore::in_memory().unwrap();
        let ids = vec!["t1".to_string(), "t7".to_string()];
        store.set(StorageKey::DnaFavoriteTracks, &ids).unwrap();

        let loaded: Vec<String> = store.get(StorageKey::DnaFavoriteTracks, Vec::new());
        assert_eq!(loaded, ids);
        assert_eq!(
            store.get_raw("dnaFavoriteTracks").unwrap().as_deref(),
            Some(r#"["t1","t7"]"#)
        );
    }

    #[test]
    fn test_malformed_json_falls_back() {
        let store = KeyValueStore::in_memory().unwrap();
        store.set_raw("audioLibraryColumns", "{not json").unwrap();
        let cols: Vec<u32> = store.get(StorageKey::AudioLibraryColumns, vec![1, 2]);
        assert_eq!(cols, vec![1, 2]);
    }

    #[test]
    fn test_wrong_shape_falls_back() {
        let store = KeyValueStore::in_memory().unwrap();
        store.set_raw("uploadedAudioFiles", r#"{"a":1}"#).unwrap();
        let files: Vec<String> = store.get(StorageKey::UploadedAudioFiles, Vec::new());
        assert!(files.is_empty());
    }

    #[test]
    fn test_overwrite_and_remove() {
        let store = KeyValueStore::in_memory().unwrap();
        store.set(StorageKey::DnaFavoriteTracks, &["a"]).unwrap();
        store.set(StorageKey::DnaFavoriteTracks, &["b"]).unwrap();
        assert_eq!(store.keys().unwrap(), vec!["dnaFavoriteTracks".to_string()]);

        let loaded: Vec<String> = store.get(StorageKey::DnaFavoriteTracks, Vec::new());
        assert_eq!(loaded, vec!["b".to_string()]);

        assert!(store.remove(StorageKey::DnaFavoriteTracks).unwrap());
        assert!(!store.remove(StorageKey::DnaFavoriteTracks).unwrap());
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_key_strings() {
        let names: Vec<_> = StorageKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "uploadedAudioFiles",
                "audioLibraryColumns",
                "audioAnalysisColumns",
                "dnaLibraryColumns",
                "dnaFavoriteTracks"
            ]
        );
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.db");
        {
            let store = KeyValueStore::open(&path).unwrap();
            store.set(StorageKey::DnaFavoriteTracks, &["t3"]).unwrap();
        }
        let store = KeyValueStore::open(&path).unwrap();
        let loaded: Vec<String> = store.get(StorageKey::DnaFavoriteTracks, Vec::new());
        assert_eq!(loaded, vec!["t3".to_string()]);
    }
}
