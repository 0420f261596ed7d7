//! Library for automix - persistence, catalog, uploads and analysis jobs
//!
//! This crate provides:
//! - Config: `key=value` settings file
//! - Store: SQLite key/value store for UI state
//! - Catalog: the built-in track list
//! - Columns and favorites persisted through the store
//! - Uploads: best-effort import of local audio files
//! - Analysis: background mix-analysis jobs

mod analysis;
mod catalog;
mod columns;
mod config;
mod favorites;
mod store;
mod uploads;

pub use analysis::{
    AnalysisError, AnalysisProgress, AnalysisReport, AnalysisRunner, AnalysisSource,
    ANALYSIS_STEPS,
};
pub use catalog::{mock_catalog, Track};
pub use columns::{ColumnConfig, ColumnLayout, LibraryView};
pub use config::{Config, ConfigError, DEFAULT_ANALYSIS_STEP_MS};
pub use favorites::Favorites;
pub use store::{KeyValueStore, StorageKey, StoreError};
pub use uploads::{
    import_files, uploaded_files, UploadError, UploadReport, UploadedFile, SUPPORTED_EXTENSIONS,
};
