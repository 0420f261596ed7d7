//! Column layouts of the library tables
//!
//! Each view has its own ordered column list. Layouts are persisted in the
//! store under the view's key and merged against the defaults on load, so
//! columns added in a later release still show up.

use crate::catalog::Track;
use crate::store::{KeyValueStore, StorageKey, StoreError};
use serde::{Deserialize, Serialize};

/// Which library table a layout belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LibraryView {
    Audio,
    Analysis,
    Dna,
}

impl LibraryView {
    pub const ALL: [LibraryView; 3] = [LibraryView::Audio, LibraryView::Analysis, LibraryView::Dna];

    pub fn storage_key(self) -> StorageKey {
        match self {
            LibraryView::Audio => StorageKey::AudioLibraryColumns,
            LibraryView::Analysis => StorageKey::AudioAnalysisColumns,
            LibraryView::Dna => StorageKey::DnaLibraryColumns,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LibraryView::Audio => "Audio Library",
            LibraryView::Analysis => "Audio Analysis",
            LibraryView::Dna => "DNA Library",
        }
    }

    pub fn next(self) -> Self {
        match self {
            LibraryView::Audio => LibraryView::Analysis,
            LibraryView::Analysis => LibraryView::Dna,
            LibraryView::Dna => LibraryView::Audio,
        }
    }
}

/// One table column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub id: String,
    pub label: String,
    pub visible: bool,
    /// Width in terminal cells
    pub width: u16,
}

impl ColumnConfig {
    fn new(id: &str, label: &str, visible: bool, width: u16) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            visible,
            width,
        }
    }

    /// Cell text of this column for a track
    pub fn cell(&self, track: &Track) -> String {
        match self.id.as_str() {
            "title" => track.title.clone(),
            "artist" => track.artist.clone(),
            "genre" => track.genre.clone(),
            "bpm" => format!("{:.0}", track.bpm),
            "key" => track.key.clone(),
            "energy" => track.energy.to_string(),
            "duration" => track.duration_string(),
            "energy_bar" => "█".repeat(track.energy as usize),
            _ => String::new(),
        }
    }
}

/// Ordered columns of one view
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    view: LibraryView,
    columns: Vec<ColumnConfig>,
}

impl ColumnLayout {
    /// Default layout of a view
    pub fn defaults(view: LibraryView) -> Self {
        let columns = match view {
            LibraryView::Audio => vec![
                ColumnConfig::new("title", "Title", true, 24),
                ColumnConfig::new("artist", "Artist", true, 20),
                ColumnConfig::new("genre", "Genre", true, 16),
                ColumnConfig::new("bpm", "BPM", true, 5),
                ColumnConfig::new("key", "Key", true, 4),
                ColumnConfig::new("duration", "Time", true, 6),
                ColumnConfig::new("energy", "Energy", false, 6),
            ],
            LibraryView::Analysis => vec![
                ColumnConfig::new("title", "Title", true, 24),
                ColumnConfig::new("artist", "Artist", true, 20),
                ColumnConfig::new("bpm", "BPM", true, 5),
                ColumnConfig::new("key", "Key", true, 4),
                ColumnConfig::new("energy", "Energy", true, 6),
                ColumnConfig::new("genre", "Genre", false, 16),
            ],
            LibraryView::Dna => vec![
                ColumnConfig::new("title", "Title", true, 24),
                ColumnConfig::new("artist", "Artist", true, 20),
                ColumnConfig::new("energy_bar", "Energy", true, 10),
                ColumnConfig::new("key", "Key", true, 4),
                ColumnConfig::new("bpm", "BPM", false, 5),
            ],
        };
        Self { view, columns }
    }

    /// Load a view's layout, falling back to the defaults
    ///
    /// Stored columns keep their order and visibility; unknown ids are
    /// dropped and default columns missing from storage are appended.
    pub fn load(store: &KeyValueStore, view: LibraryView) -> Self {
        let defaults = Self::defaults(view);
        let stored: Vec<ColumnConfig> = store.get(view.storage_key(), Vec::new());
        if stored.is_empty() {
            return defaults;
        }

        let mut columns: Vec<ColumnConfig> = Vec::with_capacity(defaults.columns.len());
        for col in stored {
            let known = defaults.columns.iter().any(|d| d.id == col.id);
            let duplicate = columns.iter().any(|c| c.id == col.id);
            if known && !duplicate {
                columns.push(col);
            }
        }
        for col in defaults.columns {
            if !columns.iter().any(|c| c.id == col.id) {
                columns.push(col);
            }
        }

        Self { view, columns }
    }

    pub fn save(&self, store: &KeyValueStore) -> Result<(), StoreError> {
        store.set(self.view.storage_key(), &self.columns)
    }

    pub fn view(&self) -> LibraryView {
        self.view
    }

    pub fn columns(&self) -> &[ColumnConfig] {
        &self.columns
    }

    pub fn visible(&self) -> impl Iterator<Item = &ColumnConfig> + '_ {
        self.columns.iter().filter(|c| c.visible)
    }

    /// Toggle visibility of a column; the last visible column stays visible
    pub fn toggle(&mut self, index: usize) -> bool {
        let visible_count = self.visible().count();
        let Some(col) = self.columns.get_mut(index) else {
            return false;
        };
        if col.visible && visible_count <= 1 {
            return false;
        }
        col.visible = !col.visible;
        true
    }

    pub fn move_left(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.columns.len() {
            return false;
        }
        self.columns.swap(index - 1, index);
        true
    }

    pub fn move_right(&mut self, index: usize) -> bool {
        if index + 1 >= self.columns.len() {
            return false;
        }
        self.columns.swap(index, index + 1);
        true
    }

    pub fn reset(&mut self) {
        *self = Self::defaults(self.view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(layout: &ColumnLayout) -> Vec<&str> {
        layout.columns().iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_load_without_storage_gives_defaults() {
        let store = KeyValueStore::in_memory().unwrap();
        for view in LibraryView::ALL {
            assert_eq!(ColumnLayout::load(&store, view), ColumnLayout::defaults(view));
        }
    }

    #[test]
    fn test_move_and_toggle_persist() {
        let store = KeyValueStore::in_memory().unwrap();
        let mut layout = ColumnLayout::load(&store, LibraryView::Audio);
        assert!(layout.move_right(0));
        assert!(layout.toggle(2));
        layout.save(&store).unwrap();

        let loaded = ColumnLayout::load(&store, LibraryView::Audio);
        assert_eq!(&ids(&loaded)[..2], &["artist", "title"]);
        assert!(!loaded.columns()[2].visible);
        // Other views untouched
        assert_eq!(
            ColumnLayout::load(&store, LibraryView::Dna),
            ColumnLayout::defaults(LibraryView::Dna)
        );
    }

    #[test]
    fn test_move_bounds() {
        let mut layout = ColumnLayout::defaults(LibraryView::Dna);
        let last = layout.columns().len() - 1;
        assert!(!layout.move_left(0));
        assert!(!layout.move_right(last));
        assert!(!layout.move_right(99));
        assert!(layout.move_left(last));
    }

    #[test]
    fn test_last_visible_column_kept() {
        let mut layout = ColumnLayout::defaults(LibraryView::Dna);
        for i in 0..layout.columns().len() {
            if layout.columns()[i].visible {
                layout.toggle(i);
            }
        }
        assert_eq!(layout.visible().count(), 1);
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let store = KeyValueStore::in_memory().unwrap();
        let stored = vec![
            ColumnConfig::new("key", "Key", false, 4),
            ColumnConfig::new("bogus", "Bogus", true, 9),
            ColumnConfig::new("key", "Key", true, 4),
        ];
        store.set(StorageKey::DnaLibraryColumns, &stored).unwrap();

        let layout = ColumnLayout::load(&store, LibraryView::Dna);
        assert_eq!(ids(&layout), vec!["key", "title", "artist", "energy_bar", "bpm"]);
        assert!(!layout.columns()[0].visible);
    }

    #[test]
    fn test_corrupt_layout_falls_back() {
        let store = KeyValueStore::in_memory().unwrap();
        store.set_raw("audioAnalysisColumns", "[{\"id\":").unwrap();
        assert_eq!(
            ColumnLayout::load(&store, LibraryView::Analysis),
            ColumnLayout::defaults(LibraryView::Analysis)
        );
    }

    #[test]
    fn test_cells() {
        let track = &crate::catalog::mock_catalog()[3];
        let layout = ColumnLayout::defaults(LibraryView::Dna);
        let bar = layout.columns()[2].cell(track);
        assert_eq!(bar.chars().count(), track.energy as usize);
        assert_eq!(layout.columns()[3].cell(track), "11A");
    }
}
