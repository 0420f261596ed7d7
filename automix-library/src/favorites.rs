//! Favorite tracks, persisted as a list of ids

use crate::store::{KeyValueStore, StorageKey, StoreError};
use std::collections::BTreeSet;

/// Set of favorite track ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    ids: BTreeSet<String>,
}

impl Favorites {
    pub fn load(store: &KeyValueStore) -> Self {
        let ids: Vec<String> = store.get(StorageKey::DnaFavoriteTracks, Vec::new());
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn save(&self, store: &KeyValueStore) -> Result<(), StoreError> {
        let ids: Vec<&String> = self.ids.iter().collect();
        store.set(StorageKey::DnaFavoriteTracks, &ids)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Flip a track's favorite flag; returns the new state
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut favs = Favorites::default();
        assert!(favs.toggle("t1"));
        assert!(favs.contains("t1"));
        assert!(!favs.toggle("t1"));
        assert!(favs.is_empty());
    }

    #[test]
    fn test_persisted() {
        let store = KeyValueStore::in_memory().unwrap();
        let mut favs = Favorites::load(&store);
        favs.toggle("t4");
        favs.toggle("t2");
        favs.save(&store).unwrap();

        let loaded = Favorites::load(&store);
        assert_eq!(loaded.len(), 2);
        assert!(loaded.contains("t2") && loaded.contains("t4"));
        assert_eq!(
            store.get_raw("dnaFavoriteTracks").unwrap().as_deref(),
            Some(r#"["t2","t4"]"#)
        );
    }

    #[test]
    fn test_corrupt_favorites_empty() {
        let store = KeyValueStore::in_memory().unwrap();
        store.set_raw("dnaFavoriteTracks", "42").unwrap();
        assert!(Favorites::load(&store).is_empty());
    }
}
