//! Track catalog - the hard-coded library shown in the browser views

use serde::{Deserialize, Serialize};

/// A track in the library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub genre: String,
    pub bpm: f32,
    /// Camelot notation
    pub key: String,
    /// 1-10
    pub energy: u8,
    pub duration_secs: f64,
}

impl Track {
    #[allow(clippy::too_many_arguments)]
    fn new(
        id: &str,
        title: &str,
        artist: &str,
        genre: &str,
        bpm: f32,
        key: &str,
        energy: u8,
        duration_secs: f64,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            artist: artist.to_string(),
            genre: genre.to_string(),
            bpm,
            key: key.to_string(),
            energy,
            duration_secs,
        }
    }

    /// Duration formatted as M:SS
    pub fn duration_string(&self) -> String {
        automix_core::format_time(self.duration_secs)
    }
}

/// The built-in catalog
pub fn mock_catalog() -> Vec<Track> {
    vec![
        Track::new("t1", "Midnight Drive", "Solomun", "Melodic House", 122.0, "8A", 7, 412.0),
        Track::new("t2", "Deep Resonance", "Tale Of Us", "Melodic Techno", 124.0, "5A", 6, 455.0),
        Track::new("t3", "Afterglow", "Keinemusik", "Afro House", 120.0, "9B", 5, 388.0),
        Track::new("t4", "Neon Pulse", "Amelie Lens", "Techno", 132.0, "11A", 9, 362.0),
        Track::new("t5", "Solar Wind", "Adriatique", "Melodic House", 123.0, "3A", 7, 421.0),
        Track::new("t6", "Liquid Motion", "Black Coffee", "Deep House", 118.0, "10B", 4, 476.0),
        Track::new("t7", "Echoes", "Charlotte de Witte", "Techno", 134.0, "2A", 10, 348.0),
        Track::new("t8", "Horizon", "Mind Against", "Melodic Techno", 125.0, "7A", 6, 502.0),
        Track::new("t9", "Sundown Ritual", "&ME", "Afro House", 121.0, "4B", 5, 397.0),
        Track::new("t10", "Gravity", "Maceo Plex", "Tech House", 126.0, "6A", 8, 371.0),
        Track::new("t11", "Velvet Sky", "Lane 8", "Progressive House", 122.0, "1B", 5, 433.0),
        Track::new("t12", "Pressure Point", "Enrico Sangiuliano", "Techno", 130.0, "12A", 9, 359.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_unique() {
        let catalog = mock_catalog();
        let ids: HashSet<_> = catalog.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn test_catalog_values_in_range() {
        let keys = automix_analysis::camelot_keys();
        for track in mock_catalog() {
            assert!((1..=10).contains(&track.energy), "{}", track.id);
            assert!(track.bpm > 100.0 && track.bpm < 140.0);
            assert!(keys.contains(&track.key), "{} has key {}", track.id, track.key);
        }
    }

    #[test]
    fn test_duration_string() {
        let track = &mock_catalog()[0];
        assert_eq!(track.duration_string(), "6:52");
    }
}
