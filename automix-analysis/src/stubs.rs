//! Mock track analysis
//!
//! Stand-ins for BPM, key, energy and mood detection. They perform no
//! signal processing: every value is drawn from a [`SeededRng`], so the
//! same seed yields the same "analysis".

use crate::rng::SeededRng;
use serde::{Deserialize, Serialize};

/// Mood labels the mood detector chooses from
pub const MOODS: [&str; 8] = [
    "Euphoric",
    "Dark",
    "Melancholic",
    "Driving",
    "Hypnotic",
    "Uplifting",
    "Groovy",
    "Aggressive",
];

const ARTISTS: [&str; 10] = [
    "Adam Beyer",
    "Amelie Lens",
    "Charlotte de Witte",
    "Dixon",
    "Tale Of Us",
    "Maceo Plex",
    "Solomun",
    "Peggy Gou",
    "Ben Klock",
    "Nina Kraviz",
];

const TITLE_WORDS: [&str; 12] = [
    "Midnight", "Pulse", "Horizon", "Echoes", "Gravity", "Velvet", "Signal", "Drift", "Neon",
    "Shadow", "Orbit", "Fever",
];

/// All 24 Camelot keys, minor (A) before major (B)
pub fn camelot_keys() -> Vec<String> {
    let minor = (1..=12).map(|n| format!("{}A", n));
    let major = (1..=12).map(|n| format!("{}B", n));
    minor.chain(major).collect()
}

/// Detected tempo, 118.0-134.0 BPM with one decimal
pub fn detect_bpm(rng: &mut SeededRng) -> f32 {
    (rng.range_f32(118.0, 134.0) * 10.0).round() / 10.0
}

/// Detected key in Camelot notation
pub fn detect_key(rng: &mut SeededRng) -> String {
    let keys = camelot_keys();
    rng.pick(&keys).cloned().unwrap_or_else(|| "8A".to_string())
}

/// Detected energy level, 1-10
pub fn detect_energy(rng: &mut SeededRng) -> u8 {
    rng.range_u32(1, 10) as u8
}

/// Detected mood label
pub fn detect_mood(rng: &mut SeededRng) -> &'static str {
    rng.pick(&MOODS).copied().unwrap_or("Groovy")
}

/// "Musical DNA" profile, every trait 0-100
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DnaProfile {
    pub energy: u8,
    pub danceability: u8,
    pub groove: u8,
    pub darkness: u8,
    pub vocals: u8,
}

impl DnaProfile {
    /// Traits as (label, value) pairs for display
    pub fn traits(&self) -> [(&'static str, u8); 5] {
        [
            ("Energy", self.energy),
            ("Danceability", self.danceability),
            ("Groove", self.groove),
            ("Darkness", self.darkness),
            ("Vocals", self.vocals),
        ]
    }
}

/// Detected DNA profile
pub fn detect_dna(rng: &mut SeededRng) -> DnaProfile {
    DnaProfile {
        energy: rng.range_u32(0, 100) as u8,
        danceability: rng.range_u32(0, 100) as u8,
        groove: rng.range_u32(0, 100) as u8,
        darkness: rng.range_u32(0, 100) as u8,
        vocals: rng.range_u32(0, 100) as u8,
    }
}

/// One track identified inside a mix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedTrack {
    /// 1-based position in the tracklist
    pub index: usize,
    pub artist: String,
    pub title: String,
    /// Offset into the mix
    pub start_secs: f64,
    /// Match confidence, 0.60-0.99
    pub confidence: f32,
}

/// Detect the tracklist of a mix
///
/// Tracks are spaced 3-6 minutes apart; timestamps are strictly
/// ascending and never exceed `mix_duration_secs`.
pub fn detect_tracks(rng: &mut SeededRng, mix_duration_secs: f64) -> Vec<DetectedTrack> {
    let mut tracks = Vec::new();
    let mut start = 0.0;

    while start < mix_duration_secs {
        let artist = rng.pick(&ARTISTS).copied().unwrap_or("Unknown");
        let first = rng.pick(&TITLE_WORDS).copied().unwrap_or("Untitled");
        let second = rng.pick(&TITLE_WORDS).copied().unwrap_or("Mix");
        tracks.push(DetectedTrack {
            index: tracks.len() + 1,
            artist: artist.to_string(),
            title: format!("{} {}", first, second),
            start_secs: start,
            confidence: (rng.range_f32(0.60, 0.99) * 100.0).round() / 100.0,
        });
        start += rng.range_u32(180, 360) as f64;
    }

    tracks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camelot_keys() {
        let keys = camelot_keys();
        assert_eq!(keys.len(), 24);
        assert_eq!(keys[0], "1A");
        assert_eq!(keys[23], "12B");
    }

    #[test]
    fn test_detectors_in_range() {
        let mut rng = SeededRng::new(11);
        for _ in 0..200 {
            let bpm = detect_bpm(&mut rng);
            assert!((118.0..=134.0).contains(&bpm));
            let energy = detect_energy(&mut rng);
            assert!((1..=10).contains(&energy));
            assert!(MOODS.contains(&detect_mood(&mut rng)));
            assert!(camelot_keys().contains(&detect_key(&mut rng)));
            let dna = detect_dna(&mut rng);
            assert!(dna.traits().iter().all(|(_, v)| *v <= 100));
        }
    }

    #[test]
    fn test_same_seed_same_analysis() {
        let mut a = SeededRng::from_key("https://soundcloud.com/someone/set");
        let mut b = SeededRng::from_key("https://soundcloud.com/someone/set");
        assert_eq!(detect_bpm(&mut a), detect_bpm(&mut b));
        assert_eq!(detect_key(&mut a), detect_key(&mut b));
        assert_eq!(detect_dna(&mut a), detect_dna(&mut b));
    }

    #[test]
    fn test_tracklist_ascending_within_mix() {
        let mut rng = SeededRng::new(3);
        let tracks = detect_tracks(&mut rng, 3600.0);
        assert!(!tracks.is_empty());
        assert_eq!(tracks[0].start_secs, 0.0);
        for pair in tracks.windows(2) {
            assert!(pair[1].start_secs > pair[0].start_secs);
            assert_eq!(pair[1].index, pair[0].index + 1);
        }
        assert!(tracks.iter().all(|t| t.start_secs < 3600.0));
    }

    #[test]
    fn test_empty_mix_has_no_tracks() {
        let mut rng = SeededRng::new(3);
        assert!(detect_tracks(&mut rng, 0.0).is_empty());
    }
}
