//! Procedural analysis for automix
//!
//! Nothing here touches real audio. Waveforms are synthesized from
//! simulated kick/bass/mid/high components and the "detectors" return
//! seeded random values, so identical inputs always give identical output.

mod rng;
mod stubs;
mod waveform;

pub use rng::{hash_str, SeededRng};
pub use stubs::{
    camelot_keys, detect_bpm, detect_dna, detect_energy, detect_key, detect_mood, detect_tracks,
    DetectedTrack, DnaProfile, MOODS,
};
pub use waveform::{
    bar_heights, generate_bars, generate_waveform, FrequencyBand, WaveformBar, MAX_BAR_HEIGHT,
    MIN_BAR_HEIGHT,
};
