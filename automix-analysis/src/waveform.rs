//! Synthetic waveform bars for the deck displays
//!
//! Each bar height is a weighted sum of simulated musical components.
//! The noise floor comes from a seeded generator, so a track id always
//! renders the same picture.

use crate::rng::{hash_str, SeededRng};

/// Lowest bar height produced by the generator
pub const MIN_BAR_HEIGHT: f32 = 4.0;
/// Highest bar height produced by the generator
pub const MAX_BAR_HEIGHT: f32 = 100.0;

/// Dominant frequency band of a waveform bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrequencyBand {
    /// Kick and bassline
    Bass,
    /// Mid texture
    #[default]
    Mid,
    /// Hi-hats and snare transients
    High,
}

/// Single bar of a synthetic waveform
#[derive(Debug, Clone, Copy, Default)]
pub struct WaveformBar {
    /// Height in [4, 100]
    pub height: f32,
    /// Component that contributed most to the height
    pub band: FrequencyBand,
}

/// Energy multiplier for the intro / body / outro sections
fn section_energy(position: f32) -> f32 {
    if position < 0.15 {
        0.6
    } else if position < 0.85 {
        1.0
    } else {
        0.7
    }
}

/// Generate bars with their dominant band
pub fn generate_bars(bar_count: usize, seed: u64) -> Vec<WaveformBar> {
    let mut rng = SeededRng::new(seed);
    let denom = bar_count.max(1) as f32;

    (0..bar_count)
        .map(|i| {
            let x = i as f32;

            // Four-on-the-floor kick with a short decay on the following bar
            let kick = match i % 4 {
                0 => 38.0,
                1 => 16.0,
                _ => 0.0,
            };
            let bass = ((x * 0.15).sin() * 0.5 + 0.5) * 24.0;
            let mid = (x * 0.6).sin().abs() * 12.0;
            let hihat = ((x * 2.3).sin() * 0.5 + 0.5) * 7.0;
            let snare = if i % 8 == 4 { 22.0 } else { 0.0 };

            let energy = section_energy(i as f32 / denom);
            let noise = rng.next_f32() * 8.0;

            let low = kick + bass;
            let high = hihat + snare;
            let band = if low >= mid && low >= high {
                FrequencyBand::Bass
            } else if high >= mid {
                FrequencyBand::High
            } else {
                FrequencyBand::Mid
            };

            let height = ((low + mid + high) * energy + noise + 4.0)
                .clamp(MIN_BAR_HEIGHT, MAX_BAR_HEIGHT);
            WaveformBar { height, band }
        })
        .collect()
}

/// Generate `bar_count` bar heights, each in [4, 100]
pub fn generate_waveform(bar_count: usize, seed: u64) -> Vec<f32> {
    generate_bars(bar_count, seed)
        .into_iter()
        .map(|bar| bar.height)
        .collect()
}

/// Bar heights keyed by a track id
pub fn bar_heights(track_id: &str, bar_count: usize) -> Vec<f32> {
    generate_waveform(bar_count, hash_str(track_id) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_and_bounds() {
        for n in [0, 1, 7, 64, 500] {
            let bars = generate_waveform(n, 1234);
            assert_eq!(bars.len(), n);
            assert!(bars
                .iter()
                .all(|h| (MIN_BAR_HEIGHT..=MAX_BAR_HEIGHT).contains(h)));
        }
    }

    #[test]
    fn test_deterministic_per_seed() {
        assert_eq!(generate_waveform(128, 99), generate_waveform(128, 99));
        assert_ne!(generate_waveform(128, 99), generate_waveform(128, 100));
        assert_eq!(bar_heights("track-1", 64), bar_heights("track-1", 64));
    }

    #[test]
    fn test_kicks_stand_out() {
        let bars = generate_bars(64, 5);
        // Body section, kick bar vs. the quiet bar two steps later
        let kick = bars[32].height;
        let off = bars[34].height;
        assert!(kick > off);
        assert_eq!(bars[32].band, FrequencyBand::Bass);
    }

    #[test]
    fn test_intro_quieter_than_body() {
        let bars = generate_bars(400, 3);
        let intro: f32 = bars[..40].iter().map(|b| b.height).sum::<f32>() / 40.0;
        let body: f32 = bars[160..200].iter().map(|b| b.height).sum::<f32>() / 40.0;
        assert!(intro < body);
    }
}
