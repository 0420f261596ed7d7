//! Virtual deck state - gain, 3-band EQ, channel fader, transport flags

use crate::control::ControlValue;
use std::sync::Arc;

/// Deck identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeckId {
    A,
    B,
}

impl DeckId {
    /// The opposite deck
    pub fn other(self) -> Self {
        match self {
            DeckId::A => DeckId::B,
            DeckId::B => DeckId::A,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DeckId::A => "A",
            DeckId::B => "B",
        }
    }
}

impl std::fmt::Display for DeckId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Which knob or fader of a deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    Gain,
    EqHigh,
    EqMid,
    EqLow,
    Fader,
}

impl ControlKind {
    pub const ALL: [ControlKind; 5] = [
        ControlKind::Gain,
        ControlKind::EqHigh,
        ControlKind::EqMid,
        ControlKind::EqLow,
        ControlKind::Fader,
    ];

    /// Short label for meters
    pub fn label(self) -> &'static str {
        match self {
            ControlKind::Gain => "GAIN",
            ControlKind::EqHigh => "HI",
            ControlKind::EqMid => "MID",
            ControlKind::EqLow => "LOW",
            ControlKind::Fader => "VOL",
        }
    }
}

/// Complete state of one virtual deck
#[derive(Debug, Clone)]
pub struct DeckState {
    pub gain: ControlValue,
    pub eq_high: ControlValue,
    pub eq_mid: ControlValue,
    pub eq_low: ControlValue,
    pub fader: ControlValue,
    /// Transport running
    pub playing: bool,
    /// Deck dominates the mix
    pub active: bool,
    pub current_track: String,
    /// Seconds left in the current track
    pub remaining_secs: f64,
    pub track_length_secs: f64,
    /// Waveform scroll position, in bars
    pub scroll_offset: f32,
    /// Synthetic waveform of the current track
    pub waveform: Arc<Vec<f32>>,
}

impl Default for DeckState {
    fn default() -> Self {
        Self {
            gain: ControlValue::new(75.0),
            eq_high: ControlValue::new(50.0),
            eq_mid: ControlValue::new(50.0),
            eq_low: ControlValue::new(50.0),
            fader: ControlValue::new(0.0),
            playing: false,
            active: false,
            current_track: String::new(),
            remaining_secs: 0.0,
            track_length_secs: 0.0,
            scroll_offset: 0.0,
            waveform: Arc::new(Vec::new()),
        }
    }
}

impl DeckState {
    /// Load a track, resetting its countdown and scroll position
    pub fn load(&mut self, title: impl Into<String>, length_secs: f64, waveform: Arc<Vec<f32>>) {
        self.current_track = title.into();
        self.track_length_secs = length_secs.max(0.0);
        self.remaining_secs = self.track_length_secs;
        self.scroll_offset = 0.0;
        self.waveform = waveform;
    }

    pub fn control(&self, kind: ControlKind) -> &ControlValue {
        match kind {
            ControlKind::Gain => &self.gain,
            ControlKind::EqHigh => &self.eq_high,
            ControlKind::EqMid => &self.eq_mid,
            ControlKind::EqLow => &self.eq_low,
            ControlKind::Fader => &self.fader,
        }
    }

    pub fn control_mut(&mut self, kind: ControlKind) -> &mut ControlValue {
        match kind {
            ControlKind::Gain => &mut self.gain,
            ControlKind::EqHigh => &mut self.eq_high,
            ControlKind::EqMid => &mut self.eq_mid,
            ControlKind::EqLow => &mut self.eq_low,
            ControlKind::Fader => &mut self.fader,
        }
    }

    /// All controls with their kind, in display order
    pub fn controls(&self) -> impl Iterator<Item = (ControlKind, &ControlValue)> + '_ {
        ControlKind::ALL.into_iter().map(move |kind| (kind, self.control(kind)))
    }

    /// Remaining time as shown on the deck, e.g. "-3:07"
    pub fn time_remaining(&self) -> String {
        let total = self.remaining_secs.max(0.0).ceil() as u64;
        format!("-{}:{:02}", total / 60, total % 60)
    }

    /// Count the transport down, looping the track at its end
    pub fn advance_time(&mut self, dt_secs: f64) {
        if !self.playing || self.track_length_secs <= 0.0 {
            return;
        }
        self.remaining_secs -= dt_secs;
        if self.remaining_secs <= 0.0 {
            self.remaining_secs += self.track_length_secs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_deck() {
        assert_eq!(DeckId::A.other(), DeckId::B);
        assert_eq!(DeckId::B.other(), DeckId::A);
        assert_eq!(DeckId::B.to_string(), "B");
    }

    #[test]
    fn test_time_remaining_format() {
        let mut deck = DeckState::default();
        deck.load("Track", 187.0, Arc::new(Vec::new()));
        assert_eq!(deck.time_remaining(), "-3:07");
        deck.remaining_secs = 5.2;
        assert_eq!(deck.time_remaining(), "-0:06");
        deck.remaining_secs = -1.0;
        assert_eq!(deck.time_remaining(), "-0:00");
    }

    #[test]
    fn test_countdown_only_while_playing() {
        let mut deck = DeckState::default();
        deck.load("Track", 10.0, Arc::new(Vec::new()));
        deck.advance_time(3.0);
        assert_eq!(deck.remaining_secs, 10.0);

        deck.playing = true;
        deck.advance_time(3.0);
        assert_eq!(deck.remaining_secs, 7.0);

        // Loops at the end
        deck.advance_time(8.0);
        assert!((deck.remaining_secs - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_control_accessors() {
        let mut deck = DeckState::default();
        deck.control_mut(ControlKind::EqLow).set_target(20.0);
        assert_eq!(deck.eq_low.target(), 20.0);
        let kinds: Vec<_> = deck.controls().map(|(k, _)| k).collect();
        assert_eq!(kinds, ControlKind::ALL.to_vec());
    }
}
