//! Auto-DJ automation engine
//!
//! Owns both decks and the crossfader and is the only writer of their
//! state. Each frame runs the due ticks of the [`TickScheduler`] in a fixed
//! order: the automation tick assigns targets from the phase cycle, the
//! easing tick moves every control toward its target, and the scroll tick
//! advances the waveforms.

use crate::control::ControlValue;
use crate::deck::{ControlKind, DeckId, DeckState};
use crate::phase::{cycle_position, human_offset, Phase, PhaseConfigError, PhaseThresholds};
use crate::scheduler::TickScheduler;
use automix_analysis::bar_heights;
use std::sync::Arc;
use tracing::{debug, info};

/// Crossfader target while deck A dominates
pub const CROSSFADER_LOW: f32 = 27.0;
/// Crossfader target once the mix has moved to deck B
pub const CROSSFADER_HIGH: f32 = 73.0;
/// Fader target of the dominant deck
pub const FADER_HIGH: f32 = 85.0;
/// Fader target of the cued deck
pub const FADER_LOW: f32 = 15.0;
/// Fader target of the outgoing deck during a transition
pub const FADER_OUTGOING: f32 = 20.0;
pub const EQ_NEUTRAL: f32 = 50.0;
/// Low EQ of a deck whose bass is swapped out
pub const EQ_BASS_CUT: f32 = 22.0;
pub const GAIN_NEUTRAL: f32 = 75.0;

/// Share of the scroll rate a playing but inactive deck gets
const INACTIVE_SCROLL_RATE: f32 = 0.35;

/// Easing speed per control family (fraction of the remaining distance per tick)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSpeeds {
    pub gain: f32,
    pub eq: f32,
    pub fader: f32,
    pub crossfader: f32,
}

impl Default for ControlSpeeds {
    fn default() -> Self {
        Self {
            gain: 0.008,
            eq: 0.015,
            fader: 0.02,
            crossfader: 0.012,
        }
    }
}

impl ControlSpeeds {
    fn for_kind(&self, kind: ControlKind) -> f32 {
        match kind {
            ControlKind::Gain => self.gain,
            ControlKind::EqHigh | ControlKind::EqMid | ControlKind::EqLow => self.eq,
            ControlKind::Fader => self.fader,
        }
    }
}

/// Engine tuning
#[derive(Debug, Clone, PartialEq)]
pub struct AutomationConfig {
    /// Length of one stable / transition cycle
    pub cycle_period_ms: u64,
    pub thresholds: PhaseThresholds,
    pub automation_tick_ms: u64,
    pub easing_tick_ms: u64,
    pub scroll_tick_ms: u64,
    pub speeds: ControlSpeeds,
    /// Bars advanced per scroll tick by the active deck
    pub scroll_speed: f32,
    /// Period of the "human" micro-adjustment oscillator
    pub human_period_ms: u64,
    /// Amplitude of the micro-adjustments, in control units (max 10)
    pub human_amplitude: f32,
    /// Bars in each deck's synthetic waveform
    pub waveform_bars: usize,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            cycle_period_ms: 18_000,
            thresholds: PhaseThresholds::default(),
            automation_tick_ms: 1_000,
            easing_tick_ms: 50,
            scroll_tick_ms: 30,
            speeds: ControlSpeeds::default(),
            scroll_speed: 0.5,
            human_period_ms: 13_000,
            human_amplitude: 4.0,
            waveform_bars: 256,
        }
    }
}

impl AutomationConfig {
    pub fn validate(&self) -> Result<(), PhaseConfigError> {
        if self.cycle_period_ms == 0 {
            return Err(PhaseConfigError::ZeroPeriod);
        }
        self.thresholds.validate()
    }
}

/// A track queued for the decks
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistEntry {
    pub title: String,
    pub length_secs: f64,
}

impl PlaylistEntry {
    pub fn new(title: impl Into<String>, length_secs: f64) -> Self {
        Self {
            title: title.into(),
            length_secs,
        }
    }
}

/// Tracks the demo cycles through when no playlist is supplied
pub fn demo_playlist() -> Vec<PlaylistEntry> {
    vec![
        PlaylistEntry::new("Amelie Lens - Feel It", 372.0),
        PlaylistEntry::new("Charlotte de Witte - Selected", 341.0),
        PlaylistEntry::new("Adam Beyer - Your Mind", 398.0),
        PlaylistEntry::new("Tale Of Us - Nova", 425.0),
        PlaylistEntry::new("Solomun - Customer Is King", 456.0),
    ]
}

/// Things the view reacts to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutomationEvent {
    /// One-shot visual pulse fired when a transition starts; `at_ms` is
    /// the clock reading of the tick that fired it
    Pulse { at_ms: u64 },
    PhaseChanged(Phase),
    /// Transition finished; `incoming` is now the active deck
    TransitionComplete { incoming: DeckId },
}

/// Read-only view of the engine for rendering
#[derive(Debug, Clone)]
pub struct MixerSnapshot {
    pub deck_a: DeckState,
    pub deck_b: DeckState,
    pub crossfader: ControlValue,
    pub phase: Phase,
    /// Position within the cycle, [0, 1)
    pub cycle: f64,
    pub elapsed_ms: u64,
    pub paused: bool,
}

impl Default for MixerSnapshot {
    fn default() -> Self {
        Self {
            deck_a: DeckState::default(),
            deck_b: DeckState::default(),
            crossfader: ControlValue::new(CROSSFADER_LOW),
            phase: Phase::default(),
            cycle: 0.0,
            elapsed_ms: 0,
            paused: false,
        }
    }
}

/// The automation engine
pub struct AutomationEngine {
    config: AutomationConfig,
    scheduler: TickScheduler,
    deck_a: DeckState,
    deck_b: DeckState,
    crossfader: ControlValue,
    phase: Phase,
    /// Phase seen by the previous automation tick
    last_phase: Option<Phase>,
    transition_in_progress: bool,
    /// Deck B played out a transition and needs the next track
    b_needs_cue: bool,
    cycle: f64,
    /// Clock reading the cycle time is measured from
    epoch_ms: u64,
    /// Cycle time at `epoch_ms`
    offset_ms: u64,
    last_now_ms: u64,
    paused_at: Option<u64>,
    playlist: Vec<PlaylistEntry>,
    next_track: usize,
}

impl AutomationEngine {
    /// Create an engine whose cycle starts at clock time `start_ms`
    pub fn new(config: AutomationConfig, playlist: Vec<PlaylistEntry>, start_ms: u64) -> Self {
        let playlist = if playlist.is_empty() {
            demo_playlist()
        } else {
            playlist
        };
        let scheduler = TickScheduler::new(
            config.automation_tick_ms,
            config.easing_tick_ms,
            config.scroll_tick_ms,
            start_ms,
        );
        let mut engine = Self {
            config,
            scheduler,
            deck_a: DeckState::default(),
            deck_b: DeckState::default(),
            crossfader: ControlValue::new(CROSSFADER_LOW),
            phase: Phase::StableA,
            last_phase: None,
            transition_in_progress: false,
            b_needs_cue: false,
            cycle: 0.0,
            epoch_ms: start_ms,
            offset_ms: 0,
            last_now_ms: start_ms,
            paused_at: None,
            playlist,
            next_track: 0,
        };
        engine.init_decks();
        engine
    }

    fn init_decks(&mut self) {
        self.deck_a = DeckState::default();
        self.deck_b = DeckState::default();
        self.cue_next(DeckId::A);
        self.cue_next(DeckId::B);

        self.deck_a.fader.snap_to(FADER_HIGH);
        self.deck_a.playing = true;
        self.deck_a.active = true;

        self.deck_b.fader.snap_to(FADER_LOW);
        self.deck_b.eq_low.snap_to(EQ_BASS_CUT);
    }

    /// Load the next playlist entry onto a deck
    fn cue_next(&mut self, id: DeckId) {
        let entry = self.playlist[self.next_track % self.playlist.len()].clone();
        self.next_track = (self.next_track + 1) % self.playlist.len();
        let waveform = Arc::new(bar_heights(&entry.title, self.config.waveform_bars));
        debug!(deck = %id, track = %entry.title, "cueing track");
        self.deck_mut(id).load(entry.title, entry.length_secs, waveform);
    }

    pub fn config(&self) -> &AutomationConfig {
        &self.config
    }

    pub fn deck(&self, id: DeckId) -> &DeckState {
        match id {
            DeckId::A => &self.deck_a,
            DeckId::B => &self.deck_b,
        }
    }

    fn deck_mut(&mut self, id: DeckId) -> &mut DeckState {
        match id {
            DeckId::A => &mut self.deck_a,
            DeckId::B => &mut self.deck_b,
        }
    }

    pub fn crossfader(&self) -> &ControlValue {
        &self.crossfader
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Cycle time for a clock reading
    fn elapsed(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.epoch_ms) + self.offset_ms
    }

    /// Run every tick due at `now_ms`
    pub fn advance_to(&mut self, now_ms: u64) -> Vec<AutomationEvent> {
        self.last_now_ms = now_ms;
        if self.is_paused() {
            return Vec::new();
        }

        let due = self.scheduler.advance(now_ms);
        let mut events = Vec::new();

        // Targets are a function of time, so one automation pass per frame is enough
        if due.automation > 0 {
            self.run_automation(now_ms, &mut events);
        }
        for _ in 0..due.easing {
            self.easing_tick();
        }
        for _ in 0..due.scroll {
            self.scroll_tick();
        }

        events
    }

    /// Assign targets from the phase cycle at clock time `now_ms`
    pub fn automation_tick(&mut self, now_ms: u64) -> Vec<AutomationEvent> {
        let mut events = Vec::new();
        self.run_automation(now_ms, &mut events);
        events
    }

    fn run_automation(&mut self, now_ms: u64, events: &mut Vec<AutomationEvent>) {
        let elapsed = self.elapsed(now_ms);
        let thresholds = self.config.thresholds;
        self.cycle = cycle_position(elapsed, self.config.cycle_period_ms);
        let phase = Phase::classify(self.cycle, &thresholds);

        if self.last_phase != Some(phase) {
            debug!(?phase, cycle = self.cycle, "phase changed");
            events.push(AutomationEvent::PhaseChanged(phase));
        }

        // Completion edge: first tick after leaving the transition window
        if self.transition_in_progress && phase != Phase::Transitioning {
            self.complete_transition(events);
        }

        match phase {
            Phase::StableA => {
                if self.b_needs_cue && self.last_phase == Some(Phase::StableB) {
                    self.cue_next(DeckId::B);
                    self.deck_b.playing = false;
                    self.b_needs_cue = false;
                }
                if thresholds.in_stable_a_window(self.cycle) {
                    self.apply_stable_a(elapsed);
                }
            }
            Phase::Transitioning => {
                if self.last_phase != Some(Phase::Transitioning) {
                    self.begin_transition(now_ms, events);
                }
                self.apply_transition(elapsed);
            }
            Phase::StableB => {}
        }

        self.phase = phase;
        self.last_phase = Some(phase);
    }

    fn human(&self, elapsed: u64, channel: u32) -> f32 {
        let amplitude = self.config.human_amplitude.clamp(0.0, 10.0);
        human_offset(elapsed, self.config.human_period_ms, amplitude, channel)
    }

    fn apply_stable_a(&mut self, elapsed: u64) {
        let h: [f32; 6] = std::array::from_fn(|ch| self.human(elapsed, ch as u32));

        self.crossfader.set_target(CROSSFADER_LOW + h[0]);

        let a = &mut self.deck_a;
        a.fader.set_target(FADER_HIGH + h[1] * 0.5);
        a.eq_high.set_target(EQ_NEUTRAL + h[2]);
        a.eq_mid.set_target(EQ_NEUTRAL + h[3]);
        a.eq_low.set_target(EQ_NEUTRAL + h[4]);
        a.gain.set_target(GAIN_NEUTRAL + h[5]);
        a.active = true;
        a.playing = true;

        let b = &mut self.deck_b;
        b.fader.set_target(FADER_LOW);
        b.eq_high.set_target(EQ_NEUTRAL);
        b.eq_mid.set_target(EQ_NEUTRAL);
        b.eq_low.set_target(EQ_BASS_CUT);
        b.gain.set_target(GAIN_NEUTRAL);
        b.active = false;
    }

    fn begin_transition(&mut self, now_ms: u64, events: &mut Vec<AutomationEvent>) {
        info!(
            outgoing = %self.deck_a.current_track,
            incoming = %self.deck_b.current_track,
            "transition started"
        );
        events.push(AutomationEvent::Pulse { at_ms: now_ms });
        self.deck_b.playing = true;
        self.transition_in_progress = true;
    }

    fn apply_transition(&mut self, elapsed: u64) {
        let h: [f32; 6] = std::array::from_fn(|ch| self.human(elapsed, ch as u32));

        self.crossfader.set_target(CROSSFADER_HIGH + h[0]);

        // Bass swap: outgoing low EQ down, incoming restored
        let a = &mut self.deck_a;
        a.fader.set_target(FADER_OUTGOING);
        a.eq_low.set_target(EQ_BASS_CUT);

        let b = &mut self.deck_b;
        b.fader.set_target(FADER_HIGH + h[1] * 0.5);
        b.eq_high.set_target(EQ_NEUTRAL + h[2]);
        b.eq_mid.set_target(EQ_NEUTRAL + h[3]);
        b.eq_low.set_target(EQ_NEUTRAL + h[4]);
        b.gain.set_target(GAIN_NEUTRAL + h[5]);
    }

    fn complete_transition(&mut self, events: &mut Vec<AutomationEvent>) {
        // Raise B before dropping A so both are never inactive
        self.deck_b.active = true;
        self.deck_a.active = false;
        self.transition_in_progress = false;
        self.b_needs_cue = true;
        info!(track = %self.deck_b.current_track, "transition complete");
        events.push(AutomationEvent::TransitionComplete {
            incoming: DeckId::B,
        });
        self.cue_next(DeckId::A);
    }

    /// Move every control one step toward its target
    pub fn easing_tick(&mut self) {
        let speeds = self.config.speeds;
        for deck in [&mut self.deck_a, &mut self.deck_b] {
            for kind in ControlKind::ALL {
                deck.control_mut(kind).step(speeds.for_kind(kind));
            }
        }
        self.crossfader.step(speeds.crossfader);
    }

    /// Advance waveform scroll and track countdowns by one scroll tick
    pub fn scroll_tick(&mut self) {
        let speed = self.config.scroll_speed;
        let dt_secs = self.scheduler.scroll_period_ms() as f64 / 1000.0;
        for deck in [&mut self.deck_a, &mut self.deck_b] {
            let rate = if deck.active {
                1.0
            } else if deck.playing {
                INACTIVE_SCROLL_RATE
            } else {
                0.0
            };
            let bars = deck.waveform.len() as f32;
            if rate > 0.0 && bars > 0.0 {
                deck.scroll_offset = (deck.scroll_offset + speed * rate) % bars;
            }
            deck.advance_time(dt_secs);
        }
    }

    /// Freeze the cycle and all controls
    pub fn pause(&mut self) {
        if self.paused_at.is_none() {
            info!("automation paused");
            self.paused_at = Some(self.last_now_ms);
        }
    }

    /// Continue from where the cycle was paused
    pub fn resume(&mut self, now_ms: u64) {
        if let Some(paused_at) = self.paused_at.take() {
            self.epoch_ms += now_ms.saturating_sub(paused_at);
            self.scheduler.reset(now_ms);
            self.last_now_ms = now_ms;
            info!("automation resumed");
        }
    }

    pub fn toggle_pause(&mut self, now_ms: u64) {
        if self.is_paused() {
            self.resume(now_ms);
        } else {
            self.last_now_ms = now_ms;
            self.pause();
        }
    }

    /// Start over from fresh state at `now_ms`
    pub fn reset(&mut self, now_ms: u64) {
        info!("automation reset");
        self.epoch_ms = now_ms;
        self.offset_ms = 0;
        self.last_now_ms = now_ms;
        self.paused_at = None;
        self.scheduler.reset(now_ms);
        self.crossfader = ControlValue::new(CROSSFADER_LOW);
        self.phase = Phase::StableA;
        self.last_phase = None;
        self.transition_in_progress = false;
        self.b_needs_cue = false;
        self.cycle = 0.0;
        self.next_track = 0;
        self.init_decks();
    }

    /// Change the cycle length, keeping the current cycle position
    ///
    /// While paused the position is taken at the pause instant, so resuming
    /// continues from there.
    pub fn set_period(&mut self, period_ms: u64, now_ms: u64) -> Result<(), PhaseConfigError> {
        if period_ms == 0 {
            return Err(PhaseConfigError::ZeroPeriod);
        }
        let reference = self.paused_at.unwrap_or(now_ms);
        let position = cycle_position(self.elapsed(reference), self.config.cycle_period_ms);
        self.epoch_ms = reference;
        self.offset_ms = (position * period_ms as f64).round() as u64;
        self.config.cycle_period_ms = period_ms;
        info!(period_ms, "cycle period changed");
        Ok(())
    }

    pub fn snapshot(&self) -> MixerSnapshot {
        let reference = self.paused_at.unwrap_or(self.last_now_ms);
        MixerSnapshot {
            deck_a: self.deck_a.clone(),
            deck_b: self.deck_b.clone(),
            crossfader: self.crossfader,
            phase: self.phase,
            cycle: self.cycle,
            elapsed_ms: self.elapsed(reference),
            paused: self.is_paused(),
        }
    }
}
