//! Mixer automation for automix - decks, easing, and the phase cycle
//!
//! This module provides the autonomous mixing simulation:
//! - Control: knobs and faders easing toward targets
//! - Deck: per-deck gain, EQ, fader and transport flags
//! - Phase: the stable / transition cycle driven by elapsed time
//! - Scheduler: fixed-tick cadences applied in a defined order
//! - Automation: the engine that ties them together
//! - Engine: the thread that runs it for the UI
//! - Player: the player bar's transport state

mod automation;
mod control;
mod deck;
mod engine;
mod phase;
mod player;
mod scheduler;

pub use automation::{
    demo_playlist, AutomationConfig, AutomationEngine, AutomationEvent, ControlSpeeds,
    MixerSnapshot, PlaylistEntry, CROSSFADER_HIGH, CROSSFADER_LOW,
};
pub use control::{ControlValue, CONTROL_MAX, CONTROL_MIN, SNAP_EPSILON};
pub use deck::{ControlKind, DeckId, DeckState};
pub use engine::{run_engine_loop, run_engine_thread, MixerCommand, MixerEngine, MixerEvent};
pub use phase::{
    cycle_position, human_offset, phase_at, Phase, PhaseConfigError, PhaseThresholds,
};
pub use player::{format_time, PlayerState, PlayerTrack};
pub use scheduler::{Cadence, Clock, DueTicks, ManualClock, SystemClock, TickScheduler};
