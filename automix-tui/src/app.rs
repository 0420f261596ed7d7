//! Application state management (Elm architecture)

use crate::theme::Theme;
use crate::widgets::{AnalysisState, LibraryState};
use automix_core::{
    AutomationEvent, MixerEvent, MixerSnapshot, PhaseThresholds, PlayerState, PlayerTrack,
};
use automix_input::{Mode, View};
use automix_library::Track;

/// Frames a status message stays visible (~4s at 30fps)
const MESSAGE_FRAMES: u32 = 120;
/// Pulse flash decay per frame
const PULSE_DECAY: f32 = 0.85;

/// Message type for colored status messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageType {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// Application state
pub struct AppState {
    /// Latest state published by the mixer engine
    pub mixer: MixerSnapshot,
    /// Phase boundaries the engine runs with, for the cycle timeline
    pub thresholds: PhaseThresholds,
    pub view: View,

    // UI state
    pub mode: Mode,
    pub command_buffer: String,
    pub message: Option<String>,
    pub message_type: MessageType,
    message_frames: u32,
    pub show_help: bool,
    pub help_scroll: u16,

    pub library: LibraryState,
    pub analysis: AnalysisState,
    pub player: PlayerState,

    pub theme: Theme,

    // Animation state
    pub frame_count: u64,
    /// Transition pulse flash (0.0-1.0, decays each frame)
    pub pulse: f32,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mixer: MixerSnapshot::default(),
            thresholds: PhaseThresholds::default(),
            view: View::default(),
            mode: Mode::Normal,
            command_buffer: String::new(),
            message: None,
            message_type: MessageType::Info,
            message_frames: 0,
            show_help: false,
            help_scroll: 0,
            library: LibraryState::default(),
            analysis: AnalysisState::default(),
            player: PlayerState::new(),
            theme: Theme::default(),
            frame_count: 0,
            pulse: 0.0,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update state from a mixer engine event
    pub fn handle_mixer_event(&mut self, event: MixerEvent) {
        match event {
            MixerEvent::StateUpdate(snapshot) => {
                self.mixer = *snapshot;
            }
            MixerEvent::Automation(AutomationEvent::Pulse { .. }) => {
                self.pulse = 1.0;
            }
            MixerEvent::Automation(AutomationEvent::TransitionComplete { incoming }) => {
                self.set_message(format!("Deck {} now leads the mix", incoming));
            }
            MixerEvent::Automation(AutomationEvent::PhaseChanged(_)) => {}
            MixerEvent::PauseChanged(paused) => {
                self.mixer.paused = paused;
                if paused {
                    self.set_message("Automation paused");
                } else {
                    self.set_message("Automation resumed");
                }
            }
            MixerEvent::Error(msg) => {
                self.set_error(format!("Error: {}", msg));
            }
        }
    }

    /// Advance per-frame animation (call once per rendered frame)
    pub fn tick(&mut self, dt_secs: f64) {
        self.frame_count = self.frame_count.wrapping_add(1);

        self.pulse *= PULSE_DECAY;
        if self.pulse < 0.01 {
            self.pulse = 0.0;
        }

        if self.message_frames > 0 {
            self.message_frames -= 1;
            if self.message_frames == 0 {
                self.clear_message();
            }
        }

        self.player.advance(dt_secs);
    }

    /// Set current mode
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        if mode != Mode::Command {
            self.command_buffer.clear();
        }
    }

    pub fn cycle_view(&mut self) {
        self.view = self.view.next();
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0;
        }
    }

    pub fn help_scroll_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(3);
    }

    pub fn help_scroll_down(&mut self) {
        self.help_scroll = self.help_scroll.saturating_add(3);
    }

    /// Set theme by name; returns whether it was recognized
    pub fn set_theme(&mut self, name: &str) -> bool {
        match Theme::by_name(name) {
            Some(theme) => {
                self.theme = theme;
                self.set_success(format!("Theme set to: {}", self.theme.name));
                true
            }
            None => {
                self.set_error(format!("Unknown theme: {}. Use green/amber/cyber", name));
                false
            }
        }
    }

    /// Load a library track into the player bar
    pub fn play_track(&mut self, track: &Track) {
        self.player.load(PlayerTrack {
            id: track.id.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            duration_secs: track.duration_secs,
        });
        self.set_message(format!("Playing: {} - {}", track.artist, track.title));
    }

    pub fn clear_message(&mut self) {
        self.message = None;
        self.message_type = MessageType::Info;
        self.message_frames = 0;
    }

    fn show(&mut self, msg: String, message_type: MessageType) {
        self.message = Some(msg);
        self.message_type = message_type;
        self.message_frames = MESSAGE_FRAMES;
    }

    /// Set a message to display (info level)
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.show(msg.into(), MessageType::Info);
    }

    /// Set a success message (green)
    pub fn set_success(&mut self, msg: impl Into<String>) {
        self.show(msg.into(), MessageType::Success);
    }

    /// Set a warning message (yellow)
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.show(msg.into(), MessageType::Warning);
    }

    /// Set an error message (red)
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.show(msg.into(), MessageType::Error);
    }
}

/// Main application wrapper
pub struct App {
    pub state: AppState,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
