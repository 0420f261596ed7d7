//! Command definitions for automix

use std::path::PathBuf;

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Mixer,
    Library,
    Analysis,
}

impl View {
    pub fn next(self) -> Self {
        match self {
            View::Mixer => View::Library,
            View::Library => View::Analysis,
            View::Analysis => View::Mixer,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Mixer => "MIXER",
            View::Library => "LIBRARY",
            View::Analysis => "ANALYSIS",
        }
    }
}

/// Navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Commands that can be dispatched from input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // Automation
    ToggleAutomation,
    ResetMix,
    /// Cycle period in milliseconds
    SetPeriod(u64),

    // Library
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,
    ToggleFavorite,
    CycleLibraryView,
    FocusColumn(Direction),
    ToggleColumn,
    MoveColumn(Direction),
    ResetColumns,
    Upload(Vec<PathBuf>),

    // Analysis
    Analyze(String),

    // Player
    PlaySelected,
    PlayerToggle,
    PlayerSeek(f64),
    AdjustVolume(i32),
    ToggleMute,

    // UI
    CycleView,
    ToggleHelp,
    HelpScrollUp,
    HelpScrollDown,
    SetTheme(String),

    // Mode changes
    EnterCommandMode,
    EnterNormalMode,

    // Application
    Quit,
    Cancel,

    /// Unrecognized command line
    ExecuteCommand(String),
}
