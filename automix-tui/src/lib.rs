//! Terminal UI for automix - widgets, themes, and layout

mod app;
mod theme;
pub mod widgets;

pub use app::{App, AppState, MessageType};
pub use theme::{Theme, CRT_AMBER, CRT_GREEN, CYBERPUNK};
pub use widgets::status_bar::HelpWidget;
pub use widgets::{
    AnalysisState, AnalysisWidget, CrossfaderWidget, DeckWidget, LibraryState, LibraryWidget,
    PlayerBarWidget, StatusBarWidget,
};
