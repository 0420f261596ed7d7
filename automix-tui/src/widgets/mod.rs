//! UI Widgets for automix

mod analysis;
mod crossfader;
mod deck;
mod library;
mod player;
pub mod status_bar;

pub use analysis::{AnalysisState, AnalysisWidget};
pub use crossfader::CrossfaderWidget;
pub use deck::DeckWidget;
pub use library::{LibraryState, LibraryWidget};
pub use player::PlayerBarWidget;
pub use status_bar::StatusBarWidget;
