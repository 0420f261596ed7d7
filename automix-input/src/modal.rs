//! Modal state machine for keyboard input

use crate::commands::{Command, Direction};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;

/// Volume change per key press
const VOLUME_STEP: i32 = 5;
/// Player seek per key press, in seconds
const SEEK_STEP: f64 = 10.0;

/// Input modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Command,
    Help,
}

impl Mode {
    /// Get display name for the mode
    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Command => "COMMAND",
            Mode::Help => "HELP",
        }
    }
}

/// Handles keyboard input and converts to commands
pub struct InputHandler {
    mode: Mode,
    command_buffer: String,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            mode: Mode::Normal,
            command_buffer: String::new(),
        }
    }

    /// Get current mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Get current command buffer (for display)
    pub fn command_buffer(&self) -> &str {
        &self.command_buffer
    }

    /// Handle a key event and return a command if applicable
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Command::Quit);
        }
        match self.mode {
            Mode::Normal => self.handle_normal_mode(key),
            Mode::Command => self.handle_command_mode(key),
            Mode::Help => self.handle_help_mode(key),
        }
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            // Mode switching
            KeyCode::Char(':') => {
                self.mode = Mode::Command;
                self.command_buffer.clear();
                Some(Command::EnterCommandMode)
            }
            KeyCode::Char('?') => {
                self.mode = Mode::Help;
                Some(Command::ToggleHelp)
            }
            KeyCode::Tab => Some(Command::CycleView),

            // Automation
            KeyCode::Char(' ') => Some(Command::ToggleAutomation),
            KeyCode::Char('r') => Some(Command::ResetMix),

            // Library navigation
            KeyCode::Char('j') | KeyCode::Down => Some(Command::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Command::SelectPrev),
            KeyCode::Char('g') => Some(Command::SelectFirst),
            KeyCode::Char('G') => Some(Command::SelectLast),
            KeyCode::Char('f') => Some(Command::ToggleFavorite),
            KeyCode::Char('v') => Some(Command::CycleLibraryView),
            KeyCode::Enter => Some(Command::PlaySelected),

            // Columns
            KeyCode::Char('[') => Some(Command::FocusColumn(Direction::Left)),
            KeyCode::Char(']') => Some(Command::FocusColumn(Direction::Right)),
            KeyCode::Char('c') => Some(Command::ToggleColumn),
            KeyCode::Char('h') => Some(Command::MoveColumn(Direction::Left)),
            KeyCode::Char('l') => Some(Command::MoveColumn(Direction::Right)),
            KeyCode::Char('C') => Some(Command::ResetColumns),

            // Player
            KeyCode::Char('p') => Some(Command::PlayerToggle),
            KeyCode::Char('+') | KeyCode::Char('=') => Some(Command::AdjustVolume(VOLUME_STEP)),
            KeyCode::Char('-') => Some(Command::AdjustVolume(-VOLUME_STEP)),
            KeyCode::Char('m') => Some(Command::ToggleMute),
            KeyCode::Left | KeyCode::Char(',') => Some(Command::PlayerSeek(-SEEK_STEP)),
            KeyCode::Right | KeyCode::Char('.') => Some(Command::PlayerSeek(SEEK_STEP)),

            KeyCode::Esc => Some(Command::Cancel),

            _ => None,
        }
    }

    fn handle_command_mode(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Enter => {
                let cmd = self.parse_command();
                self.mode = if cmd == Some(Command::ToggleHelp) {
                    Mode::Help
                } else {
                    Mode::Normal
                };
                let buffer = std::mem::take(&mut self.command_buffer);
                cmd.or(Some(Command::ExecuteCommand(buffer)))
            }
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.command_buffer.clear();
                Some(Command::EnterNormalMode)
            }
            KeyCode::Backspace => {
                self.command_buffer.pop();
                if self.command_buffer.is_empty() {
                    self.mode = Mode::Normal;
                    Some(Command::EnterNormalMode)
                } else {
                    None
                }
            }
            KeyCode::Char(c) => {
                self.command_buffer.push(c);
                None
            }
            _ => None,
        }
    }

    fn parse_command(&self) -> Option<Command> {
        let input = self.command_buffer.trim();

        if input == "q" || input == "quit" {
            return Some(Command::Quit);
        }
        if input == "help" {
            return Some(Command::ToggleHelp);
        }

        let (name, rest) = input.split_once(' ').unwrap_or((input, ""));
        let rest = rest.trim();

        match name {
            "analyze" if !rest.is_empty() => Some(Command::Analyze(rest.to_string())),
            "upload" => {
                let paths: Vec<PathBuf> = split_args(rest).into_iter().map(PathBuf::from).collect();
                if paths.is_empty() {
                    None
                } else {
                    Some(Command::Upload(paths))
                }
            }
            "period" => {
                let secs: f64 = rest.parse().ok()?;
                if secs.is_finite() && secs >= 1.0 {
                    Some(Command::SetPeriod((secs * 1000.0).round() as u64))
                } else {
                    None
                }
            }
            "theme" if !rest.is_empty() => Some(Command::SetTheme(rest.to_string())),
            _ => None,
        }
    }

    fn handle_help_mode(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
                self.mode = Mode::Normal;
                Some(Command::ToggleHelp)
            }
            KeyCode::Char('j') | KeyCode::Down => Some(Command::HelpScrollDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Command::HelpScrollUp),
            _ => None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a command line on whitespace, keeping quoted runs together
fn split_args(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            None => current.push(c),
        }
    }
    if !current.is_empty() {
        args.push(current);
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_command(handler: &mut InputHandler, line: &str) -> Option<Command> {
        handler.handle_key(key(KeyCode::Char(':')));
        for c in line.chars() {
            handler.handle_key(key(KeyCode::Char(c)));
        }
        handler.handle_key(key(KeyCode::Enter))
    }

    #[test]
    fn test_normal_keys() {
        let mut h = InputHandler::new();
        assert_eq!(h.handle_key(key(KeyCode::Tab)), Some(Command::CycleView));
        assert_eq!(h.handle_key(key(KeyCode::Char(' '))), Some(Command::ToggleAutomation));
        assert_eq!(h.handle_key(key(KeyCode::Char('f'))), Some(Command::ToggleFavorite));
        assert_eq!(
            h.handle_key(key(KeyCode::Char('l'))),
            Some(Command::MoveColumn(Direction::Right))
        );
        assert_eq!(h.handle_key(key(KeyCode::Char('-'))), Some(Command::AdjustVolume(-5)));
        assert_eq!(h.handle_key(key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_ctrl_q_quits_in_any_mode() {
        let mut h = InputHandler::new();
        h.handle_key(key(KeyCode::Char(':')));
        assert_eq!(h.mode(), Mode::Command);
        let ctrl_q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert_eq!(h.handle_key(ctrl_q), Some(Command::Quit));
    }

    #[test]
    fn test_command_mode_lines() {
        let mut h = InputHandler::new();
        assert_eq!(type_command(&mut h, "q"), Some(Command::Quit));
        assert_eq!(h.mode(), Mode::Normal);
        assert_eq!(
            type_command(&mut h, "analyze https://soundcloud.com/a/b"),
            Some(Command::Analyze("https://soundcloud.com/a/b".into()))
        );
        assert_eq!(type_command(&mut h, "period 24"), Some(Command::SetPeriod(24_000)));
        assert_eq!(
            type_command(&mut h, "theme amber"),
            Some(Command::SetTheme("amber".into()))
        );
    }

    #[test]
    fn test_upload_paths() {
        let mut h = InputHandler::new();
        assert_eq!(
            type_command(&mut h, "upload a.mp3 \"my set.wav\" /tmp/b.flac"),
            Some(Command::Upload(vec![
                PathBuf::from("a.mp3"),
                PathBuf::from("my set.wav"),
                PathBuf::from("/tmp/b.flac"),
            ]))
        );
    }

    #[test]
    fn test_invalid_commands_fall_through() {
        let mut h = InputHandler::new();
        assert_eq!(
            type_command(&mut h, "period 0"),
            Some(Command::ExecuteCommand("period 0".into()))
        );
        assert_eq!(
            type_command(&mut h, "upload"),
            Some(Command::ExecuteCommand("upload".into()))
        );
        assert_eq!(
            type_command(&mut h, "frobnicate"),
            Some(Command::ExecuteCommand("frobnicate".into()))
        );
    }

    #[test]
    fn test_backspace_and_escape() {
        let mut h = InputHandler::new();
        h.handle_key(key(KeyCode::Char(':')));
        h.handle_key(key(KeyCode::Char('x')));
        assert_eq!(h.command_buffer(), "x");
        assert_eq!(h.handle_key(key(KeyCode::Backspace)), Some(Command::EnterNormalMode));
        assert_eq!(h.mode(), Mode::Normal);

        h.handle_key(key(KeyCode::Char(':')));
        h.handle_key(key(KeyCode::Char('y')));
        assert_eq!(h.handle_key(key(KeyCode::Esc)), Some(Command::EnterNormalMode));
        assert!(h.command_buffer().is_empty());
    }

    #[test]
    fn test_help_mode() {
        let mut h = InputHandler::new();
        assert_eq!(h.handle_key(key(KeyCode::Char('?'))), Some(Command::ToggleHelp));
        assert_eq!(h.mode(), Mode::Help);
        assert_eq!(h.handle_key(key(KeyCode::Char('j'))), Some(Command::HelpScrollDown));
        assert_eq!(h.handle_key(key(KeyCode::Esc)), Some(Command::ToggleHelp));
        assert_eq!(h.mode(), Mode::Normal);
    }

    #[test]
    fn test_help_command_enters_help_mode() {
        let mut h = InputHandler::new();
        assert_eq!(type_command(&mut h, "help"), Some(Command::ToggleHelp));
        assert_eq!(h.mode(), Mode::Help);
    }
}
