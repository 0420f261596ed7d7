//! Status bar widget - mode indicator, command line and toast messages

use crate::app::MessageType;
use crate::theme::Theme;
use automix_input::{Mode, View};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// Widget for displaying the status bar with mode and command input
pub struct StatusBarWidget<'a> {
    mode: Mode,
    view: View,
    command_buffer: &'a str,
    message: Option<&'a str>,
    message_type: MessageType,
    theme: &'a Theme,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(mode: Mode, command_buffer: &'a str, theme: &'a Theme) -> Self {
        Self {
            mode,
            view: View::default(),
            command_buffer,
            message: None,
            message_type: MessageType::Info,
            theme,
        }
    }

    pub fn view(mut self, view: View) -> Self {
        self.view = view;
        self
    }

    pub fn message(mut self, msg: Option<&'a str>, msg_type: MessageType) -> Self {
        self.message = msg;
        self.message_type = msg_type;
        self
    }

    fn mode_string(&self) -> (&'static str, Style) {
        match self.mode {
            Mode::Normal => (self.mode.display_name(), self.theme.highlight()),
            Mode::Command => (self.mode.display_name(), Style::default().fg(self.theme.accent)),
            Mode::Help => (self.mode.display_name(), self.theme.highlight()),
        }
    }

    fn hint(&self) -> &'static str {
        match (self.mode, self.view) {
            (Mode::Command, _) => "Enter:run  Esc:cancel",
            (Mode::Help, _) => "Esc:close help",
            (Mode::Normal, View::Mixer) => "Tab:view  spc:pause  ?:help",
            (Mode::Normal, View::Library) => "j/k f:fav c/h/l:cols",
            (Mode::Normal, View::Analysis) => ":analyze  :upload",
        }
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let [mode_area, view_area, content_area, hint_area] = Layout::horizontal([
            Constraint::Length(10),
            Constraint::Length(11),
            Constraint::Min(20),
            Constraint::Length(28),
        ])
        .areas(area);

        let (mode_text, mode_style) = self.mode_string();
        Paragraph::new(Line::from(vec![
            Span::raw("["),
            Span::styled(mode_text, mode_style),
            Span::raw("]"),
        ]))
        .render(mode_area, buf);

        Paragraph::new(Line::from(Span::styled(self.view.title(), self.theme.title())))
            .render(view_area, buf);

        let content = if self.mode == Mode::Command {
            Line::from(vec![
                Span::styled(":", Style::default().fg(self.theme.accent)),
                Span::styled(self.command_buffer, self.theme.normal()),
                Span::styled("█", self.theme.highlight()),
            ])
        } else if let Some(msg) = self.message {
            let msg_style = match self.message_type {
                MessageType::Info => self.theme.dim(),
                MessageType::Success => Style::default().fg(self.theme.accent),
                MessageType::Warning => Style::default().fg(self.theme.warning),
                MessageType::Error => Style::default().fg(self.theme.danger),
            };
            Line::from(Span::styled(msg, msg_style))
        } else {
            Line::from(Span::styled(
                "Ready. Press ? for help, : for commands",
                self.theme.dim(),
            ))
        };
        Paragraph::new(content).render(content_area, buf);

        Paragraph::new(Line::from(Span::styled(self.hint(), self.theme.dim())))
            .render(hint_area, buf);
    }
}

/// Help overlay widget with scrolling support
pub struct HelpWidget<'a> {
    theme: &'a Theme,
    scroll: u16,
}

impl<'a> HelpWidget<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme, scroll: 0 }
    }

    pub fn scroll(mut self, scroll: u16) -> Self {
        self.scroll = scroll;
        self
    }

    fn help_lines() -> &'static [&'static str] {
        &[
            "╔══════════════════════════════════════════════════════╗",
            "║                 automix - auto DJ mixer              ║",
            "║                ↑/↓ or j/k to scroll                  ║",
            "╠══════════════════════════════════════════════════════╣",
            "║ GENERAL                                              ║",
            "║   Tab           Cycle Mixer / Library / Analysis     ║",
            "║   ?             Toggle this help                     ║",
            "║   :             Command line                         ║",
            "║   Ctrl-q        Quit                                 ║",
            "╠──────────────────────────────────────────────────────╣",
            "║ MIXER                                                ║",
            "║   space         Pause / resume the automation        ║",
            "║   r             Reset the mix to deck A              ║",
            "╠──────────────────────────────────────────────────────╣",
            "║ LIBRARY                                              ║",
            "║   j / k         Select next / previous track         ║",
            "║   g / G         First / last track                   ║",
            "║   Enter         Play selected track                  ║",
            "║   f             Toggle favorite                      ║",
            "║   v             Cycle Audio / Analysis / DNA table   ║",
            "║   [ / ]         Focus previous / next column         ║",
            "║   c             Show / hide focused column           ║",
            "║   h / l         Move focused column left / right     ║",
            "║   C             Restore default columns              ║",
            "╠──────────────────────────────────────────────────────╣",
            "║ PLAYER                                               ║",
            "║   p             Play / pause                         ║",
            "║   ← / →  , / .  Seek -10s / +10s                     ║",
            "║   + / -         Volume up / down                     ║",
            "║   m             Mute                                 ║",
            "╠──────────────────────────────────────────────────────╣",
            "║ COMMANDS (:)                                         ║",
            "║   :analyze <url|upload-id>  Analyze a mix            ║",
            "║   :upload <path>...         Import audio files       ║",
            "║   :period <secs>            Automation cycle length  ║",
            "║   :theme <name>             green / amber / cyber    ║",
            "║   :q                        Quit                     ║",
            "╠══════════════════════════════════════════════════════╣",
            "║              Press Esc or ? to close help            ║",
            "╚══════════════════════════════════════════════════════╝",
        ]
    }
}

impl Widget for HelpWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                buf[(x, y)].set_char(' ').set_style(self.theme.normal());
            }
        }

        let help_text = Self::help_lines();
        let total_lines = help_text.len() as u16;
        let visible_lines = area.height.min(total_lines);

        let max_scroll = total_lines.saturating_sub(visible_lines);
        let scroll = self.scroll.min(max_scroll);

        let start_x = area.x + area.width.saturating_sub(56) / 2;

        for (i, line) in help_text
            .iter()
            .skip(scroll as usize)
            .take(visible_lines as usize)
            .enumerate()
        {
            let y = area.y + i as u16;
            for (j, ch) in line.chars().enumerate() {
                let x = start_x + j as u16;
                if x >= area.x + area.width {
                    break;
                }
                let style = if "║╔╗╚╝═╠╣─".contains(ch) {
                    self.theme.border()
                } else {
                    self.theme.normal()
                };
                buf[(x, y)].set_char(ch).set_style(style);
            }
        }

        if total_lines > visible_lines && area.height > 0 {
            let indicator = format!(" [{}/{}] ", scroll + 1, max_scroll + 1);
            let indicator_x = area.x + area.width.saturating_sub(indicator.len() as u16 + 2);
            let indicator_y = area.y + area.height - 1;
            for (i, ch) in indicator.chars().enumerate() {
                let x = indicator_x + i as u16;
                if x < area.x + area.width {
                    buf[(x, indicator_y)].set_char(ch).set_style(self.theme.dim());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol().to_string()).collect()
    }

    #[test]
    fn test_command_line_shown() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 100, 1);
        let mut buf = Buffer::empty(area);
        StatusBarWidget::new(Mode::Command, "period 20", &theme).render(area, &mut buf);
        assert!(row(&buf, 0).contains(":period 20"));
    }

    #[test]
    fn test_message_shown() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 100, 1);
        let mut buf = Buffer::empty(area);
        StatusBarWidget::new(Mode::Normal, "", &theme)
            .view(View::Library)
            .message(Some("Uploaded 2 file(s)"), MessageType::Success)
            .render(area, &mut buf);
        let text = row(&buf, 0);
        assert!(text.contains("LIBRARY"));
        assert!(text.contains("Uploaded 2 file(s)"));
    }

    #[test]
    fn test_help_lines_same_width() {
        let width = HelpWidget::help_lines()[0].chars().count();
        for line in HelpWidget::help_lines() {
            assert_eq!(line.chars().count(), width, "{line}");
        }
    }
}
