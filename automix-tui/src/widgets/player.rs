//! Player bar - transport, progress and volume of the previewed track

use crate::theme::Theme;
use automix_core::{format_time, PlayerState};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Widget for the bottom player bar
pub struct PlayerBarWidget<'a> {
    state: &'a PlayerState,
    theme: &'a Theme,
}

impl<'a> PlayerBarWidget<'a> {
    pub fn new(state: &'a PlayerState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    fn progress_line(&self, width: usize) -> Line<'a> {
        let duration = self.state.track().map_or(0.0, |t| t.duration_secs);
        let elapsed = format_time(self.state.position_secs());
        let total = format_time(duration);
        let bar_width = width.saturating_sub(elapsed.len() + total.len() + 2);
        let filled = (self.state.progress() * bar_width as f64) as usize;

        Line::from(vec![
            Span::styled(elapsed, self.theme.normal()),
            Span::raw(" "),
            Span::styled("━".repeat(filled), self.theme.deck_a_style()),
            Span::styled("─".repeat(bar_width - filled), self.theme.dim()),
            Span::raw(" "),
            Span::styled(total, self.theme.dim()),
        ])
    }

    fn volume_line(&self) -> Line<'a> {
        let icon = if self.state.is_muted() || self.state.volume() == 0 {
            "MUTE"
        } else {
            "VOL "
        };
        let level = self.state.effective_volume() as usize / 10;
        Line::from(vec![
            Span::styled(format!("{} ", icon), self.theme.dim()),
            Span::styled("▮".repeat(level), self.theme.meter_style(level as f32 / 10.0)),
            Span::styled("▯".repeat(10 - level), self.theme.dim()),
            Span::styled(format!(" {:3}", self.state.volume()), self.theme.normal()),
        ])
    }
}

impl Widget for PlayerBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(self.theme.border());
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 1 || inner.width < 40 {
            return;
        }

        let [info_area, progress_area, volume_area] = Layout::horizontal([
            Constraint::Percentage(30),
            Constraint::Min(20),
            Constraint::Length(18),
        ])
        .areas(inner);

        let (symbol, symbol_style) = if self.state.is_playing() {
            ("▶", self.theme.highlight())
        } else {
            ("⏸", self.theme.dim())
        };
        let info = match self.state.track() {
            Some(track) => Line::from(vec![
                Span::styled(format!(" {} ", symbol), symbol_style),
                Span::styled(track.title.clone(), self.theme.normal()),
                Span::styled(format!(" - {}", track.artist), self.theme.dim()),
            ]),
            None => Line::from(Span::styled(
                " Nothing playing (Enter on a track)",
                self.theme.dim(),
            )),
        };
        Paragraph::new(info).render(info_area, buf);
        Paragraph::new(self.progress_line(progress_area.width as usize)).render(progress_area, buf);
        Paragraph::new(self.volume_line()).render(volume_area, buf);
    }
}
