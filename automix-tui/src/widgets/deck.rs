//! Deck widget - track info, control meters and the scrolling waveform

use crate::theme::Theme;
use automix_core::{ControlValue, DeckId, DeckState};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Characters for vertical bar rendering (8 levels + empty)
const BAR_CHARS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
/// Synthetic bar heights are percentages
const WAVEFORM_SCALE: f32 = 100.0;

/// Widget for displaying one virtual deck
pub struct DeckWidget<'a> {
    state: &'a DeckState,
    id: DeckId,
    theme: &'a Theme,
}

impl<'a> DeckWidget<'a> {
    pub fn new(state: &'a DeckState, id: DeckId, theme: &'a Theme) -> Self {
        Self { state, id, theme }
    }

    fn deck_style(&self) -> Style {
        match self.id {
            DeckId::A => self.theme.deck_a_style(),
            DeckId::B => self.theme.deck_b_style(),
        }
    }

    fn render_header(&self, width: usize) -> Line<'a> {
        let (symbol, symbol_style) = if self.state.playing {
            ("▶", self.theme.highlight())
        } else {
            ("⏸", self.theme.dim())
        };
        let time = self.state.time_remaining();
        let title_width = width.saturating_sub(time.len() + 5);
        let title: String = if self.state.current_track.is_empty() {
            "--- no track ---".chars().take(title_width).collect()
        } else {
            self.state.current_track.chars().take(title_width).collect()
        };
        let padding = width.saturating_sub(title.chars().count() + time.len() + 4);

        Line::from(vec![
            Span::styled(format!(" {} ", symbol), symbol_style),
            Span::styled(title, self.theme.normal()),
            Span::raw(" ".repeat(padding)),
            Span::styled(time, self.deck_style().add_modifier(Modifier::BOLD)),
        ])
    }

    /// Meter of a 0-100 control with its target marked
    fn render_meter(&self, label: &'static str, control: &ControlValue, width: usize) -> Line<'a> {
        let bar_width = width.saturating_sub(10);
        let filled = (control.normalized() * bar_width as f32).round() as usize;
        let target_pos = ((control.target() / 100.0) * bar_width as f32).round() as usize;

        let mut spans = vec![Span::styled(format!(" {:<4}", label), self.theme.dim())];
        for i in 0..bar_width {
            let level = i as f32 / bar_width.max(1) as f32;
            let span = if i < filled {
                Span::styled("█", self.theme.meter_style(level))
            } else if i == target_pos && !control.is_settled() {
                Span::styled("│", self.theme.highlight())
            } else {
                Span::styled("░", self.theme.dim())
            };
            spans.push(span);
        }
        spans.push(Span::styled(
            format!(" {:3.0}", control.value()),
            self.theme.normal(),
        ));
        Line::from(spans)
    }

    /// Waveform rows, scrolled so bar `scroll_offset` sits at the left edge
    fn render_waveform(&self, width: usize, rows: usize) -> Vec<Line<'a>> {
        let bars = &self.state.waveform;
        if bars.is_empty() || rows == 0 {
            return vec![Line::from(Span::styled("─".repeat(width), self.theme.dim()))];
        }

        let start = self.state.scroll_offset.max(0.0) as usize;
        let style = self.theme.waveform_style(self.state.active);
        let playhead = width / 2;
        let levels = rows * 8;

        let heights: Vec<usize> = (0..width)
            .map(|i| {
                let h = bars[(start + i) % bars.len()] / WAVEFORM_SCALE;
                (h.clamp(0.0, 1.0) * levels as f32).round() as usize
            })
            .collect();

        (0..rows)
            .map(|row| {
                // Row 0 is the top
                let floor = (rows - 1 - row) * 8;
                let spans: Vec<Span> = heights
                    .iter()
                    .enumerate()
                    .map(|(i, &h)| {
                        let fill = h.saturating_sub(floor).min(8);
                        let ch = BAR_CHARS[fill];
                        if i == playhead {
                            let ch = if fill == 0 { '│' } else { ch };
                            Span::styled(ch.to_string(), self.theme.highlight())
                        } else {
                            Span::styled(ch.to_string(), style)
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

impl Widget for DeckWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.state.active {
            format!(" ● DECK {} LIVE ", self.id)
        } else {
            format!("   DECK {}   ", self.id)
        };
        let border_style = if self.state.active {
            self.deck_style()
        } else {
            self.theme.border()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Span::styled(title, self.deck_style().add_modifier(Modifier::BOLD)));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 20 || inner.height < 2 {
            return;
        }

        let width = inner.width as usize;
        let mut lines = vec![self.render_header(width)];

        let meter_rows = (inner.height as usize).saturating_sub(2).min(5);
        for (kind, control) in self.state.controls().take(meter_rows) {
            lines.push(self.render_meter(kind.label(), control, width));
        }

        let waveform_rows = (inner.height as usize).saturating_sub(lines.len());
        lines.extend(self.render_waveform(width, waveform_rows));

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol().to_string()).collect()
    }

    #[test]
    fn test_header_and_meters_render() {
        let mut deck = DeckState::default();
        deck.load("Midnight Drive", 187.0, Arc::new(vec![50.0; 16]));
        deck.active = true;
        deck.playing = true;

        let theme = Theme::default();
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        DeckWidget::new(&deck, DeckId::A, &theme).render(area, &mut buf);

        assert!(row(&buf, 0).contains("DECK A LIVE"));
        assert!(row(&buf, 1).contains("Midnight Drive"));
        assert!(row(&buf, 1).contains("-3:07"));
        assert!(row(&buf, 2).contains("GAIN"));
        assert!(row(&buf, 6).contains("VOL"));
    }

    #[test]
    fn test_waveform_scrolls() {
        let mut deck = DeckState::default();
        let mut bars = vec![4.0; 8];
        bars[0] = 100.0;
        deck.load("T", 60.0, Arc::new(bars));
        let theme = Theme::default();

        let widget = DeckWidget::new(&deck, DeckId::B, &theme);
        let lines = widget.render_waveform(8, 1);
        assert_eq!(lines[0].spans[0].content, "█");

        deck.scroll_offset = 7.0;
        let widget = DeckWidget::new(&deck, DeckId::B, &theme);
        let lines = widget.render_waveform(8, 1);
        assert_eq!(lines[0].spans[1].content, "█");
    }

    #[test]
    fn test_empty_deck_renders() {
        let deck = DeckState::default();
        let theme = Theme::default();
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        DeckWidget::new(&deck, DeckId::A, &theme).render(area, &mut buf);
        assert!(row(&buf, 1).contains("no track"));
    }
}
