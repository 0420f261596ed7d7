//! Crossfader widget - fader position, phase label and cycle timeline

use crate::theme::Theme;
use automix_core::{ControlValue, Phase, PhaseThresholds};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Widget for displaying the automated crossfader
pub struct CrossfaderWidget<'a> {
    crossfader: ControlValue,
    phase: Phase,
    /// Position within the cycle, [0, 1)
    cycle: f64,
    thresholds: PhaseThresholds,
    /// Transition flash, 0.0-1.0
    pulse: f32,
    paused: bool,
    theme: &'a Theme,
}

impl<'a> CrossfaderWidget<'a> {
    pub fn new(crossfader: ControlValue, phase: Phase, theme: &'a Theme) -> Self {
        Self {
            crossfader,
            phase,
            cycle: 0.0,
            thresholds: PhaseThresholds::default(),
            pulse: 0.0,
            paused: false,
            theme,
        }
    }

    pub fn cycle(mut self, cycle: f64, thresholds: PhaseThresholds) -> Self {
        self.cycle = cycle;
        self.thresholds = thresholds;
        self
    }

    pub fn pulse(mut self, pulse: f32) -> Self {
        self.pulse = pulse;
        self
    }

    pub fn paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    /// Column of a 0-100 value on a fader `width` cells wide
    fn fader_column(value: f32, width: usize) -> usize {
        ((value.clamp(0.0, 100.0) / 100.0) * (width.saturating_sub(1)) as f32).round() as usize
    }

    fn render_fader(&self, width: usize) -> Line<'a> {
        let track_width = width.saturating_sub(2);
        let knob = Self::fader_column(self.crossfader.value(), track_width);
        let target = Self::fader_column(self.crossfader.target(), track_width);

        let mut spans = vec![Span::styled("A", self.theme.deck_a_style())];
        for i in 0..track_width {
            let span = if i == knob {
                Span::styled("●", self.theme.highlight())
            } else if i == target {
                Span::styled("◇", self.theme.title())
            } else if i == track_width / 2 {
                Span::styled("┼", self.theme.dim())
            } else {
                Span::styled("─", self.theme.normal())
            };
            spans.push(span);
        }
        spans.push(Span::styled("B", self.theme.deck_b_style()));
        Line::from(spans)
    }

    /// Cycle timeline with each phase drawn in its own style
    fn render_timeline(&self, width: usize) -> Line<'a> {
        let cursor = ((self.cycle.clamp(0.0, 1.0)) * width as f64) as usize;
        let spans = (0..width)
            .map(|i| {
                let position = (i as f64 + 0.5) / width as f64;
                let phase = Phase::classify(position, &self.thresholds);
                let ch = match phase {
                    Phase::StableA => "━",
                    Phase::Transitioning => "═",
                    Phase::StableB => "─",
                };
                if i == cursor.min(width.saturating_sub(1)) {
                    Span::styled("▲", self.theme.highlight())
                } else {
                    Span::styled(ch, self.theme.phase_style(phase).remove_modifier(Modifier::BOLD))
                }
            })
            .collect::<Vec<_>>();
        Line::from(spans)
    }
}

impl Widget for CrossfaderWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let flashing = self.pulse > 0.3;
        let border_style = if flashing {
            self.theme.border_active().add_modifier(Modifier::BOLD)
        } else {
            self.theme.border()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Span::styled(" CROSSFADER ", self.theme.title()));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 12 || inner.height < 1 {
            return;
        }
        let width = inner.width as usize;

        let label = if flashing {
            format!("◆ {} ◆", self.phase.label())
        } else {
            self.phase.label().to_string()
        };
        let status = if self.paused { "  ⏸ PAUSED" } else { "" };
        let label_style = if flashing {
            self.theme.highlight()
        } else {
            self.theme.phase_style(self.phase)
        };

        let mut lines = vec![Line::from(vec![
            Span::styled(label, label_style),
            Span::styled(
                format!("  XF {:3.0}  CYCLE {:3.0}%", self.crossfader.value(), self.cycle * 100.0),
                self.theme.dim(),
            ),
            Span::styled(status, self.theme.title()),
        ])
        .centered()];

        if inner.height >= 2 {
            lines.push(self.render_fader(width));
        }
        if inner.height >= 3 {
            lines.push(self.render_timeline(width));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::CRT_GREEN;

    #[test]
    fn test_fader_column() {
        assert_eq!(CrossfaderWidget::fader_column(0.0, 11), 0);
        assert_eq!(CrossfaderWidget::fader_column(50.0, 11), 5);
        assert_eq!(CrossfaderWidget::fader_column(100.0, 11), 10);
        assert_eq!(CrossfaderWidget::fader_column(150.0, 11), 10);
    }

    #[test]
    fn test_knob_follows_value() {
        let theme = CRT_GREEN;
        let widget = CrossfaderWidget::new(ControlValue::new(100.0), Phase::StableB, &theme);
        let line = widget.render_fader(12);
        // "A", 10 track cells, "B"
        assert_eq!(line.spans.len(), 12);
        assert_eq!(line.spans[10].content, "●");
    }

    #[test]
    fn test_timeline_marks_cursor() {
        let theme = CRT_GREEN;
        let widget = CrossfaderWidget::new(ControlValue::new(27.0), Phase::Transitioning, &theme)
            .cycle(0.75, PhaseThresholds::default());
        let line = widget.render_timeline(20);
        assert_eq!(line.spans[15].content, "▲");
        assert_eq!(line.spans[0].content, "─");
        assert_eq!(line.spans[8].content, "━");
        assert_eq!(line.spans[16].content, "═");
    }

    #[test]
    fn test_render_shows_phase_label() {
        let theme = CRT_GREEN;
        let area = Rect::new(0, 0, 60, 5);
        let mut buf = Buffer::empty(area);
        CrossfaderWidget::new(ControlValue::new(73.0), Phase::Transitioning, &theme)
            .paused(true)
            .render(area, &mut buf);
        let row: String = (0..area.width).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(row.contains("TRANSITION"));
        assert!(row.contains("PAUSED"));
    }
}
