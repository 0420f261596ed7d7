//! Analysis panel - job progress, report and uploaded files

use crate::theme::Theme;
use automix_library::{AnalysisProgress, AnalysisReport, UploadedFile};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};

/// State of the analysis view
#[derive(Debug, Clone, Default)]
pub struct AnalysisState {
    /// Display name of the source being analyzed
    pub source: Option<String>,
    pub running: bool,
    pub percent: u8,
    pub step: Option<&'static str>,
    pub report: Option<AnalysisReport>,
    /// Files available for `:analyze <upload-id>`
    pub uploads: Vec<UploadedFile>,
}

impl AnalysisState {
    /// Apply a progress update; returns a status line when the job finishes
    pub fn handle_progress(&mut self, progress: AnalysisProgress) -> Option<String> {
        match progress {
            AnalysisProgress::Started { source, .. } => {
                self.source = Some(source.to_string());
                self.running = true;
                self.percent = 0;
                self.step = None;
                self.report = None;
                None
            }
            AnalysisProgress::Step { name, percent } => {
                self.step = Some(name);
                self.percent = percent.min(100);
                None
            }
            AnalysisProgress::Complete(report) => {
                self.running = false;
                self.percent = 100;
                self.step = None;
                let summary = format!(
                    "Analysis complete: {} tracks, {:.1} BPM, {}",
                    report.tracks.len(),
                    report.bpm,
                    report.key
                );
                self.report = Some(*report);
                Some(summary)
            }
        }
    }
}

/// Widget for the analysis view
pub struct AnalysisWidget<'a> {
    state: &'a AnalysisState,
    theme: &'a Theme,
}

impl<'a> AnalysisWidget<'a> {
    pub fn new(state: &'a AnalysisState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    fn trait_bar(&self, label: &'static str, value: u8, width: usize) -> Line<'a> {
        let filled = (value as usize * width) / 100;
        Line::from(vec![
            Span::styled(format!("{:<13}", label), self.theme.dim()),
            Span::styled("█".repeat(filled), self.theme.meter_style(value as f32 / 100.0)),
            Span::styled("░".repeat(width - filled), self.theme.dim()),
            Span::styled(format!(" {:3}", value), self.theme.normal()),
        ])
    }

    fn render_report(&self, report: &AnalysisReport, area: Rect, buf: &mut Buffer) {
        let [summary_area, tracks_area] =
            Layout::horizontal([Constraint::Length(44), Constraint::Min(20)]).areas(area);

        let mut lines = vec![
            Line::from(vec![
                Span::styled("BPM   ", self.theme.dim()),
                Span::styled(format!("{:.1}", report.bpm), self.theme.title()),
                Span::styled("   KEY ", self.theme.dim()),
                Span::styled(report.key.clone(), self.theme.title()),
            ]),
            Line::from(vec![
                Span::styled("ENERGY ", self.theme.dim()),
                Span::styled(format!("{}/10", report.energy), self.theme.normal()),
                Span::styled("   MOOD ", self.theme.dim()),
                Span::styled(report.mood.clone(), self.theme.normal()),
            ]),
            Line::from(Span::styled(
                format!("LENGTH {}", automix_core::format_time(report.duration_secs)),
                self.theme.dim(),
            )),
            Line::default(),
        ];
        for (label, value) in report.dna.traits() {
            lines.push(self.trait_bar(label, value, 20));
        }
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.border())
                    .title(Span::styled(" DNA ", self.theme.title())),
            )
            .render(summary_area, buf);

        let track_lines: Vec<Line> = report
            .tracks
            .iter()
            .map(|t| {
                Line::from(vec![
                    Span::styled(format!("{:2}. ", t.index), self.theme.dim()),
                    Span::styled(
                        format!("{:>7} ", automix_core::format_time(t.start_secs)),
                        self.theme.deck_a_style(),
                    ),
                    Span::styled(format!("{} - {}", t.artist, t.title), self.theme.normal()),
                    Span::styled(format!("  {:.0}%", t.confidence * 100.0), self.theme.dim()),
                ])
            })
            .collect();
        Paragraph::new(track_lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.border())
                    .title(Span::styled(
                        format!(" TRACKLIST [{}] ", report.tracks.len()),
                        self.theme.title(),
                    )),
            )
            .render(tracks_area, buf);
    }

    fn render_uploads(&self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line> = if self.state.uploads.is_empty() {
            vec![Line::from(Span::styled(
                "No uploads. :upload <path>... to add audio files",
                self.theme.dim(),
            ))]
        } else {
            self.state
                .uploads
                .iter()
                .map(|f| {
                    Line::from(vec![
                        Span::styled(format!("{:<28} ", f.id), self.theme.dim()),
                        Span::styled(f.name.clone(), self.theme.normal()),
                        Span::styled(
                            format!(
                                "  {} {:.1} MB",
                                f.format.to_uppercase(),
                                f.size_bytes as f64 / 1_048_576.0
                            ),
                            self.theme.dim(),
                        ),
                    ])
                })
                .collect()
        };
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.border())
                    .title(Span::styled(
                        format!(" UPLOADS [{}] ", self.state.uploads.len()),
                        self.theme.title(),
                    )),
            )
            .render(area, buf);
    }
}

impl Widget for AnalysisWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [progress_area, body_area, uploads_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(6),
        ])
        .areas(area);

        let label = match (&self.state.source, self.state.step) {
            (Some(source), Some(step)) => format!("{} - {}", source, step),
            (Some(source), None) if self.state.running => format!("{} - starting", source),
            (Some(source), None) => source.clone(),
            (None, _) => ":analyze <soundcloud|youtube|mixcloud url | upload id>".to_string(),
        };
        Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(if self.state.running {
                        self.theme.border_active()
                    } else {
                        self.theme.border()
                    })
                    .title(Span::styled(" MIX ANALYSIS ", self.theme.title())),
            )
            .gauge_style(Style::default().fg(self.theme.accent).bg(self.theme.bg))
            .percent(self.state.percent.min(100) as u16)
            .label(label)
            .render(progress_area, buf);

        match &self.state.report {
            Some(report) => self.render_report(report, body_area, buf),
            None => {
                Paragraph::new(Line::from(Span::styled(
                    if self.state.running { "Analyzing..." } else { "No report yet" },
                    self.theme.dim(),
                )))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(self.theme.border()),
                )
                .render(body_area, buf);
            }
        }

        self.render_uploads(uploads_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use automix_library::{AnalysisSource, ANALYSIS_STEPS};

    #[test]
    fn test_progress_lifecycle() {
        let source = AnalysisSource::parse("https://mixcloud.com/dj/set").unwrap();
        let mut state = AnalysisState::default();

        assert!(state
            .handle_progress(AnalysisProgress::Started {
                source: source.clone(),
                steps: ANALYSIS_STEPS.len(),
            })
            .is_none());
        assert!(state.running);
        assert_eq!(state.source.as_deref(), Some("Mixcloud (https://mixcloud.com/dj/set)"));

        state.handle_progress(AnalysisProgress::Step {
            name: ANALYSIS_STEPS[1],
            percent: 40,
        });
        assert_eq!(state.percent, 40);
        assert_eq!(state.step, Some("Detecting tempo"));

        let report = AnalysisReport::generate(source);
        let summary = state
            .handle_progress(AnalysisProgress::Complete(Box::new(report.clone())))
            .unwrap();
        assert!(!state.running);
        assert!(summary.starts_with("Analysis complete"));
        assert_eq!(state.report, Some(report));
    }

    #[test]
    fn test_render_does_not_panic_on_small_area() {
        let mut state = AnalysisState::default();
        state.report = Some(AnalysisReport::generate(AnalysisSource::Upload("upload-a".into())));
        let theme = Theme::default();
        for (w, h) in [(120, 40), (30, 8), (5, 3)] {
            let area = Rect::new(0, 0, w, h);
            let mut buf = Buffer::empty(area);
            AnalysisWidget::new(&state, &theme).render(area, &mut buf);
        }
    }
}
