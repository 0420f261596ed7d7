//! Color themes for automix

use automix_core::Phase;
use ratatui::style::{Color, Modifier, Style};

/// Theme configuration for the UI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    /// Primary foreground color (text, borders)
    pub fg: Color,
    /// Dimmed foreground (secondary text)
    pub fg_dim: Color,
    pub bg: Color,
    /// Selected items, active elements
    pub highlight: Color,
    /// Meters, waveform peaks
    pub accent: Color,
    pub warning: Color,
    pub danger: Color,
    pub deck_a: Color,
    pub deck_b: Color,
}

impl Theme {
    /// Resolve a theme by name or alias
    pub fn by_name(name: &str) -> Option<Theme> {
        match name.to_lowercase().as_str() {
            "green" | "phosphor" | "phosphor-green" => Some(CRT_GREEN),
            "amber" | "orange" => Some(CRT_AMBER),
            "cyber" | "cyberpunk" | "neon" => Some(CYBERPUNK),
            _ => None,
        }
    }

    pub fn normal(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.fg_dim).bg(self.bg)
    }

    /// Selected items
    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.fg_dim)
    }

    pub fn border_active(&self) -> Style {
        Style::default().fg(self.highlight)
    }

    pub fn deck_a_style(&self) -> Style {
        Style::default().fg(self.deck_a)
    }

    pub fn deck_b_style(&self) -> Style {
        Style::default().fg(self.deck_b)
    }

    /// Meter segment style by level (0.0 - 1.0)
    pub fn meter_style(&self, level: f32) -> Style {
        let color = if level > 0.9 {
            self.danger
        } else if level > 0.75 {
            self.warning
        } else {
            self.accent
        };
        Style::default().fg(color)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Waveform style, dimmed for decks that are not dominant
    pub fn waveform_style(&self, active: bool) -> Style {
        if active {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(self.fg_dim)
        }
    }

    /// Color of the phase label
    pub fn phase_style(&self, phase: Phase) -> Style {
        match phase {
            Phase::StableA => self.deck_a_style().add_modifier(Modifier::BOLD),
            Phase::Transitioning => Style::default()
                .fg(self.warning)
                .add_modifier(Modifier::BOLD),
            Phase::StableB => self.deck_b_style().add_modifier(Modifier::BOLD),
        }
    }
}

/// Classic phosphor green CRT theme
pub const CRT_GREEN: Theme = Theme {
    name: "phosphor-green",
    fg: Color::Rgb(51, 255, 51),
    fg_dim: Color::Rgb(25, 128, 25),
    bg: Color::Rgb(0, 10, 0),
    highlight: Color::Rgb(180, 255, 180),
    accent: Color::Rgb(100, 255, 100),
    warning: Color::Rgb(255, 255, 100),
    danger: Color::Rgb(255, 100, 100),
    deck_a: Color::Rgb(100, 255, 150),
    deck_b: Color::Rgb(150, 255, 100),
};

/// Amber monochrome theme
pub const CRT_AMBER: Theme = Theme {
    name: "amber",
    fg: Color::Rgb(255, 176, 0),
    fg_dim: Color::Rgb(128, 88, 0),
    bg: Color::Rgb(10, 5, 0),
    highlight: Color::Rgb(255, 220, 128),
    accent: Color::Rgb(255, 200, 64),
    warning: Color::Rgb(255, 255, 100),
    danger: Color::Rgb(255, 100, 100),
    deck_a: Color::Rgb(255, 180, 50),
    deck_b: Color::Rgb(255, 220, 100),
};

/// Cyberpunk neon theme
pub const CYBERPUNK: Theme = Theme {
    name: "cyberpunk",
    fg: Color::Rgb(0, 255, 255),
    fg_dim: Color::Rgb(0, 128, 128),
    bg: Color::Rgb(5, 0, 10),
    highlight: Color::Rgb(255, 0, 255),
    accent: Color::Rgb(0, 255, 128),
    warning: Color::Rgb(255, 255, 0),
    danger: Color::Rgb(255, 50, 50),
    deck_a: Color::Rgb(255, 100, 255),
    deck_b: Color::Rgb(100, 255, 255),
};

impl Default for Theme {
    fn default() -> Self {
        CYBERPUNK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name_aliases() {
        assert_eq!(Theme::by_name("Amber"), Some(CRT_AMBER));
        assert_eq!(Theme::by_name("neon"), Some(CYBERPUNK));
        assert_eq!(Theme::by_name("phosphor"), Some(CRT_GREEN));
        assert_eq!(Theme::by_name("solarized"), None);
    }

    #[test]
    fn test_meter_zones() {
        let theme = CRT_GREEN;
        assert_eq!(theme.meter_style(0.5).fg, Some(theme.accent));
        assert_eq!(theme.meter_style(0.8).fg, Some(theme.warning));
        assert_eq!(theme.meter_style(0.95).fg, Some(theme.danger));
    }
}
