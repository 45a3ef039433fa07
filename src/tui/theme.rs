//! Color themes and styling for TUI components.

use crate::core::RiskLevel;
use ratatui::style::{Color, Modifier, Style};

/// Dashboard color scheme.
pub struct Theme {
    /// Accent for the active tab and cursor row
    pub primary: Color,
    /// Muted chrome (inactive tabs, footer counts)
    pub muted: Color,
    /// Normal text
    pub text: Color,
}

impl Theme {
    pub fn default_theme() -> Self {
        Self {
            primary: Color::Cyan,
            muted: Color::DarkGray,
            text: Color::White,
        }
    }

    pub fn active_tab(&self) -> Style {
        Style::new().fg(self.primary).add_modifier(Modifier::BOLD)
    }

    pub fn inactive_tab(&self) -> Style {
        Style::new().fg(self.muted)
    }

    pub fn cursor_row(&self) -> Style {
        Style::new()
            .fg(Color::Black)
            .bg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn banner(&self) -> Style {
        Style::new().fg(Color::Red).add_modifier(Modifier::BOLD)
    }

    pub fn notice(&self) -> Style {
        Style::new().fg(Color::Green)
    }

    pub fn empty(&self) -> Style {
        Style::new().fg(self.muted).add_modifier(Modifier::ITALIC)
    }

    /// Fixed color per risk level, matching the severity palette used in
    /// terminal output.
    pub fn risk(&self, level: RiskLevel) -> Color {
        match level {
            RiskLevel::Critical => Color::Red,
            RiskLevel::High => Color::Yellow,
            RiskLevel::Medium => Color::Blue,
            RiskLevel::Low => Color::Green,
            RiskLevel::Unknown => Color::DarkGray,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}
