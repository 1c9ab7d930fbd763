//! Color theme and styling for the GuardianNet console

use guardian_core::dashboard::{AlertKind, Trend};
use guardian_core::{NetworkMode, RiskLevel, ZoneColor};
use ratatui::style::{Color, Modifier, Style};

/// Console color theme
#[derive(Debug, Clone)]
pub struct GuardianTheme {
    // Base colors
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,
    pub accent: Color,

    // Severity colors
    pub critical: Color,
    pub high: Color,
    pub moderate: Color,
    pub low: Color,

    // Text colors
    pub user_text: Color,
    pub assistant_text: Color,
    pub system_text: Color,
    pub bar_chart: Color,

    // Status colors
    pub online: Color,
    pub degraded: Color,
    pub mesh: Color,
}

impl Default for GuardianTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            accent: Color::LightGreen,

            critical: Color::Red,
            high: Color::LightRed,
            moderate: Color::Yellow,
            low: Color::Green,

            user_text: Color::Cyan,
            assistant_text: Color::White,
            system_text: Color::DarkGray,
            bar_chart: Color::LightRed,

            online: Color::Green,
            degraded: Color::Yellow,
            mesh: Color::Magenta,
        }
    }
}

impl GuardianTheme {
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.foreground)
    }

    pub fn user_style(&self) -> Style {
        Style::default()
            .fg(self.user_text)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn assistant_style(&self) -> Style {
        Style::default().fg(self.assistant_text)
    }

    pub fn system_style(&self) -> Style {
        Style::default()
            .fg(self.system_text)
            .add_modifier(Modifier::DIM)
    }

    pub fn heading_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn risk_color(&self, level: RiskLevel) -> Color {
        match level {
            RiskLevel::Critical => self.critical,
            RiskLevel::High => self.high,
            RiskLevel::Moderate => self.moderate,
            RiskLevel::Low => self.low,
        }
    }

    pub fn zone_color(&self, color: ZoneColor) -> Color {
        match color {
            ZoneColor::Red => Color::Red,
            ZoneColor::Orange => Color::Rgb(249, 115, 22),
            ZoneColor::Yellow => Color::Yellow,
            ZoneColor::Blue => Color::Blue,
            ZoneColor::Purple => Color::Magenta,
            ZoneColor::Green => Color::Green,
        }
    }

    pub fn network_style(&self, mode: NetworkMode) -> Style {
        let color = match mode {
            NetworkMode::Normal => self.online,
            NetworkMode::Degraded => self.degraded,
            NetworkMode::Mesh => self.mesh,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn alert_color(&self, kind: AlertKind) -> Color {
        match kind {
            AlertKind::Critical => self.critical,
            AlertKind::Warning => self.moderate,
            AlertKind::Info => self.user_text,
        }
    }

    pub fn trend_glyph(&self, trend: Trend) -> (&'static str, Style) {
        match trend {
            Trend::Up => ("▲", Style::default().fg(self.high)),
            Trend::Down => ("▼", Style::default().fg(self.low)),
            Trend::Stable => ("■", Style::default().fg(self.system_text)),
        }
    }

    /// Gauge color for a reading as a fraction of its maximum.
    pub fn level_color(&self, ratio: f64) -> Color {
        if ratio > 0.85 {
            self.critical
        } else if ratio > 0.6 {
            self.moderate
        } else {
            self.low
        }
    }

    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }

    pub fn title_style(&self, focused: bool) -> Style {
        let style = Style::default().fg(if focused {
            self.border_focused
        } else {
            self.foreground
        });

        if focused {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }
}
