//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::alert::Level;
use crate::data::Severity;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for warning-level status.
    pub warning: Color,
    /// Color for danger-level status.
    pub danger: Color,
    /// Color for safe status.
    pub safe: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Color of the moving shapes in camera feeds.
    pub feed: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for the flashing siren banner.
    pub siren: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            danger: Color::Red,
            safe: Color::Green,
            border: Color::Gray,
            feed: Color::DarkGray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            siren: Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            danger: Color::Red,
            safe: Color::Green,
            border: Color::DarkGray,
            feed: Color::Gray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            siren: Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for a unit status
    pub fn status_style(&self, severity: Severity) -> Style {
        match severity {
            Severity::Safe => Style::default().fg(self.safe),
            Severity::Warning => Style::default().fg(self.warning),
            Severity::Danger => Style::default().fg(self.danger).add_modifier(Modifier::BOLD),
        }
    }

    /// Get style for a timeline line
    pub fn level_style(&self, level: Level) -> Style {
        match level {
            Level::Info => Style::default().fg(self.highlight),
            Level::Warn => self.status_style(Severity::Warning),
            Level::Danger => self.status_style(Severity::Danger),
        }
    }

    /// Color for a reading value, using the default rule thresholds as
    /// visual bands.
    pub fn value_color(&self, value: f64) -> Color {
        if value > 0.6 {
            self.danger
        } else if value > 0.4 {
            self.warning
        } else {
            self.safe
        }
    }
}
