//! Common UI components shared across panels.
//!
//! This module contains the header bar, status bar, and help overlay.

use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::alert::siren::HIGH_FREQUENCY;
use crate::app::App;
use crate::data::Severity;

/// Render the header bar with the overall status and the siren banner.
///
/// Displays: status indicator, unit counts by severity, alert count.
/// While the siren sounds, the whole bar flashes in step with the sweep.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect, now: Instant) {
    if let Some(frequency) = app.siren_frequency(now) {
        let style = if frequency >= HIGH_FREQUENCY {
            app.theme.siren
        } else {
            app.theme.siren.add_modifier(Modifier::REVERSED)
        };
        let banner = format!(" ⚠ EVACUATE ⚠  siren {:.0}Hz ", frequency);
        frame.render_widget(Paragraph::new(banner).style(style), area);
        return;
    }

    let board = app.session.board();
    let mut safe = 0;
    let mut warning = 0;
    let mut danger = 0;
    for (_, status) in board.statuses() {
        match status.severity {
            Severity::Safe => safe += 1,
            Severity::Warning => warning += 1,
            Severity::Danger => danger += 1,
        }
    }

    let worst = app.worst();
    let line = Line::from(vec![
        Span::styled(" ● ", app.theme.status_style(worst)),
        Span::styled("SAFEWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(format!("{}", safe), Style::default().fg(app.theme.safe)),
        Span::raw(" safe "),
        count_span(warning, app.theme.status_style(Severity::Warning)),
        Span::raw(" warn "),
        count_span(danger, app.theme.status_style(Severity::Danger)),
        Span::raw(" danger │ "),
        Span::styled(
            format!("{}", board.alert_count()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" alerts"),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn count_span(count: usize, style: Style) -> Span<'static> {
    if count > 0 {
        Span::styled(format!("{}", count), style)
    } else {
        Span::styled("0", Style::default().add_modifier(Modifier::DIM))
    }
}

/// Render the status bar at the bottom.
///
/// Shows temporary status messages, otherwise the available controls.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = if app.enlarged.is_some() {
        " Esc:grid f:fire h:heat c:crowd m:motion r:reset ?:help q:quit"
    } else {
        " f:fire h:heat c:crowd m:motion r:reset 1-9:enlarge e:export ?:help q:quit"
    };
    let paragraph = Paragraph::new(controls).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the dashboard.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Simulate"),
        Line::from("  f         Fire (danger, siren)"),
        Line::from("  h         High heat"),
        Line::from("  c         Overcrowding"),
        Line::from("  m         Abnormal movement"),
        Line::from("  r         Reset all units"),
        Line::from(""),
        section(" Cameras"),
        Line::from("  1-9       Enlarge camera"),
        Line::from("  click     Enlarge / shrink"),
        Line::from("  Esc       Back to grid"),
        Line::from(""),
        section(" General"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 40u16.min(area.width.saturating_sub(4));
    let help_height = 21u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
