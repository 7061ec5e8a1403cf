//! Camera grid rendering.
//!
//! Each unit gets a bordered panel with its animated feed drawn on a braille
//! canvas. The border and title carry the unit's current status.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle},
        Block, Borders,
    },
    Frame,
};

use crate::alert::UnitStatus;
use crate::app::App;
use crate::data::{CameraFeed, Severity};

/// Panels per row before wrapping.
const COLUMNS: usize = 2;

/// Render all camera panels, or only the enlarged one.
///
/// Stores the panel areas on the app for mouse hit testing.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    app.camera_areas.clear();

    let visible: Vec<usize> = match app.enlarged {
        Some(unit_id) => app
            .feeds
            .iter()
            .position(|feed| feed.unit_id() == unit_id)
            .into_iter()
            .collect(),
        None => (0..app.feeds.len()).collect(),
    };

    let areas = grid(area, visible.len());
    for (index, panel) in visible.into_iter().zip(areas) {
        let feed = &app.feeds[index];
        let status = app
            .session
            .board()
            .status(feed.unit_id())
            .cloned()
            .unwrap_or_default();
        render_panel(frame, app, feed, &status, panel);
        app.camera_areas.push((feed.unit_id(), panel));
    }
}

/// Split `area` into `count` panels, `COLUMNS` per row.
fn grid(area: Rect, count: usize) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let columns = count.min(COLUMNS);
    let rows = count.div_ceil(columns);

    let row_areas = Layout::vertical(vec![Constraint::Ratio(1, rows as u32); rows]).split(area);
    row_areas
        .iter()
        .flat_map(|row| {
            Layout::horizontal(vec![Constraint::Ratio(1, columns as u32); columns])
                .split(*row)
                .to_vec()
        })
        .take(count)
        .collect()
}

fn render_panel(frame: &mut Frame, app: &App, feed: &CameraFeed, status: &UnitStatus, area: Rect) {
    let status_style = app.theme.status_style(status.severity);
    let border_style = match status.severity {
        Severity::Safe => Style::default().fg(app.theme.border),
        _ => status_style,
    };

    let title = Line::from(vec![
        Span::styled(
            format!(" Camera {} ", feed.unit_id()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("[{}] ", status.severity.symbol()), status_style),
    ]);
    let block = Block::default()
        .title(title)
        .title_bottom(Line::from(Span::styled(format!(" {} ", status.text), status_style)))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(border_style);

    let color = app.theme.feed;
    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, feed.width()])
        .y_bounds([0.0, feed.height()])
        .paint(move |ctx| {
            for blob in feed.blobs() {
                ctx.draw(&Circle {
                    x: blob.x,
                    y: blob.y,
                    radius: blob.radius,
                    color,
                });
            }
        });

    frame.render_widget(canvas, area);
}
