//! Alert log and activity timeline panels.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::alert::{AlertRecord, TimelineEntry};
use crate::app::App;

const TIME_FORMAT: &str = "%H:%M:%S";

/// Render the alert log, newest first.
pub fn render_log(frame: &mut Frame, app: &App, area: Rect) {
    let board = app.session.board();
    let items: Vec<ListItem> = board.alerts().map(|record| log_item(app, record)).collect();

    let title = format!(" Alerts ({}) ", board.alert_count());
    frame.render_widget(List::new(items).block(panel(app, title)), area);
}

/// Render the activity timeline, newest first.
pub fn render_timeline(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .session
        .board()
        .timeline()
        .map(|entry| timeline_item(app, entry))
        .collect();

    frame.render_widget(List::new(items).block(panel(app, " Timeline ".to_string())), area);
}

fn log_item(app: &App, record: &AlertRecord) -> ListItem<'static> {
    let style = app.theme.status_style(record.severity);
    ListItem::new(Line::from(vec![
        Span::styled(
            record.timestamp.format(TIME_FORMAT).to_string(),
            Style::default().add_modifier(Modifier::DIM),
        ),
        Span::raw(format!(" #{} ", record.unit_id)),
        Span::styled(format!("{:<6} ", record.severity.symbol()), style),
        Span::styled(record.message.clone(), style),
    ]))
}

fn timeline_item(app: &App, entry: &TimelineEntry) -> ListItem<'static> {
    ListItem::new(Line::from(vec![
        Span::styled(
            entry.timestamp.format(TIME_FORMAT).to_string(),
            Style::default().add_modifier(Modifier::DIM),
        ),
        Span::raw(" "),
        Span::styled(entry.message.clone(), app.theme.level_style(entry.level)),
    ]))
}

fn panel(app: &App, title: String) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
}
