//! Sensor table rendering.
//!
//! One row per unit with the four readings, each shown as a value, a trend
//! arrow and a short sparkline of recent drift ticks.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::{Reading, ReadingHistory};

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Samples shown per sparkline.
const SPARKLINE_WIDTH: usize = 8;

/// Render the sensor table for all units.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut header_cells = vec![Cell::from("Unit")];
    header_cells.extend(Reading::ALL.iter().map(|r| Cell::from(r.label())));
    header_cells.push(Cell::from("Status"));
    let header = Row::new(header_cells).height(1).style(app.theme.header);

    let board = app.session.board();
    let rows: Vec<Row> = app
        .session
        .units()
        .iter()
        .map(|unit| {
            let mut cells = vec![Cell::from(format!("Camera {}", unit.id()))];
            cells.extend(Reading::ALL.iter().map(|&reading| {
                reading_cell(app, &app.history, unit.id(), reading, unit.get(reading))
            }));

            let severity = board.status(unit.id()).map(|s| s.severity).unwrap_or_default();
            cells.push(Cell::from(severity.symbol()).style(app.theme.status_style(severity)));
            Row::new(cells)
        })
        .collect();

    let widths = [
        Constraint::Min(9),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Min(6),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(" Sensors ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );

    frame.render_widget(table, area);
}

fn reading_cell(
    app: &App,
    history: &ReadingHistory,
    unit_id: u32,
    reading: Reading,
    value: f64,
) -> Cell<'static> {
    let trend = history
        .trend(unit_id, reading)
        .map(|t| t.symbol())
        .unwrap_or(" ");
    let sparkline = render_sparkline(&history.sparkline(unit_id, reading, SPARKLINE_WIDTH));

    Cell::from(Line::from(vec![
        Span::styled(
            format!("{:.2}", value),
            Style::default().fg(app.theme.value_color(value)),
        ),
        Span::raw(format!("{} ", trend)),
        Span::styled(sparkline, Style::default().fg(app.theme.border)),
    ]))
}

fn render_sparkline(data: &[u8]) -> String {
    if data.is_empty() {
        return " ".repeat(SPARKLINE_WIDTH);
    }

    data.iter()
        .map(|&v| SPARKLINE_CHARS[v.min(7) as usize])
        .collect()
}
