use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::app::App;
use crate::data::ManualTrigger;

/// Default file written by the export key.
pub const EXPORT_PATH: &str = "safewatch_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // Manual triggers
        KeyCode::Char('f') => app.trigger(ManualTrigger::SimulateFire),
        KeyCode::Char('h') => app.trigger(ManualTrigger::SimulateHeat),
        KeyCode::Char('c') => app.trigger(ManualTrigger::SimulateCrowd),
        KeyCode::Char('m') => app.trigger(ManualTrigger::SimulateMotion),
        KeyCode::Char('r') => app.trigger(ManualTrigger::Reset),

        // Enlarge a camera by number
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(unit_id) = c.to_digit(10) {
                app.toggle_enlarge(unit_id);
            }
        }

        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        KeyCode::Char('?') => app.toggle_help(),

        KeyCode::Char('e') => {
            let export_path = std::path::PathBuf::from(EXPORT_PATH);
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle mouse events: clicking a camera panel enlarges it, clicking again
/// or right-clicking goes back to the grid.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(unit_id) = app.camera_at(mouse.column, mouse.row) {
                app.toggle_enlarge(unit_id);
            }
        }
        MouseEventKind::Down(MouseButton::Right) => app.go_back(),
        _ => {}
    }
}
