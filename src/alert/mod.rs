//! Alert delivery.
//!
//! The [`AlertSink`] turns classifications into observable effects through
//! an injected [`Surface`]. Surfaces are opaque to the core: they may render
//! to a terminal, keep an in-memory model ([`Board`]), or drop everything.
//! Failures inside a surface are its own business and never reach the
//! caller.

mod board;
pub mod siren;

pub use board::{Board, UnitStatus, DEFAULT_LOG_CAPACITY};
pub use siren::Siren;

use std::time::Instant;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::data::{Classification, Severity};

/// Status text shown for a unit classified as safe.
pub const SAFE_TEXT: &str = "Safe";
/// Timeline line appended by a reset.
pub const RESET_TEXT: &str = "System reset";

/// One entry of the alert log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub unit_id: u32,
    pub message: String,
    pub severity: Severity,
    pub timestamp: DateTime<Local>,
}

impl AlertRecord {
    pub fn now(unit_id: u32, message: &str, severity: Severity) -> Self {
        Self {
            unit_id,
            message: message.to_string(),
            severity,
            timestamp: Local::now(),
        }
    }
}

/// Level of an activity timeline line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warn,
    Danger,
}

impl From<Severity> for Level {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Safe => Level::Info,
            Severity::Warning => Level::Warn,
            Severity::Danger => Level::Danger,
        }
    }
}

/// One line of the activity timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub message: String,
    pub level: Level,
    pub timestamp: DateTime<Local>,
}

impl TimelineEntry {
    pub fn now(message: impl Into<String>, level: Level) -> Self {
        Self {
            message: message.into(),
            level,
            timestamp: Local::now(),
        }
    }
}

/// Rendering collaborator for alerts.
pub trait Surface {
    /// Update the status indicator of one unit.
    fn render_status(&mut self, unit_id: u32, text: &str, severity: Severity);

    /// Prepend a record to the alert log.
    fn append_log(&mut self, record: AlertRecord);

    /// Prepend a line to the activity timeline.
    fn append_timeline(&mut self, entry: TimelineEntry);

    /// Empty the alert log.
    fn clear_log(&mut self);

    /// Start the audible siren effect at `at`.
    fn sound_siren(&mut self, at: Instant);
}

/// Delivers classifications and manual alerts to a [`Surface`].
#[derive(Debug, Clone, Default)]
pub struct AlertSink<S> {
    surface: S,
}

impl<S: Surface> AlertSink<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Deliver the evaluator's verdict for one unit.
    pub fn deliver(&mut self, unit_id: u32, classification: &Classification) {
        self.deliver_at(unit_id, classification, Instant::now());
    }

    /// [`deliver`](Self::deliver) with an explicit siren start time.
    pub fn deliver_at(&mut self, unit_id: u32, classification: &Classification, at: Instant) {
        match classification.reason() {
            Some(reason) => self.raise_at(unit_id, reason, classification.severity(), at),
            None => self.surface.render_status(unit_id, SAFE_TEXT, Severity::Safe),
        }
    }

    /// Raise an alert with an explicit message. A `Safe` severity only
    /// updates the status indicator.
    pub fn raise(&mut self, unit_id: u32, message: &str, severity: Severity) {
        self.raise_at(unit_id, message, severity, Instant::now());
    }

    pub fn raise_at(&mut self, unit_id: u32, message: &str, severity: Severity, at: Instant) {
        if severity == Severity::Safe {
            self.surface.render_status(unit_id, SAFE_TEXT, Severity::Safe);
            return;
        }

        tracing::debug!(unit_id, severity = severity.tag(), text = message, "alert raised");

        self.surface.append_log(AlertRecord::now(unit_id, message, severity));
        self.surface.append_timeline(TimelineEntry::now(
            format!("Camera {}: {}", unit_id, message),
            severity.into(),
        ));
        if severity == Severity::Danger {
            self.surface.sound_siren(at);
        }
        self.surface.render_status(unit_id, message, severity);
    }

    /// Mark every unit safe, clear the log and note the reset.
    pub fn reset(&mut self, unit_ids: impl IntoIterator<Item = u32>) {
        for unit_id in unit_ids {
            self.surface.render_status(unit_id, SAFE_TEXT, Severity::Safe);
        }
        self.surface.clear_log();
        self.surface.append_timeline(TimelineEntry::now(RESET_TEXT, Level::Info));
    }
}
