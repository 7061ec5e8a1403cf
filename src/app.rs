//! Application state for the terminal dashboard.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::layout::{Position, Rect};

use crate::data::{CameraFeed, ManualTrigger, ReadingHistory, Severity};
use crate::schedule::{Scheduler, Ticker};
use crate::server::SharedSnapshot;
use crate::session::Session;
use crate::ui::Theme;

/// Frame period of the camera feed animation.
pub const ANIMATION_INTERVAL: Duration = Duration::from_millis(60);

/// How long a status bar message stays visible.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,
    /// Unit whose camera panel is shown full size.
    pub enlarged: Option<u32>,

    pub session: Session,
    pub feeds: Vec<CameraFeed>,
    pub history: ReadingHistory,
    scheduler: Scheduler,
    animation: Ticker,
    publisher: Option<SharedSnapshot>,

    /// Camera panel areas from the last draw, used for mouse hit testing.
    pub camera_areas: Vec<(u32, Rect)>,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,

    bells_rung: u64,
}

impl App {
    pub fn new(mut session: Session, scheduler: Scheduler, theme: Theme) -> Self {
        let mut rng = session.fork_rng();
        let feeds = session
            .units()
            .iter()
            .map(|unit| CameraFeed::new(unit.id(), &mut rng))
            .collect();
        let mut history = ReadingHistory::new();
        history.record(session.units());

        Self {
            running: true,
            show_help: false,
            enlarged: None,
            session,
            feeds,
            history,
            scheduler,
            animation: Ticker::new(ANIMATION_INTERVAL, Instant::now()),
            publisher: None,
            camera_areas: Vec::new(),
            theme,
            status_message: None,
            bells_rung: 0,
        }
    }

    /// Publish a snapshot to `shared` after every state change.
    pub fn with_publisher(mut self, shared: SharedSnapshot) -> Self {
        self.publisher = Some(shared);
        self.publish();
        self
    }

    /// Run whatever ticks are due at `now`.
    pub fn tick(&mut self, now: Instant) {
        let due = self.scheduler.poll(now);
        if due.drift {
            self.session.drift();
            self.history.record(self.session.units());
        }
        if due.evaluate {
            self.session.evaluate_at(now);
        }
        if due.any() {
            tracing::trace!(drift = due.drift, evaluate = due.evaluate, "tick");
            self.publish();
        }

        if self.animation.fire(now) {
            for feed in &mut self.feeds {
                feed.step();
            }
        }

        let released = self.session.board_mut().siren_mut().release_expired(now);
        if released > 0 {
            tracing::debug!(released, "siren voices released");
            self.publish();
        }
    }

    /// Time until the next tick of any kind.
    pub fn until_next(&self, now: Instant) -> Duration {
        self.scheduler
            .until_next(now)
            .min(self.animation.until_next(now))
    }

    /// Fire a manual trigger and report the outcome in the status bar.
    pub fn trigger(&mut self, trigger: ManualTrigger) {
        match self.session.trigger(trigger) {
            Some(unit_id) => {
                self.set_status_message(format!("{} on camera {}", trigger.name(), unit_id));
            }
            None => {
                self.history.clear();
                self.history.record(self.session.units());
                self.set_status_message("System reset".to_string());
            }
        }
        self.publish();
    }

    fn publish(&self) {
        if let Some(shared) = &self.publisher {
            *shared.write() = self.session.snapshot();
        }
    }

    /// Returns `true` once for every siren trigger since the last call.
    pub fn take_bell(&mut self) -> bool {
        let triggered = self.session.board().siren().triggered();
        if triggered > self.bells_rung {
            self.bells_rung = triggered;
            true
        } else {
            false
        }
    }

    /// Worst status across all units.
    pub fn worst(&self) -> Severity {
        self.session.board().worst()
    }

    /// Current siren frequency, if a voice is sounding.
    pub fn siren_frequency(&self, now: Instant) -> Option<f32> {
        self.session.board().siren().frequency(now)
    }

    /// Point out required web assets that are missing.
    pub fn report_missing_assets(&mut self, missing: &[&str]) {
        if !missing.is_empty() {
            self.set_status_message(format!("Missing web assets: {}", missing.join(", ")));
        }
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_MESSAGE_TTL {
                return Some(msg);
            }
        }
        None
    }

    /// Show a camera full size, or go back to the grid if it already is.
    pub fn toggle_enlarge(&mut self, unit_id: u32) {
        if self.session.unit(unit_id).is_none() {
            return;
        }
        self.enlarged = match self.enlarged {
            Some(current) if current == unit_id => None,
            _ => Some(unit_id),
        };
    }

    /// Camera panel under a screen cell.
    pub fn camera_at(&self, column: u16, row: u16) -> Option<u32> {
        self.camera_areas
            .iter()
            .find(|(_, area)| area.contains(Position::new(column, row)))
            .map(|(id, _)| *id)
    }

    /// Close overlays first, then the enlarged camera.
    pub fn go_back(&mut self) {
        if self.show_help {
            self.show_help = false;
        } else {
            self.enlarged = None;
        }
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export current state to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.session.snapshot())?;
        std::fs::write(path, json)?;
        tracing::info!(path = %path.display(), "exported state");
        Ok(())
    }
}
