//! In-memory alert surface.
//!
//! The board keeps per-unit status, a newest-first alert log, the activity
//! timeline and the siren. The terminal dashboard and the HTTP snapshot
//! endpoint both render from it.

use std::collections::{BTreeMap, VecDeque};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::siren::Siren;
use super::{AlertRecord, Surface, TimelineEntry, SAFE_TEXT};
use crate::data::Severity;

/// Default maximum number of alert log and timeline entries.
pub const DEFAULT_LOG_CAPACITY: usize = 200;

/// Status indicator for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStatus {
    pub text: String,
    pub severity: Severity,
}

impl Default for UnitStatus {
    fn default() -> Self {
        Self {
            text: SAFE_TEXT.to_string(),
            severity: Severity::Safe,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    statuses: BTreeMap<u32, UnitStatus>,
    alerts: VecDeque<AlertRecord>,
    timeline: VecDeque<TimelineEntry>,
    capacity: usize,
    siren: Siren,
}

impl Board {
    /// Create a board for a fixed set of units. Status updates for any
    /// other id are ignored.
    pub fn new(unit_ids: impl IntoIterator<Item = u32>, capacity: usize) -> Self {
        Self {
            statuses: unit_ids.into_iter().map(|id| (id, UnitStatus::default())).collect(),
            alerts: VecDeque::new(),
            timeline: VecDeque::new(),
            capacity: capacity.max(1),
            siren: Siren::new(),
        }
    }

    pub fn status(&self, unit_id: u32) -> Option<&UnitStatus> {
        self.statuses.get(&unit_id)
    }

    pub fn statuses(&self) -> impl Iterator<Item = (u32, &UnitStatus)> {
        self.statuses.iter().map(|(id, status)| (*id, status))
    }

    /// Alert log, newest first.
    pub fn alerts(&self) -> impl Iterator<Item = &AlertRecord> {
        self.alerts.iter()
    }

    pub fn alert_count(&self) -> usize {
        self.alerts.len()
    }

    /// Activity timeline, newest first.
    pub fn timeline(&self) -> impl Iterator<Item = &TimelineEntry> {
        self.timeline.iter()
    }

    pub fn siren(&self) -> &Siren {
        &self.siren
    }

    pub fn siren_mut(&mut self) -> &mut Siren {
        &mut self.siren
    }

    /// Worst severity currently shown across all units.
    pub fn worst(&self) -> Severity {
        self.statuses
            .values()
            .map(|s| s.severity)
            .max()
            .unwrap_or(Severity::Safe)
    }

    fn push_bounded<T>(queue: &mut VecDeque<T>, item: T, capacity: usize) {
        queue.push_front(item);
        queue.truncate(capacity);
    }
}

impl Surface for Board {
    fn render_status(&mut self, unit_id: u32, text: &str, severity: Severity) {
        if let Some(status) = self.statuses.get_mut(&unit_id) {
            status.text = text.to_string();
            status.severity = severity;
        }
    }

    fn append_log(&mut self, record: AlertRecord) {
        Self::push_bounded(&mut self.alerts, record, self.capacity);
    }

    fn append_timeline(&mut self, entry: TimelineEntry) {
        Self::push_bounded(&mut self.timeline, entry, self.capacity);
    }

    fn clear_log(&mut self) {
        self.alerts.clear();
    }

    fn sound_siren(&mut self, at: Instant) {
        self.siren.trigger(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::{AlertSink, Level};
    use crate::data::Classification;
    use std::time::Duration;

    #[test]
    fn test_new_board_is_all_safe() {
        let board = Board::new([1, 2], DEFAULT_LOG_CAPACITY);
        assert_eq!(board.status(1), Some(&UnitStatus::default()));
        assert_eq!(board.status(2).map(|s| s.text.as_str()), Some("Safe"));
        assert_eq!(board.worst(), Severity::Safe);
    }

    #[test]
    fn test_unknown_unit_is_ignored() {
        let mut board = Board::new([1], DEFAULT_LOG_CAPACITY);
        board.render_status(9, "smoke/fire", Severity::Danger);
        assert!(board.status(9).is_none());
        assert_eq!(board.worst(), Severity::Safe);
    }

    #[test]
    fn test_log_is_newest_first_and_bounded() {
        let mut board = Board::new([1], 3);
        for i in 0..5 {
            board.append_log(AlertRecord::now(1, &format!("alert {}", i), Severity::Warning));
        }
        let messages: Vec<&str> = board.alerts().map(|a| a.message.as_str()).collect();
        assert_eq!(messages, vec!["alert 4", "alert 3", "alert 2"]);
    }

    #[test]
    fn test_danger_through_sink_sounds_siren() {
        let mut sink = AlertSink::new(Board::new([1, 2], DEFAULT_LOG_CAPACITY));
        sink.deliver(2, &Classification::Danger("smoke/fire".to_string()));

        let board = sink.surface();
        assert_eq!(board.siren().triggered(), 1);
        assert_eq!(board.alert_count(), 1);
        assert_eq!(board.worst(), Severity::Danger);
        let entry = board.timeline().next().unwrap();
        assert_eq!(entry.message, "Camera 2: smoke/fire");
        assert_eq!(entry.level, Level::Danger);
    }

    #[test]
    fn test_siren_starts_at_delivery_time() {
        let start = Instant::now();
        let mut sink = AlertSink::new(Board::new([1], DEFAULT_LOG_CAPACITY));
        let danger = Classification::Danger("smoke/fire".to_string());
        sink.deliver_at(1, &danger, start);
        sink.deliver_at(1, &danger, start + Duration::from_secs(10));

        let siren = sink.surface().siren();
        assert_eq!(siren.held_voices(), 1);
        assert!(siren.is_active(start + Duration::from_secs(12)));
        assert!(!siren.is_active(start + Duration::from_secs(13)));
    }

    #[test]
    fn test_clear_log_keeps_timeline() {
        let mut sink = AlertSink::new(Board::new([1], DEFAULT_LOG_CAPACITY));
        sink.deliver(1, &Classification::Warning("high heat".to_string()));
        sink.reset([1]);

        let board = sink.surface();
        assert_eq!(board.alert_count(), 0);
        assert_eq!(board.timeline().count(), 2);
        assert_eq!(board.status(1), Some(&UnitStatus::default()));
    }
}
