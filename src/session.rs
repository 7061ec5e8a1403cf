//! The owning session context.
//!
//! A [`Session`] holds everything that was ambient global state in a naive
//! dashboard: the units, the drifter, the evaluator, the alert sink and the
//! random source. Drift ticks, evaluation ticks and manual triggers all go
//! through `&mut Session`, so there is exactly one writer at a time.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::alert::{AlertRecord, AlertSink, Board, Surface, TimelineEntry, UnitStatus};
use crate::config::Settings;
use crate::data::{Classification, Drifter, Evaluator, ManualTrigger, MonitoredUnit, SensorState};
use crate::error::Result;
use crate::schedule::Due;

/// Serializable view of a session, served over HTTP and written by export.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub units: Vec<UnitSnapshot>,
    /// Newest first.
    pub alerts: Vec<AlertRecord>,
    /// Newest first.
    pub timeline: Vec<TimelineEntry>,
    pub siren_active: bool,
}

/// One unit's readings and status.
#[derive(Debug, Clone, Serialize)]
pub struct UnitSnapshot {
    #[serde(flatten)]
    pub unit: MonitoredUnit,
    pub status: UnitStatus,
}

pub struct Session<S = Board> {
    state: SensorState,
    drifter: Drifter,
    evaluator: Evaluator,
    sink: AlertSink<S>,
    rng: StdRng,
}

impl Session<Board> {
    /// Build a session with an in-memory [`Board`] surface.
    ///
    /// A `seed` makes drift and trigger targeting reproducible.
    pub fn from_settings(settings: &Settings, seed: Option<u64>) -> Result<Self> {
        let state = SensorState::new(settings.units);
        let board = Board::new(state.ids(), settings.log_capacity);
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self::new(
            state,
            Drifter::new(settings.drift_step),
            settings.evaluator()?,
            board,
            rng,
        ))
    }

    pub fn board(&self) -> &Board {
        self.sink.surface()
    }

    pub fn board_mut(&mut self) -> &mut Board {
        self.sink.surface_mut()
    }

    /// Capture the current state for serialization.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_at(Instant::now())
    }

    /// Capture the state as of `now`, which decides whether the siren is
    /// still sounding.
    pub fn snapshot_at(&self, now: Instant) -> Snapshot {
        let board = self.board();
        let units = self
            .state
            .units()
            .iter()
            .map(|unit| UnitSnapshot {
                unit: unit.clone(),
                status: board.status(unit.id()).cloned().unwrap_or_default(),
            })
            .collect();

        Snapshot {
            units,
            alerts: board.alerts().cloned().collect(),
            timeline: board.timeline().cloned().collect(),
            siren_active: board.siren().is_active(now),
        }
    }
}

impl<S: Surface> Session<S> {
    pub fn new(
        state: SensorState,
        drifter: Drifter,
        evaluator: Evaluator,
        surface: S,
        rng: StdRng,
    ) -> Self {
        Self {
            state,
            drifter,
            evaluator,
            sink: AlertSink::new(surface),
            rng,
        }
    }

    pub fn units(&self) -> &[MonitoredUnit] {
        self.state.units()
    }

    pub fn unit(&self, id: u32) -> Option<&MonitoredUnit> {
        self.state.get(id)
    }

    pub fn unit_mut(&mut self, id: u32) -> Option<&mut MonitoredUnit> {
        self.state.get_mut(id)
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn surface(&self) -> &S {
        self.sink.surface()
    }

    /// A new generator seeded from the session's own, for cosmetic
    /// randomness that should follow the session seed.
    pub fn fork_rng(&mut self) -> StdRng {
        StdRng::seed_from_u64(self.rng.gen())
    }

    /// Run one drift tick.
    pub fn drift(&mut self) {
        self.drifter.apply(&mut self.state, &mut self.rng);
    }

    /// Run one evaluation tick: classify every unit and deliver the result.
    pub fn evaluate(&mut self) -> Vec<(u32, Classification)> {
        self.evaluate_at(Instant::now())
    }

    /// [`evaluate`](Self::evaluate) with `now` as the tick time.
    pub fn evaluate_at(&mut self, now: Instant) -> Vec<(u32, Classification)> {
        let verdicts: Vec<(u32, Classification)> = self
            .state
            .units()
            .iter()
            .map(|unit| (unit.id(), self.evaluator.classify(unit)))
            .collect();

        for (unit_id, classification) in &verdicts {
            self.sink.deliver_at(*unit_id, classification, now);
        }
        verdicts
    }

    /// Run whatever is due, drift before evaluation.
    pub fn advance(&mut self, due: Due) {
        self.advance_at(due, Instant::now());
    }

    /// [`advance`](Self::advance) at a tick time other than the wall clock,
    /// as when simulating.
    pub fn advance_at(&mut self, due: Due, now: Instant) {
        if due.drift {
            self.drift();
        }
        if due.evaluate {
            self.evaluate_at(now);
        }
    }

    /// Fire a manual trigger on a randomly chosen unit.
    ///
    /// Returns the affected unit id, or `None` for a reset.
    pub fn trigger(&mut self, trigger: ManualTrigger) -> Option<u32> {
        if trigger == ManualTrigger::Reset {
            self.reset();
            return None;
        }

        let units = self.state.units();
        let unit_id = units[self.rng.gen_range(0..units.len())].id();
        self.trigger_on(trigger, unit_id).then_some(unit_id)
    }

    /// Fire a manual trigger on a specific unit. Returns `false` if the unit
    /// does not exist. `Reset` ignores the unit and resets everything.
    pub fn trigger_on(&mut self, trigger: ManualTrigger, unit_id: u32) -> bool {
        let Some(effect) = trigger.effect() else {
            self.reset();
            return true;
        };
        let Some(unit) = self.state.get_mut(unit_id) else {
            return false;
        };

        tracing::info!(trigger = trigger.name(), unit_id, "manual trigger");
        unit.set(effect.reading, effect.value);
        self.sink.raise(unit_id, effect.message, effect.severity);
        true
    }

    /// Restore initial readings, mark all units safe and clear the log.
    pub fn reset(&mut self) {
        tracing::info!("session reset");
        self.state.reset_all();
        self.sink.reset(self.state.ids());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::tests::Recorder;
    use crate::data::{Reading, Severity};
    use std::time::Duration;

    fn session() -> Session {
        Session::from_settings(&Settings::default(), Some(7)).unwrap()
    }

    const FIRE_MESSAGE: &str = "حريق كبير — ضرورة إخلاء فوري";

    #[test]
    fn test_initial_evaluation_is_safe() {
        let mut session = session();
        let verdicts = session.evaluate();
        assert_eq!(
            verdicts,
            vec![(1, Classification::Safe), (2, Classification::Safe)]
        );
        assert_eq!(session.board().alert_count(), 0);
    }

    #[test]
    fn test_evaluation_is_idempotent_without_mutation() {
        let mut session = session();
        session.unit_mut(1).unwrap().set(Reading::Heat, 0.7);
        let first = session.evaluate();
        let second = session.evaluate();
        assert_eq!(first, second);
    }

    #[test]
    fn test_simulate_fire() {
        let mut session = session();
        let unit_id = session.trigger(ManualTrigger::SimulateFire).unwrap();

        assert_eq!(session.unit(unit_id).unwrap().smoke(), 0.9);
        let board = session.board();
        let record = board.alerts().next().unwrap();
        assert_eq!(record.unit_id, unit_id);
        assert_eq!(record.message, FIRE_MESSAGE);
        assert_eq!(record.severity, Severity::Danger);
        assert_eq!(board.siren().triggered(), 1);
        assert_eq!(board.status(unit_id).unwrap().text, FIRE_MESSAGE);
    }

    #[test]
    fn test_warning_triggers_do_not_sound_siren() {
        let mut session = session();
        for trigger in [
            ManualTrigger::SimulateHeat,
            ManualTrigger::SimulateCrowd,
            ManualTrigger::SimulateMotion,
        ] {
            assert!(session.trigger_on(trigger, 2));
        }

        let unit = session.unit(2).unwrap();
        assert_eq!(unit.heat(), 0.85);
        assert_eq!(unit.crowd(), 0.9);
        assert_eq!(unit.movement(), 0.9);
        assert_eq!(session.board().alert_count(), 3);
        assert_eq!(session.board().siren().triggered(), 0);
    }

    #[test]
    fn test_trigger_on_unknown_unit() {
        let mut session = session();
        assert!(!session.trigger_on(ManualTrigger::SimulateFire, 42));
        assert_eq!(session.board().alert_count(), 0);
    }

    #[test]
    fn test_reset_restores_everything() {
        let mut session = session();
        session.trigger_on(ManualTrigger::SimulateFire, 1);
        session.trigger_on(ManualTrigger::SimulateCrowd, 2);
        for _ in 0..20 {
            session.drift();
        }

        assert_eq!(session.trigger(ManualTrigger::Reset), None);

        for unit in session.units() {
            assert_eq!(
                (unit.smoke(), unit.heat(), unit.crowd(), unit.movement()),
                (0.1, 0.2, 0.1, 0.1)
            );
        }
        let board = session.board();
        assert_eq!(board.alert_count(), 0);
        assert!(board.statuses().all(|(_, s)| s.severity == Severity::Safe));
        assert_eq!(board.timeline().next().unwrap().message, "System reset");
    }

    #[test]
    fn test_fire_then_evaluation_keeps_danger() {
        let mut session = session();
        session.trigger_on(ManualTrigger::SimulateFire, 1);
        let verdicts = session.evaluate();
        assert_eq!(verdicts[0], (1, Classification::Danger("smoke/fire".to_string())));
        assert_eq!(session.board().siren().triggered(), 2);
    }

    #[test]
    fn test_repeated_danger_keeps_siren_bounded() {
        let mut session = session();
        let start = Instant::now();
        session.unit_mut(1).unwrap().set(Reading::Smoke, 0.9);

        for i in 0..10_000u64 {
            session.evaluate_at(start + Duration::from_millis(i * 100));
        }

        let siren = session.board().siren();
        assert_eq!(siren.triggered(), 10_000);
        assert!(siren.held_voices() <= 30);
        assert!(!session.snapshot_at(start + Duration::from_secs(2000)).siren_active);
    }

    #[test]
    fn test_forked_rng_follows_seed() {
        let mut a = session();
        let mut b = session();
        assert_eq!(a.fork_rng().gen::<u64>(), b.fork_rng().gen::<u64>());
    }

    #[test]
    fn test_custom_surface_receives_calls() {
        let mut session = Session::new(
            SensorState::new(1),
            Drifter::default(),
            Evaluator::default(),
            Recorder::default(),
            StdRng::seed_from_u64(1),
        );
        session.unit_mut(1).unwrap().set(Reading::Movement, 0.8);
        session.evaluate();
        assert_eq!(
            session.surface().calls.last().map(String::as_str),
            Some("status 1 abnormal movement warn")
        );
    }

    #[test]
    fn test_snapshot_reflects_board() {
        let mut session = session();
        session.trigger_on(ManualTrigger::SimulateHeat, 2);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.units.len(), 2);
        assert_eq!(snapshot.units[1].status.severity, Severity::Warning);
        assert_eq!(snapshot.alerts.len(), 1);
        assert!(!snapshot.siren_active);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["units"][1]["id"], 2);
        assert_eq!(json["units"][1]["heat"], 0.85);
        assert_eq!(json["units"][1]["status"]["severity"], "warning");
    }
}
