//! Random-walk drift applied to sensor readings on every drift tick.

use rand::Rng;

use super::sensor::{clamp_unit, Reading, SensorState};

/// Default maximum change per reading per tick.
pub const DEFAULT_DRIFT_STEP: f64 = 0.025;

/// Apply a single drift delta to a reading, keeping it inside `[0, 1]`.
pub fn drift_value(value: f64, delta: f64) -> f64 {
    clamp_unit(value + delta)
}

/// Perturbs every reading of every unit by a uniform delta in
/// `[-step, step]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drifter {
    step: f64,
}

impl Default for Drifter {
    fn default() -> Self {
        Self::new(DEFAULT_DRIFT_STEP)
    }
}

impl Drifter {
    /// Create a drifter with the given step. Negative or non-finite steps
    /// are treated as zero.
    pub fn new(step: f64) -> Self {
        let step = if step.is_finite() { step.abs() } else { 0.0 };
        Self { step }
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Run one drift tick over all units.
    pub fn apply<R: Rng + ?Sized>(&self, state: &mut SensorState, rng: &mut R) {
        for unit in state.units_mut() {
            for reading in Reading::ALL {
                let delta = rng.gen_range(-self.step..=self.step);
                unit.set(reading, drift_value(unit.get(reading), delta));
            }
        }
    }
}
