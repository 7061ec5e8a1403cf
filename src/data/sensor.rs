//! Sensor readings for the monitored units.
//!
//! Every unit carries four scalars in `[0, 1]`. All writes go through
//! [`MonitoredUnit::set`], which clamps, so the range invariant holds no
//! matter who mutates the unit (drift, manual triggers, reset).

use serde::{Deserialize, Serialize};

/// Initial smoke level for a freshly created unit.
pub const INITIAL_SMOKE: f64 = 0.1;
/// Initial heat level for a freshly created unit.
pub const INITIAL_HEAT: f64 = 0.2;
/// Initial crowd density for a freshly created unit.
pub const INITIAL_CROWD: f64 = 0.1;
/// Initial movement level for a freshly created unit.
pub const INITIAL_MOVEMENT: f64 = 0.1;

/// One of the four scalar readings carried by a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reading {
    Smoke,
    Heat,
    Crowd,
    Movement,
}

impl Reading {
    /// All readings, in display order.
    pub const ALL: [Reading; 4] = [Reading::Smoke, Reading::Heat, Reading::Crowd, Reading::Movement];

    /// Returns the display label for this reading.
    pub fn label(&self) -> &'static str {
        match self {
            Reading::Smoke => "Smoke",
            Reading::Heat => "Heat",
            Reading::Crowd => "Crowd",
            Reading::Movement => "Movement",
        }
    }

    /// Value this reading takes when a unit is created or reset.
    pub fn initial(&self) -> f64 {
        match self {
            Reading::Smoke => INITIAL_SMOKE,
            Reading::Heat => INITIAL_HEAT,
            Reading::Crowd => INITIAL_CROWD,
            Reading::Movement => INITIAL_MOVEMENT,
        }
    }
}

/// Clamp a reading into `[0, 1]`. NaN collapses to zero.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// A simulated camera/sensor source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoredUnit {
    id: u32,
    smoke: f64,
    heat: f64,
    crowd: f64,
    movement: f64,
}

impl MonitoredUnit {
    /// Create a unit with the initial readings.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            smoke: INITIAL_SMOKE,
            heat: INITIAL_HEAT,
            crowd: INITIAL_CROWD,
            movement: INITIAL_MOVEMENT,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn smoke(&self) -> f64 {
        self.smoke
    }

    pub fn heat(&self) -> f64 {
        self.heat
    }

    pub fn crowd(&self) -> f64 {
        self.crowd
    }

    pub fn movement(&self) -> f64 {
        self.movement
    }

    /// Read a scalar by name.
    pub fn get(&self, reading: Reading) -> f64 {
        match reading {
            Reading::Smoke => self.smoke,
            Reading::Heat => self.heat,
            Reading::Crowd => self.crowd,
            Reading::Movement => self.movement,
        }
    }

    /// Set a scalar, clamped into `[0, 1]`.
    pub fn set(&mut self, reading: Reading, value: f64) {
        let value = clamp_unit(value);
        match reading {
            Reading::Smoke => self.smoke = value,
            Reading::Heat => self.heat = value,
            Reading::Crowd => self.crowd = value,
            Reading::Movement => self.movement = value,
        }
    }

    /// Restore the initial readings.
    pub fn reset(&mut self) {
        for reading in Reading::ALL {
            self.set(reading, reading.initial());
        }
    }
}

/// The fixed collection of units for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorState {
    units: Vec<MonitoredUnit>,
}

impl SensorState {
    /// Create `count` units with ids starting at 1. At least one unit is
    /// always created.
    pub fn new(count: u32) -> Self {
        let units = (1..=count.max(1)).map(MonitoredUnit::new).collect();
        Self { units }
    }

    pub fn units(&self) -> &[MonitoredUnit] {
        &self.units
    }

    pub fn units_mut(&mut self) -> &mut [MonitoredUnit] {
        &mut self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Ids of all units, in creation order.
    pub fn ids(&self) -> Vec<u32> {
        self.units.iter().map(MonitoredUnit::id).collect()
    }

    pub fn get(&self, id: u32) -> Option<&MonitoredUnit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut MonitoredUnit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    /// Put every unit back to its initial readings.
    pub fn reset_all(&mut self) {
        self.units.iter_mut().for_each(MonitoredUnit::reset);
    }
}
