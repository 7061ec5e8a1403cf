//! Historical reading tracking for sparklines and trend arrows.

use std::collections::{HashMap, VecDeque};

use super::sensor::{MonitoredUnit, Reading};

/// Maximum number of samples to keep per reading.
const MAX_HISTORY_SIZE: usize = 60;

/// Direction of the most recent change of a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Rising,
    Falling,
    Steady,
}

impl Trend {
    pub fn symbol(&self) -> &'static str {
        match self {
            Trend::Rising => "▲",
            Trend::Falling => "▼",
            Trend::Steady => "·",
        }
    }
}

/// Tracks recent readings per unit for trend display.
///
/// One sample is recorded per drift tick so the sparkline shows how the
/// random walk evolved.
#[derive(Debug, Clone, Default)]
pub struct ReadingHistory {
    samples: HashMap<(u32, Reading), VecDeque<f64>>,
}

impl ReadingHistory {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current readings of every unit.
    pub fn record(&mut self, units: &[MonitoredUnit]) {
        for unit in units {
            for reading in Reading::ALL {
                let values = self.samples.entry((unit.id(), reading)).or_default();
                values.push_back(unit.get(reading));
                if values.len() > MAX_HISTORY_SIZE {
                    values.pop_front();
                }
            }
        }
    }

    /// Number of samples stored for a reading.
    pub fn len(&self, unit_id: u32, reading: Reading) -> usize {
        self.samples.get(&(unit_id, reading)).map_or(0, VecDeque::len)
    }

    /// Drop all samples, e.g. after a reset.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Get sparkline data (0-7 for 8 bar levels) for the last `width` samples.
    ///
    /// Readings already live in `[0, 1]`, so no rescaling to the local
    /// min/max is done: a flat line at 0.1 stays low.
    pub fn sparkline(&self, unit_id: u32, reading: Reading, width: usize) -> Vec<u8> {
        let Some(values) = self.samples.get(&(unit_id, reading)) else {
            return Vec::new();
        };

        values
            .iter()
            .skip(values.len().saturating_sub(width))
            .map(|&v| ((v * 7.0).round() as u8).min(7))
            .collect()
    }

    /// Direction of the last change, or `None` with fewer than two samples.
    pub fn trend(&self, unit_id: u32, reading: Reading) -> Option<Trend> {
        let values = self.samples.get(&(unit_id, reading))?;
        if values.len() < 2 {
            return None;
        }

        let current = *values.back()?;
        let previous = *values.get(values.len() - 2)?;
        let delta = current - previous;

        Some(if delta > f64::EPSILON {
            Trend::Rising
        } else if delta < -f64::EPSILON {
            Trend::Falling
        } else {
            Trend::Steady
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_bounded() {
        let mut history = ReadingHistory::new();
        let units = vec![MonitoredUnit::new(1)];
        for _ in 0..(MAX_HISTORY_SIZE + 10) {
            history.record(&units);
        }
        assert_eq!(history.len(1, Reading::Smoke), MAX_HISTORY_SIZE);
    }

    #[test]
    fn test_sparkline_levels() {
        let mut history = ReadingHistory::new();
        let mut unit = MonitoredUnit::new(1);
        for v in [0.0, 0.5, 1.0] {
            unit.set(Reading::Heat, v);
            history.record(std::slice::from_ref(&unit));
        }
        assert_eq!(history.sparkline(1, Reading::Heat, 8), vec![0, 4, 7]);
        assert_eq!(history.sparkline(1, Reading::Heat, 2), vec![4, 7]);
        assert!(history.sparkline(2, Reading::Heat, 8).is_empty());
    }

    #[test]
    fn test_trend_needs_two_samples() {
        let mut history = ReadingHistory::new();
        let mut unit = MonitoredUnit::new(1);
        history.record(std::slice::from_ref(&unit));
        assert_eq!(history.trend(1, Reading::Crowd), None);

        unit.set(Reading::Crowd, 0.4);
        history.record(std::slice::from_ref(&unit));
        assert_eq!(history.trend(1, Reading::Crowd), Some(Trend::Rising));

        unit.set(Reading::Crowd, 0.2);
        history.record(std::slice::from_ref(&unit));
        assert_eq!(history.trend(1, Reading::Crowd), Some(Trend::Falling));

        history.record(std::slice::from_ref(&unit));
        assert_eq!(history.trend(1, Reading::Crowd), Some(Trend::Steady));
    }
}
