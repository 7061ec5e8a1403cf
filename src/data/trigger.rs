//! Manual trigger actions.
//!
//! Triggers bypass the evaluator: each one forces a single reading to a fixed
//! high value and raises a fixed alert straight away. `Reset` restores the
//! initial readings instead.

use serde::{Deserialize, Serialize};

use super::rules::Severity;
use super::sensor::Reading;

/// A named manual action an operator can fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ManualTrigger {
    SimulateFire,
    SimulateHeat,
    SimulateCrowd,
    SimulateMotion,
    Reset,
}

/// What a simulate-* trigger does to its unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerEffect {
    pub reading: Reading,
    pub value: f64,
    pub severity: Severity,
    pub message: &'static str,
}

impl ManualTrigger {
    pub const ALL: [ManualTrigger; 5] = [
        ManualTrigger::SimulateFire,
        ManualTrigger::SimulateHeat,
        ManualTrigger::SimulateCrowd,
        ManualTrigger::SimulateMotion,
        ManualTrigger::Reset,
    ];

    /// Stable action name.
    pub fn name(&self) -> &'static str {
        match self {
            ManualTrigger::SimulateFire => "simulate-fire",
            ManualTrigger::SimulateHeat => "simulate-heat",
            ManualTrigger::SimulateCrowd => "simulate-crowd",
            ManualTrigger::SimulateMotion => "simulate-motion",
            ManualTrigger::Reset => "reset",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// The fixed reading/value/alert for this trigger. `None` for `Reset`.
    pub fn effect(&self) -> Option<TriggerEffect> {
        let effect = match self {
            ManualTrigger::SimulateFire => TriggerEffect {
                reading: Reading::Smoke,
                value: 0.9,
                severity: Severity::Danger,
                message: "حريق كبير — ضرورة إخلاء فوري",
            },
            ManualTrigger::SimulateHeat => TriggerEffect {
                reading: Reading::Heat,
                value: 0.85,
                severity: Severity::Warning,
                message: "ارتفاع حرارة شديد",
            },
            ManualTrigger::SimulateCrowd => TriggerEffect {
                reading: Reading::Crowd,
                value: 0.9,
                severity: Severity::Warning,
                message: "ازدحام شديد",
            },
            ManualTrigger::SimulateMotion => TriggerEffect {
                reading: Reading::Movement,
                value: 0.9,
                severity: Severity::Warning,
                message: "حركة عالية — احتمال وجود شخص",
            },
            ManualTrigger::Reset => return None,
        };
        Some(effect)
    }
}
