//! Threshold rules and classification.
//!
//! A unit is classified by walking an ordered rule list; the first rule whose
//! reading is strictly above its threshold decides the outcome. When nothing
//! matches the unit is [`Classification::Safe`].

use serde::{Deserialize, Serialize};

use super::sensor::{MonitoredUnit, Reading};
use crate::error::{Error, Result};

/// Severity of a classification or alert.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Safe,
    Warning,
    Danger,
}

impl Severity {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Safe => "SAFE",
            Severity::Warning => "WARN",
            Severity::Danger => "DANGER",
        }
    }

    /// Lowercase tag, as used in the JSON snapshot.
    pub fn tag(&self) -> &'static str {
        match self {
            Severity::Safe => "safe",
            Severity::Warning => "warn",
            Severity::Danger => "danger",
        }
    }
}

/// Outcome of evaluating one unit at one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Safe,
    Warning(String),
    Danger(String),
}

impl Classification {
    /// Build a classification from a severity and a reason. A `Safe`
    /// severity drops the reason.
    pub fn new(severity: Severity, reason: impl Into<String>) -> Self {
        match severity {
            Severity::Safe => Classification::Safe,
            Severity::Warning => Classification::Warning(reason.into()),
            Severity::Danger => Classification::Danger(reason.into()),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Classification::Safe => Severity::Safe,
            Classification::Warning(_) => Severity::Warning,
            Classification::Danger(_) => Severity::Danger,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Classification::Safe => None,
            Classification::Warning(r) | Classification::Danger(r) => Some(r),
        }
    }
}

/// One ordered threshold rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub reading: Reading,
    pub threshold: f64,
    pub severity: Severity,
    pub message: String,
}

impl Rule {
    pub fn new(reading: Reading, threshold: f64, severity: Severity, message: &str) -> Self {
        Self {
            reading,
            threshold,
            severity,
            message: message.to_string(),
        }
    }

    /// Strict comparison: a reading equal to the threshold does not match.
    pub fn matches(&self, unit: &MonitoredUnit) -> bool {
        unit.get(self.reading) > self.threshold
    }

    fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::InvalidRule(format!(
                "threshold {} for {} is outside [0, 1]",
                self.threshold,
                self.reading.label()
            )));
        }
        if self.severity == Severity::Safe {
            return Err(Error::InvalidRule(format!(
                "rule for {} must be warning or danger",
                self.reading.label()
            )));
        }
        if self.message.trim().is_empty() {
            return Err(Error::InvalidRule(format!(
                "rule for {} has an empty message",
                self.reading.label()
            )));
        }
        Ok(())
    }
}

/// The built-in rule set, most severe first.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new(Reading::Smoke, 0.5, Severity::Danger, "smoke/fire"),
        Rule::new(Reading::Heat, 0.6, Severity::Warning, "high heat"),
        Rule::new(Reading::Crowd, 0.7, Severity::Warning, "overcrowding"),
        Rule::new(Reading::Movement, 0.65, Severity::Warning, "abnormal movement"),
    ]
}

/// Classifies units against an ordered rule list.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluator {
    rules: Vec<Rule>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

impl Evaluator {
    /// Create an evaluator from a custom rule list, validating each rule.
    pub fn new(rules: Vec<Rule>) -> Result<Self> {
        rules.iter().try_for_each(Rule::validate)?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Classify a unit. First matching rule wins.
    pub fn classify(&self, unit: &MonitoredUnit) -> Classification {
        self.rules
            .iter()
            .find(|rule| rule.matches(unit))
            .map(|rule| Classification::new(rule.severity, rule.message.as_str()))
            .unwrap_or(Classification::Safe)
    }
}
