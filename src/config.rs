//! Settings loading.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `SAFEWATCH_*` environment variables (nested keys use `__`, e.g.
//! `SAFEWATCH_SERVER__PORT=8080`). Command-line flags are applied on top by
//! the binary.
//!
//! ```toml
//! units = 2
//! drift_interval = "1s"
//! evaluate_interval = "800ms"
//! coupled = false
//!
//! [server]
//! port = 3000
//! assets = "web"
//!
//! [[rules]]
//! reading = "smoke"
//! threshold = 0.5
//! severity = "danger"
//! message = "smoke/fire"
//! ```

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::alert::DEFAULT_LOG_CAPACITY;
use crate::data::drift::DEFAULT_DRIFT_STEP;
use crate::data::{Evaluator, Rule};
use crate::error::{Error, Result};
use crate::schedule::Timing;
use crate::server::ServerConfig;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "SAFEWATCH";

/// Runtime settings for a session.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Number of monitored units.
    pub units: u32,
    /// Period of the drift tick.
    #[serde(deserialize_with = "crate::data::duration::deserialize")]
    pub drift_interval: Duration,
    /// Period of the evaluation tick.
    #[serde(deserialize_with = "crate::data::duration::deserialize")]
    pub evaluate_interval: Duration,
    /// Maximum change per reading per drift tick.
    pub drift_step: f64,
    /// Evaluate right after each drift instead of on a separate timer.
    pub coupled: bool,
    /// Maximum entries kept in the alert log and the timeline.
    pub log_capacity: usize,
    /// Replacement rule list, in priority order.
    pub rules: Option<Vec<Rule>>,
    pub server: ServerConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            units: 2,
            drift_interval: Duration::from_secs(1),
            evaluate_interval: Duration::from_millis(800),
            drift_step: DEFAULT_DRIFT_STEP,
            coupled: false,
            log_capacity: DEFAULT_LOG_CAPACITY,
            rules: None,
            server: ServerConfig::default(),
        }
    }
}

/// `SAFEWATCH_*` variables, `__` between nested keys.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl Settings {
    /// Load settings from an optional file plus the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_layered(path, environment())
    }

    fn load_layered(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder.add_source(env).build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from TOML text, without environment overrides.
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.units == 0 {
            return Err(Error::InvalidSetting("units must be at least 1".to_string()));
        }
        if self.drift_interval.is_zero() || self.evaluate_interval.is_zero() {
            return Err(Error::InvalidSetting(
                "tick intervals must be greater than zero".to_string(),
            ));
        }
        if !self.drift_step.is_finite() || !(0.0..=1.0).contains(&self.drift_step) {
            return Err(Error::InvalidSetting(format!(
                "drift_step {} is outside [0, 1]",
                self.drift_step
            )));
        }
        if self.log_capacity == 0 {
            return Err(Error::InvalidSetting("log_capacity must be at least 1".to_string()));
        }
        self.evaluator().map(|_| ())
    }

    /// Build the evaluator for the configured rule list.
    pub fn evaluator(&self) -> Result<Evaluator> {
        match &self.rules {
            Some(rules) => Evaluator::new(rules.clone()),
            None => Ok(Evaluator::default()),
        }
    }

    pub fn timing(&self) -> Timing {
        if self.coupled {
            Timing::Coupled
        } else {
            Timing::Independent
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Reading, Severity};
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.units, 2);
        assert_eq!(settings.drift_interval, Duration::from_secs(1));
        assert_eq!(settings.evaluate_interval, Duration::from_millis(800));
        assert_eq!(settings.drift_step, 0.025);
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.server.assets, PathBuf::from("web"));
        assert_eq!(settings.timing(), Timing::Independent);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings.units, 2);
        assert_eq!(settings.evaluate_interval, Duration::from_millis(800));
    }

    #[test]
    fn test_toml_overrides() {
        let settings = Settings::from_toml(
            r#"
            units = 3
            evaluate_interval = "500ms"
            coupled = true

            [server]
            port = 8080
            "#,
        )
        .unwrap();
        assert_eq!(settings.units, 3);
        assert_eq!(settings.evaluate_interval, Duration::from_millis(500));
        assert_eq!(settings.drift_interval, Duration::from_secs(1));
        assert_eq!(settings.timing(), Timing::Coupled);
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn test_custom_rules() {
        let settings = Settings::from_toml(
            r#"
            [[rules]]
            reading = "movement"
            threshold = 0.4
            severity = "warning"
            message = "intruder"
            "#,
        )
        .unwrap();
        let evaluator = settings.evaluator().unwrap();
        assert_eq!(evaluator.rules().len(), 1);
        assert_eq!(evaluator.rules()[0].reading, Reading::Movement);
        assert_eq!(evaluator.rules()[0].severity, Severity::Warning);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            Settings::from_toml("units = 0"),
            Err(Error::InvalidSetting(_))
        ));
        assert!(matches!(
            Settings::from_toml("drift_step = 2.0"),
            Err(Error::InvalidSetting(_))
        ));
        assert!(matches!(
            Settings::from_toml(r#"drift_interval = "0ms""#),
            Err(Error::InvalidSetting(_))
        ));
        assert!(Settings::from_toml(r#"evaluate_interval = "often""#).is_err());
        assert!(matches!(
            Settings::from_toml(
                r#"
                [[rules]]
                reading = "heat"
                threshold = 0.4
                severity = "safe"
                message = "fine"
                "#
            ),
            Err(Error::InvalidRule(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "units = 4\nlog_capacity = 10").unwrap();
        file.flush().unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.units, 4);
        assert_eq!(settings.log_capacity, 10);
    }

    fn env(vars: &[(&str, &str)]) -> Environment {
        let mut map = config::Map::new();
        for (key, value) in vars {
            map.insert(key.to_string(), value.to_string());
        }
        environment().source(Some(map))
    }

    #[test]
    fn test_env_overrides() {
        let settings = Settings::load_layered(
            None,
            env(&[
                ("SAFEWATCH_UNITS", "5"),
                ("SAFEWATCH_SERVER__PORT", "8181"),
                ("SAFEWATCH_DRIFT_STEP", "0.05"),
                ("SAFEWATCH_EVALUATE_INTERVAL", "500ms"),
                ("UNRELATED_UNITS", "9"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.units, 5);
        assert_eq!(settings.server.port, 8181);
        assert_eq!(settings.drift_step, 0.05);
        assert_eq!(settings.evaluate_interval, Duration::from_millis(500));
        assert_eq!(settings.drift_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_env_takes_precedence_over_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "units = 4\ncoupled = true\n\n[server]\nport = 9000").unwrap();
        file.flush().unwrap();

        let settings = Settings::load_layered(
            Some(file.path()),
            env(&[("SAFEWATCH_UNITS", "6"), ("SAFEWATCH_SERVER__PORT", "9100")]),
        )
        .unwrap();
        assert_eq!(settings.units, 6);
        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.timing(), Timing::Coupled);
    }

    #[test]
    fn test_env_values_are_validated() {
        let result = Settings::load_layered(None, env(&[("SAFEWATCH_UNITS", "0")]));
        assert!(matches!(result, Err(Error::InvalidSetting(_))));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = Settings::load(Some(Path::new("/nonexistent/safewatch.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
