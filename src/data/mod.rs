//! Sensor data model and processing.
//!
//! This module holds the simulation core: readings, drift, threshold
//! evaluation and the manual trigger table. Nothing here touches the
//! terminal or the network.
//!
//! ## Submodules
//!
//! - [`duration`]: Parsing and formatting of interval strings (e.g., "800ms", "1s")
//! - [`drift`]: Random walk applied to readings on each drift tick
//! - [`feed`]: Cosmetic blob animation for the camera panels
//! - [`history`]: Recent readings for sparklines and trend arrows
//! - [`rules`]: Ordered threshold rules, [`Severity`] and [`Classification`]
//! - [`sensor`]: [`MonitoredUnit`] and the owning [`SensorState`]
//! - [`trigger`]: [`ManualTrigger`] actions and their fixed effects
//!
//! ## Data Flow
//!
//! ```text
//! Drifter::apply() ──▶ SensorState ◀── ManualTrigger (direct set)
//!                          │
//!                          ▼
//!                 Evaluator::classify()
//!                          │
//!                          ▼
//!                  Classification ──▶ AlertSink
//! ```

pub mod drift;
pub mod duration;
pub mod feed;
pub mod history;
pub mod rules;
pub mod sensor;
pub mod trigger;

pub use drift::Drifter;
pub use feed::CameraFeed;
pub use history::{ReadingHistory, Trend};
pub use rules::{Classification, Evaluator, Rule, Severity};
pub use sensor::{MonitoredUnit, Reading, SensorState};
pub use trigger::{ManualTrigger, TriggerEffect};
