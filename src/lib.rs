//! # safewatch
//!
//! A simulated camera safety dashboard: a handful of monitored units carry
//! four drifting sensor readings (smoke, heat, crowd, movement), an
//! evaluator classifies each unit against ordered threshold rules, and the
//! resulting alerts are rendered as status badges, an alert log, an activity
//! timeline and a siren.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            Session                              │
//! │  ┌─────────┐   ┌───────────┐   ┌───────────┐   ┌─────────────┐  │
//! │  │ Drifter │──▶│SensorState│──▶│ Evaluator │──▶│  AlertSink  │  │
//! │  └─────────┘   └───────────┘   └───────────┘   └──────┬──────┘  │
//! │       ▲              ▲                                │         │
//! │       │              │ ManualTrigger                  ▼         │
//! │  ┌─────────┐         │                          ┌──────────┐    │
//! │  │Scheduler│         │                          │ Surface  │    │
//! │  └─────────┘         │                          │ (Board)  │    │
//! └──────────────────────┼──────────────────────────┴────┬─────┴────┘
//!                        │                               │ Snapshot
//!                   ┌────┴────┐                 ┌────────┴────────┐
//!                   │   app   │───▶ ui          │  StaticServer   │
//!                   │(terminal)                 │ (web assets)    │
//!                   └─────────┘                 └─────────────────┘
//! ```
//!
//! - **[`data`]**: Sensor readings, drift, rule evaluation, manual triggers,
//!   reading history and the simulated camera feeds
//! - **[`alert`]**: The [`Surface`] trait, the [`AlertSink`] that drives it,
//!   the in-memory [`Board`] and the [`Siren`] model
//! - **[`session`]**: The owning [`Session`] context and serializable
//!   [`Snapshot`]
//! - **[`schedule`]**: Drift and evaluation tickers
//! - **[`server`]**: HTTP/1 static asset server with SPA fallback
//! - **[`app`]** and **[`ui`]**: Terminal dashboard state and rendering
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Terminal dashboard plus the web asset server on port 3000
//! safewatch
//!
//! # Only the simulation and the web server
//! safewatch --headless --port 8080
//!
//! # Simulate 60 seconds and write the final state
//! safewatch --export state.json --ticks 60
//! ```
//!
//! ### As a library
//!
//! ```
//! use safewatch::{ManualTrigger, Session, Settings, Severity};
//!
//! let mut session = Session::from_settings(&Settings::default(), Some(1)).unwrap();
//! session.trigger_on(ManualTrigger::SimulateFire, 1);
//!
//! assert_eq!(session.board().worst(), Severity::Danger);
//! assert_eq!(session.board().siren().triggered(), 1);
//! ```
//!
//! ### With a custom surface
//!
//! ```
//! use safewatch::alert::{AlertRecord, Surface, TimelineEntry};
//! use safewatch::data::{Drifter, Evaluator, SensorState};
//! use safewatch::{Session, Severity};
//! use rand::{rngs::StdRng, SeedableRng};
//! use std::time::Instant;
//!
//! #[derive(Default)]
//! struct Console;
//!
//! impl Surface for Console {
//!     fn render_status(&mut self, unit_id: u32, text: &str, _: Severity) {
//!         println!("unit {unit_id}: {text}");
//!     }
//!     fn append_log(&mut self, _: AlertRecord) {}
//!     fn append_timeline(&mut self, _: TimelineEntry) {}
//!     fn clear_log(&mut self) {}
//!     fn sound_siren(&mut self, _: Instant) {
//!         print!("\x07");
//!     }
//! }
//!
//! let mut session = Session::new(
//!     SensorState::new(2),
//!     Drifter::default(),
//!     Evaluator::default(),
//!     Console,
//!     StdRng::seed_from_u64(7),
//! );
//! session.drift();
//! session.evaluate();
//! ```

pub mod alert;
pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod schedule;
pub mod server;
pub mod session;
pub mod ui;

// Re-export main types for convenience
pub use alert::{AlertSink, Board, Siren, Surface};
pub use app::App;
pub use config::Settings;
pub use data::{Classification, Evaluator, ManualTrigger, MonitoredUnit, Reading, SensorState, Severity};
pub use error::{Error, Result};
pub use schedule::{Scheduler, Timing};
pub use server::{ServerConfig, SharedSnapshot, StaticServer};
pub use session::{Session, Snapshot};
