//! Terminal UI rendering using ratatui.
//!
//! Each panel is implemented in its own submodule with a `render` function.
//!
//! ## Submodules
//!
//! - [`cameras`]: Grid of animated camera panels with status badges
//! - [`sensors`]: Per-unit reading table with gauges, sparklines and trends
//! - [`alerts`]: Alert log and activity timeline
//! - [`common`]: Shared components (header with siren banner, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├────────────────────────┬─────────────┤
//! │ Cameras                │ Alert log   │
//! │ (cameras::render)      │ (alerts)    │
//! ├────────────────────────┼─────────────┤
//! │ Sensors                │ Timeline    │
//! │ (sensors::render)      │ (alerts)    │
//! ├────────────────────────┴─────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlays rendered on top:
//!    - common::render_help
//! ```

pub mod alerts;
pub mod cameras;
pub mod common;
pub mod sensors;
pub mod theme;

pub use theme::Theme;
