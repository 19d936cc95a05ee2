//! Tumble: boxes and balls rain onto a floor, fall off its edges and
//! remove themselves once they are far enough below the screen.
//!
//! The periodic spawn loop drops a box or a ball every
//! [`SPAWN_INTERVAL`](params::SPAWN_INTERVAL) seconds while auto-spawn is on.
//! Every spawned node carries an [`AutoSuicide`](monitor::AutoSuicide)
//! monitor. The "Options" panel tweaks the shared
//! [`SpawnParameters`](params::SpawnParameters) and spawns on demand.
//!
//! ```
//! use tumble_demo::prelude::*;
//!
//! let mut session = build(&DemoConfig::default());
//! session.run_for(1.0);
//!
//! // At 60 Hz a cycle takes eight ticks.
//! assert_eq!(session.state().loop_spawns, 7);
//! assert_eq!(session.state().loop_spawns as usize + 1, session.world().len());
//! ```

#![deny(unsafe_code)]

pub mod app;
pub mod config;
pub mod monitor;
pub mod panel;
pub mod params;
pub mod spawn_loop;
pub mod spawner;
pub mod state;

pub mod prelude {
    pub use crate::app::{build, build_world, burst, floor, DemoLoop, FLOOR_SIZE, FLOOR_Y};
    pub use crate::config::{ConfigError, DemoConfig, WindowConfig};
    pub use crate::monitor::{AutoSuicide, MonitorState};
    pub use crate::panel::{draw_debug_panel, PanelOutcome, PanelUi, ScriptedUi, Widget};
    pub use crate::params::{PauseGranularity, SpawnParameters, SPAWN_INTERVAL};
    pub use crate::spawn_loop::{choose_kind, spawn_cycle, spawn_loop, spawn_random};
    pub use crate::spawner::{spawn, spawn_ball, spawn_box, spawn_many, SpawnKind};
    pub use crate::state::DemoState;
}
