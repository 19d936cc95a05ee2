//! Tumble Engine: fixed-timestep tick loop, rapier2d physics bridge and
//! cooperative action scheduler over a [`tumble_scene`] world.
//!
//! # Quick Start
//!
//! ```
//! use tumble_engine::prelude::*;
//!
//! let config = TickConfig { fixed_dt: 1.0 / 60.0, ..Default::default() };
//! let mut tick_loop = TickLoop::new(World::new(), PhysicsWorld::default(), 0u32, config);
//!
//! tick_loop.run_action(repeat_forever(|| {
//!     sequence(vec![
//!         wait(0.125),
//!         execute(|cx: &mut ActionContext<'_, u32>| *cx.state += 1),
//!     ])
//! }));
//!
//! tick_loop.run_ticks(60);
//! assert_eq!(*tick_loop.state(), 7);
//! ```

#![deny(unsafe_code)]

pub mod action;
pub mod logging;
pub mod physics;
pub mod snapshot;
pub mod stats;
pub mod tick;

/// Re-export the scene crate for convenience.
pub use tumble_scene;

/// Convenience re-exports for common engine usage.
pub mod prelude {
    pub use tumble_scene::prelude::*;

    pub use crate::action::{
        execute, kill, pausable, repeat_forever, sequence, wait, wait_until, Action,
        ActionContext, ActionId, ActionRunner, ActionStatus, BoxedAction,
    };
    pub use crate::logging::{init_logging, LoggingConfig};
    pub use crate::physics::{BodyState, ContactPair, PhysicsConfig, PhysicsWorld};
    pub use crate::snapshot::{state_hash, SceneSnapshot};
    pub use crate::stats::{Corner, Stats};
    pub use crate::tick::{FrameFn, TickConfig, TickDiagnostics, TickLoop};
}
