//! Tumble scene -- node container with generational handles and per-node
//! behaviors.
//!
//! This crate holds what the simulation is *made of*: the [`World`] of
//! attached [`Node`]s, the [`Behavior`]s watching them, and the
//! [`CommandBuffer`] those behaviors use to ask for changes. It knows nothing
//! about physics or time; `tumble-engine` drives it.
//!
//! # Quick Start
//!
//! ```
//! use tumble_scene::prelude::*;
//!
//! let mut world = World::new();
//! let floor = world.attach(
//!     Node::rectangle(Vec2::new(768.0, 16.0))
//!         .with_centered_pivot()
//!         .with_position(Vec2::new(0.0, 192.0)),
//! );
//!
//! assert_eq!(world.len(), 1);
//! assert_eq!(world.get(floor).map(|n| n.position.y), Some(192.0));
//! ```
//!
//! [`World`]: world::World
//! [`Node`]: node::Node
//! [`Behavior`]: behavior::Behavior
//! [`CommandBuffer`]: command::CommandBuffer

#![deny(unsafe_code)]

pub mod behavior;
pub mod command;
pub mod entity;
pub mod node;
pub mod world;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by scene operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// The handle's node was detached, or the handle was never issued.
    #[error("node {node:?} is not attached (stale or never allocated)")]
    StaleNode { node: entity::NodeId },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::behavior::{Behavior, BehaviorStatus, BoxedBehavior};
    pub use crate::command::{ApplyReport, Command, CommandBuffer, CommandKind};
    pub use crate::entity::NodeId;
    pub use crate::node::{BodyType, Node, Shape, Vec2};
    pub use crate::world::{World, WorldChange};
    pub use crate::SceneError;
}

// ---------------------------------------------------------------------------
// Integration Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    /// Queues its node's removal once it drops below `limit`.
    struct DropBelow {
        limit: f64,
    }

    impl Behavior for DropBelow {
        fn name(&self) -> &str {
            "drop_below"
        }

        fn on_tick(&mut self, id: NodeId, node: &Node, cmds: &mut CommandBuffer) -> BehaviorStatus {
            if node.position.y > self.limit {
                cmds.detach(id, "below_limit");
                BehaviorStatus::Finished
            } else {
                BehaviorStatus::Continue
            }
        }
    }

    #[test]
    fn behavior_driven_removal_happens_once() {
        let mut world = World::new();
        let id = world.attach_with(
            Node::circle(4.0).dynamic(),
            vec![Box::new(DropBelow { limit: 10.0 })],
        );
        let mut cmds = CommandBuffer::new();

        world.run_behaviors(&mut cmds);
        assert!(cmds.is_empty());

        world.get_mut(id).unwrap().position.y = 11.0;
        world.run_behaviors(&mut cmds);
        assert_eq!(cmds.len(), 1);
        let report = cmds.apply(&mut world);
        assert_eq!(report.applied, 1);
        assert!(!world.contains(id));

        // Node gone: its behavior went with it.
        world.run_behaviors(&mut cmds);
        assert!(cmds.is_empty());
        assert_eq!(world.detached_total(), 1);
    }

    #[test]
    fn equal_to_limit_is_not_removed() {
        let mut world = World::new();
        let id = world.attach_with(
            Node::circle(4.0).dynamic().with_position(Vec2::new(0.0, 10.0)),
            vec![Box::new(DropBelow { limit: 10.0 })],
        );
        let mut cmds = CommandBuffer::new();
        world.run_behaviors(&mut cmds);
        cmds.apply(&mut world);
        assert!(world.contains(id));
    }
}
