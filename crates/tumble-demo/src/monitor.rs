//! Auto-suicide: a spawned node removes itself once it has fallen out of
//! the playfield.

use tumble_scene::behavior::{Behavior, BehaviorStatus};
use tumble_scene::command::CommandBuffer;
use tumble_scene::entity::NodeId;
use tumble_scene::node::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Alive,
    /// Removal has been queued. Terminal.
    Removed,
}

/// Queues a detach of its node on the first tick the node's y is strictly
/// greater than `threshold`, then finishes.
#[derive(Debug, Clone)]
pub struct AutoSuicide {
    threshold: f64,
    state: MonitorState,
}

impl AutoSuicide {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            state: MonitorState::Alive,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }
}

impl Behavior for AutoSuicide {
    fn name(&self) -> &str {
        "auto_suicide"
    }

    fn on_tick(&mut self, id: NodeId, node: &Node, commands: &mut CommandBuffer) -> BehaviorStatus {
        if self.state == MonitorState::Removed {
            return BehaviorStatus::Finished;
        }
        if node.position.y > self.threshold {
            tracing::debug!(node = %id, y = node.position.y, "node left the playfield");
            commands.detach(id, "auto_suicide");
            self.state = MonitorState::Removed;
            return BehaviorStatus::Finished;
        }
        BehaviorStatus::Continue
    }
}
