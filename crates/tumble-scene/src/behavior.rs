//! Per-node behaviors evaluated once per simulation step.
//!
//! A behavior is a small predicate/action pair attached to one node. The
//! [`World`](crate::world::World) keeps each node's behaviors next to the node
//! itself, so detaching a node drops its behaviors and no further ticks reach
//! them. Behaviors never mutate the world directly; they queue commands.

use crate::command::CommandBuffer;
use crate::entity::NodeId;
use crate::node::Node;

/// What a behavior wants after running for a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorStatus {
    /// Run again next tick.
    Continue,
    /// Done; the behavior is dropped from the node.
    Finished,
}

/// A per-tick hook attached to a node.
pub trait Behavior {
    /// Label used in logs.
    fn name(&self) -> &str {
        "behavior"
    }

    /// Inspect the node after physics has moved it and queue any commands.
    fn on_tick(&mut self, id: NodeId, node: &Node, commands: &mut CommandBuffer) -> BehaviorStatus;
}

impl<F> Behavior for F
where
    F: FnMut(NodeId, &Node, &mut CommandBuffer) -> BehaviorStatus,
{
    fn on_tick(&mut self, id: NodeId, node: &Node, commands: &mut CommandBuffer) -> BehaviorStatus {
        self(id, node, commands)
    }
}

/// Boxed behavior as stored by the world.
pub type BoxedBehavior = Box<dyn Behavior>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_behaviors() {
        let mut ticks = 0;
        let mut b = |_id: NodeId, _node: &Node, _cmds: &mut CommandBuffer| {
            ticks += 1;
            if ticks >= 2 {
                BehaviorStatus::Finished
            } else {
                BehaviorStatus::Continue
            }
        };
        let node = Node::default();
        let mut cmds = CommandBuffer::new();
        let id = NodeId::new(0, 0);
        assert_eq!(b.on_tick(id, &node, &mut cmds), BehaviorStatus::Continue);
        assert_eq!(b.on_tick(id, &node, &mut cmds), BehaviorStatus::Finished);
        assert_eq!(Behavior::name(&b), "behavior");
    }
}
