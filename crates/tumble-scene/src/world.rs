//! The [`World`] owns every attached node and the behaviors riding on them.
//!
//! It is a plain container: it does not simulate anything. The engine's tick
//! loop drains [`World::drain_changes`] to mirror attach/detach into the
//! physics bridge and writes simulated positions back through
//! [`World::get_mut`].

use tracing::{debug, trace};

use crate::behavior::{BehaviorStatus, BoxedBehavior};
use crate::command::CommandBuffer;
use crate::entity::{NodeAllocator, NodeId};
use crate::node::{Node, Shape, Vec2};
use crate::SceneError;

// ---------------------------------------------------------------------------
// WorldChange
// ---------------------------------------------------------------------------

/// One entry of the attach/detach journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldChange {
    Attached(NodeId),
    Detached(NodeId),
}

struct Slot {
    id: NodeId,
    node: Node,
    behaviors: Vec<BoxedBehavior>,
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// Container of all live nodes.
///
/// Iteration order is slot order, which is stable for a given sequence of
/// attach/detach calls.
pub struct World {
    allocator: NodeAllocator,
    slots: Vec<Option<Slot>>,
    journal: Vec<WorldChange>,
    anchor: Vec2,
    pivot: Vec2,
    debug_draw: bool,
    attached_total: u64,
    detached_total: u64,
}

impl World {
    /// An empty world with a top-left anchor and pivot.
    pub fn new() -> Self {
        Self {
            allocator: NodeAllocator::new(),
            slots: Vec::new(),
            journal: Vec::new(),
            anchor: Vec2::ZERO,
            pivot: Vec2::ZERO,
            debug_draw: false,
            attached_total: 0,
            detached_total: 0,
        }
    }

    // -- attach / detach ----------------------------------------------------

    /// Attach a node with no behaviors.
    pub fn attach(&mut self, node: Node) -> NodeId {
        self.attach_with(node, Vec::new())
    }

    /// Attach a node together with the behaviors that should watch it.
    pub fn attach_with(&mut self, node: Node, behaviors: Vec<BoxedBehavior>) -> NodeId {
        let id = self.allocator.allocate();
        let slot = id.slot() as usize;
        if slot >= self.slots.len() {
            self.slots.resize_with(slot + 1, || None);
        }
        debug!(node = %id, shape = ?node.shape, body = ?node.body_type, "attach");
        self.slots[slot] = Some(Slot {
            id,
            node,
            behaviors,
        });
        self.journal.push(WorldChange::Attached(id));
        self.attached_total += 1;
        id
    }

    /// Detach a node, dropping its behaviors with it.
    ///
    /// Returns `false` (and changes nothing) if the node is already gone.
    pub fn detach(&mut self, id: NodeId) -> bool {
        if !self.allocator.release(id) {
            debug!(node = %id, "detach ignored: node not attached");
            return false;
        }
        self.slots[id.slot() as usize] = None;
        self.journal.push(WorldChange::Detached(id));
        self.detached_total += 1;
        debug!(node = %id, "detach");
        true
    }

    /// Add one more behavior to an attached node.
    pub fn add_behavior(&mut self, id: NodeId, behavior: BoxedBehavior) -> Result<(), SceneError> {
        let slot = self.slot_mut(id).ok_or(SceneError::StaleNode { node: id })?;
        slot.behaviors.push(behavior);
        Ok(())
    }

    // -- lookup -------------------------------------------------------------

    /// `true` while `id` is attached.
    pub fn contains(&self, id: NodeId) -> bool {
        self.allocator.is_live(id)
    }

    /// The node behind `id`, or `None` for a stale handle.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slot(id).map(|s| &s.node)
    }

    /// Mutable access for the physics read-back and tests.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slot_mut(id).map(|s| &mut s.node)
    }

    /// Like [`get`](Self::get) but reports a stale handle as an error.
    pub fn node(&self, id: NodeId) -> Result<&Node, SceneError> {
        self.get(id).ok_or(SceneError::StaleNode { node: id })
    }

    /// Number of behaviors still attached to `id` (0 if the node is gone).
    pub fn behavior_count(&self, id: NodeId) -> usize {
        self.slot(id).map_or(0, |s| s.behaviors.len())
    }

    /// Number of attached nodes.
    pub fn len(&self) -> usize {
        self.allocator.live_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live nodes in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.slots.iter().flatten().map(|s| (s.id, &s.node))
    }

    /// Live handles in slot order.
    pub fn ids(&self) -> Vec<NodeId> {
        self.iter().map(|(id, _)| id).collect()
    }

    /// Live dynamic nodes with the given shape.
    pub fn count_dynamic(&self, shape: Shape) -> usize {
        self.iter()
            .filter(|(_, n)| n.is_dynamic() && n.shape == shape)
            .count()
    }

    // -- behaviors ----------------------------------------------------------

    /// Run every node's behaviors once, in slot order.
    ///
    /// Behaviors that report [`BehaviorStatus::Finished`] are dropped.
    /// Returns how many behavior invocations happened.
    pub fn run_behaviors(&mut self, commands: &mut CommandBuffer) -> usize {
        let mut invoked = 0;
        for slot in self.slots.iter_mut().flatten() {
            let Slot {
                id,
                node,
                behaviors,
            } = slot;
            behaviors.retain_mut(|behavior| {
                invoked += 1;
                let status = behavior.on_tick(*id, &*node, commands);
                if status == BehaviorStatus::Finished {
                    trace!(node = %id, behavior = behavior.name(), "behavior finished");
                }
                status == BehaviorStatus::Continue
            });
        }
        invoked
    }

    // -- journal ------------------------------------------------------------

    /// Take the attach/detach journal accumulated since the last drain.
    pub fn drain_changes(&mut self) -> Vec<WorldChange> {
        std::mem::take(&mut self.journal)
    }

    // -- presentation flags -------------------------------------------------

    /// Screen anchor of the world origin, as a fraction of the window.
    pub fn set_anchor(&mut self, anchor: Vec2) {
        self.anchor = anchor;
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    /// Default pivot handed to nodes that don't set their own.
    pub fn set_pivot(&mut self, pivot: Vec2) {
        self.pivot = pivot;
    }

    pub fn pivot(&self) -> Vec2 {
        self.pivot
    }

    /// Toggle debug outlines.
    pub fn set_debug(&mut self, enabled: bool) {
        self.debug_draw = enabled;
    }

    pub fn debug(&self) -> bool {
        self.debug_draw
    }

    // -- counters -----------------------------------------------------------

    /// Total nodes ever attached.
    pub fn attached_total(&self) -> u64 {
        self.attached_total
    }

    /// Total nodes ever detached.
    pub fn detached_total(&self) -> u64 {
        self.detached_total
    }

    // -- internals ----------------------------------------------------------

    fn slot(&self, id: NodeId) -> Option<&Slot> {
        if !self.allocator.is_live(id) {
            return None;
        }
        self.slots.get(id.slot() as usize)?.as_ref()
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Slot> {
        if !self.allocator.is_live(id) {
            return None;
        }
        self.slots.get_mut(id.slot() as usize)?.as_mut()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("live", &self.len())
            .field("attached_total", &self.attached_total)
            .field("detached_total", &self.detached_total)
            .field("debug", &self.debug_draw)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::Behavior;

    fn square() -> Node {
        Node::rectangle(Vec2::splat(10.0)).dynamic()
    }

    #[test]
    fn attach_and_detach_track_counts() {
        let mut world = World::new();
        let a = world.attach(square());
        let b = world.attach(Node::circle(5.0).dynamic());
        assert_eq!(world.len(), 2);
        assert_eq!(world.count_dynamic(Shape::Rectangle), 1);
        assert_eq!(world.count_dynamic(Shape::Circle), 1);

        assert!(world.detach(a));
        assert!(!world.contains(a));
        assert!(world.contains(b));
        assert_eq!(world.len(), 1);
        assert_eq!(world.attached_total(), 2);
        assert_eq!(world.detached_total(), 1);
    }

    #[test]
    fn second_detach_is_a_no_op() {
        let mut world = World::new();
        let id = world.attach(square());
        assert!(world.detach(id));
        assert!(!world.detach(id));
        assert_eq!(world.detached_total(), 1);
        assert_eq!(
            world.drain_changes(),
            vec![WorldChange::Attached(id), WorldChange::Detached(id)]
        );
    }

    #[test]
    fn stale_handle_does_not_reach_new_occupant() {
        let mut world = World::new();
        let old = world.attach(square());
        world.detach(old);
        let new = world.attach(Node::circle(3.0));
        assert_eq!(old.slot(), new.slot());
        assert!(world.get(old).is_none());
        assert!(!world.detach(old));
        assert!(world.contains(new));
        assert!(matches!(
            world.node(old),
            Err(SceneError::StaleNode { node }) if node == old
        ));
    }

    #[test]
    fn drain_empties_the_journal() {
        let mut world = World::new();
        world.attach(square());
        assert_eq!(world.drain_changes().len(), 1);
        assert!(world.drain_changes().is_empty());
    }

    #[test]
    fn finished_behaviors_are_dropped() {
        let mut world = World::new();
        let once = |_: NodeId, _: &Node, _: &mut CommandBuffer| BehaviorStatus::Finished;
        let forever = |_: NodeId, _: &Node, _: &mut CommandBuffer| BehaviorStatus::Continue;
        let id = world.attach_with(square(), vec![Box::new(once), Box::new(forever)]);
        assert_eq!(world.behavior_count(id), 2);

        let mut cmds = CommandBuffer::new();
        assert_eq!(world.run_behaviors(&mut cmds), 2);
        assert_eq!(world.behavior_count(id), 1);
        assert_eq!(world.run_behaviors(&mut cmds), 1);
    }

    #[test]
    fn behaviors_see_current_node_state() {
        struct Recorder(std::rc::Rc<std::cell::Cell<f64>>);
        impl Behavior for Recorder {
            fn on_tick(&mut self, _: NodeId, node: &Node, _: &mut CommandBuffer) -> BehaviorStatus {
                self.0.set(node.position.y);
                BehaviorStatus::Continue
            }
        }

        let seen = std::rc::Rc::new(std::cell::Cell::new(0.0));
        let mut world = World::new();
        let id = world.attach_with(square(), vec![Box::new(Recorder(seen.clone()))]);
        if let Some(node) = world.get_mut(id) {
            node.position.y = 123.0;
        }
        world.run_behaviors(&mut CommandBuffer::new());
        assert_eq!(seen.get(), 123.0);
    }

    #[test]
    fn add_behavior_rejects_stale_node() {
        let mut world = World::new();
        let id = world.attach(square());
        world.detach(id);
        let noop = |_: NodeId, _: &Node, _: &mut CommandBuffer| BehaviorStatus::Continue;
        assert!(world.add_behavior(id, Box::new(noop)).is_err());
    }

    #[test]
    fn presentation_flags_round_trip() {
        let mut world = World::new();
        world.set_anchor(Vec2::splat(0.5));
        world.set_pivot(Vec2::splat(0.5));
        world.set_debug(true);
        assert_eq!(world.anchor(), Vec2::splat(0.5));
        assert_eq!(world.pivot(), Vec2::splat(0.5));
        assert!(world.debug());
    }
}
