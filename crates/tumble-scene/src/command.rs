//! Deferred world mutations.
//!
//! Behaviors and actions run while the world is being iterated, so they
//! cannot detach nodes directly. They queue [`Command`]s here instead; the
//! tick loop applies the buffer in FIFO order once every producer has run.
//!
//! # Example
//!
//! ```
//! use tumble_scene::prelude::*;
//!
//! let mut world = World::new();
//! let id = world.attach(Node::circle(8.0).dynamic());
//!
//! let mut cmds = CommandBuffer::new();
//! cmds.detach(id, "fell_off_screen");
//! cmds.detach(id, "fell_off_screen");
//!
//! let report = cmds.apply(&mut world);
//! assert_eq!(report.applied, 1);
//! assert_eq!(report.skipped, 1);
//! assert!(!world.contains(id));
//! ```

use tracing::debug;

use crate::entity::NodeId;
use crate::world::World;

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// The mutation a command performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Remove the node (and its behaviors) from the world.
    Detach,
}

/// A queued mutation against one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub target: NodeId,
    pub kind: CommandKind,
    /// Short label for logs, e.g. `"fell_off_screen"`.
    pub reason: String,
    /// Filled in by [`CommandBuffer::apply`].
    pub applied_successfully: bool,
}

// ---------------------------------------------------------------------------
// ApplyReport
// ---------------------------------------------------------------------------

/// Outcome of applying a buffer.
#[derive(Debug, Clone, Default)]
pub struct ApplyReport {
    /// Commands that changed the world.
    pub applied: usize,
    /// Commands whose target was already gone.
    pub skipped: usize,
    /// Every processed command, in application order.
    pub commands: Vec<Command>,
}

// ---------------------------------------------------------------------------
// CommandBuffer
// ---------------------------------------------------------------------------

/// FIFO queue of pending mutations.
#[derive(Debug, Default)]
pub struct CommandBuffer {
    pending: Vec<Command>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue removal of `target`.
    pub fn detach(&mut self, target: NodeId, reason: impl Into<String>) {
        self.pending.push(Command {
            target,
            kind: CommandKind::Detach,
            reason: reason.into(),
            applied_successfully: false,
        });
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Apply and clear the queue.
    ///
    /// A command whose target is no longer attached (removed earlier in the
    /// same buffer, or by a direct call) is skipped, never an error.
    pub fn apply(&mut self, world: &mut World) -> ApplyReport {
        let mut report = ApplyReport::default();
        for mut cmd in self.pending.drain(..) {
            cmd.applied_successfully = match cmd.kind {
                CommandKind::Detach => world.detach(cmd.target),
            };
            if cmd.applied_successfully {
                report.applied += 1;
            } else {
                report.skipped += 1;
                debug!(node = %cmd.target, reason = %cmd.reason, "command skipped: target gone");
            }
            report.commands.push(cmd);
        }
        report
    }
}
