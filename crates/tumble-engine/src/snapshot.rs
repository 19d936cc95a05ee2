//! Scene snapshots with BLAKE3 hashing.
//!
//! A [`SceneSnapshot`] is the serializable part of a running scene: the
//! tick counter, the fixed dt and every attached node in slot order. Its
//! hash is the determinism fingerprint: two runs with the same seed and the
//! same inputs must produce the same hash at the same tick.
//!
//! Behaviors, actions and the physics world are not captured.
//!
//! ```
//! use tumble_engine::prelude::*;
//!
//! let mut tick_loop = TickLoop::new(World::new(), PhysicsWorld::default(), (), TickConfig::default());
//! tick_loop.world_mut().attach(Node::circle(24.0).dynamic());
//! tick_loop.run_ticks(10);
//!
//! let snapshot = tick_loop.capture_snapshot().unwrap();
//! assert_eq!(snapshot.tick_counter, 10);
//! assert_eq!(snapshot.hash.len(), 64);
//! ```

use serde::{Deserialize, Serialize};
use tumble_scene::entity::NodeId;
use tumble_scene::node::Node;
use tumble_scene::world::World;

use crate::tick::TickLoop;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub tick_counter: u64,
    pub fixed_dt: f64,
    /// Attached nodes in slot order.
    pub nodes: Vec<(NodeId, Node)>,
    /// BLAKE3 hex digest (64 lowercase hex chars) of the fields above.
    pub hash: String,
}

impl SceneSnapshot {
    /// Capture `world` as it stands at `tick_counter`.
    pub fn capture(
        world: &World,
        tick_counter: u64,
        fixed_dt: f64,
    ) -> Result<Self, serde_json::Error> {
        let nodes: Vec<(NodeId, Node)> = world.iter().map(|(id, n)| (id, n.clone())).collect();
        let hash = compute_hash(&nodes, tick_counter, fixed_dt)?;
        Ok(Self {
            tick_counter,
            fixed_dt,
            nodes,
            hash,
        })
    }

    /// Recompute the hash and compare it to the stored one.
    pub fn verify(&self) -> Result<bool, serde_json::Error> {
        Ok(compute_hash(&self.nodes, self.tick_counter, self.fixed_dt)? == self.hash)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn compute_hash(
    nodes: &[(NodeId, Node)],
    tick_counter: u64,
    fixed_dt: f64,
) -> Result<String, serde_json::Error> {
    #[derive(Serialize)]
    struct HashableState<'a> {
        nodes: &'a [(NodeId, Node)],
        tick_counter: u64,
        fixed_dt: f64,
    }

    let mut hasher = blake3::Hasher::new();
    serde_json::to_writer(
        &mut hasher,
        &HashableState {
            nodes,
            tick_counter,
            fixed_dt,
        },
    )?;
    Ok(hasher.finalize().to_hex().to_string())
}

/// BLAKE3 hex digest of every attached node, in slot order.
pub fn state_hash(world: &World) -> Result<String, serde_json::Error> {
    let nodes: Vec<(NodeId, Node)> = world.iter().map(|(id, n)| (id, n.clone())).collect();
    compute_hash(&nodes, 0, 0.0)
}

impl<S> TickLoop<S> {
    pub fn capture_snapshot(&self) -> Result<SceneSnapshot, serde_json::Error> {
        SceneSnapshot::capture(self.world(), self.tick_count(), self.fixed_dt())
    }

    /// Hash of the current scene, including the tick counter.
    pub fn state_hash(&self) -> Result<String, serde_json::Error> {
        Ok(self.capture_snapshot()?.hash)
    }
}
