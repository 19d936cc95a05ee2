//! rapier2d bridge for scene nodes.
//!
//! The [`PhysicsWorld`] mirrors every attached node as a rapier rigid body
//! with one collider. Each tick the tick loop:
//!
//! 1. registers nodes attached since the last tick and drops detached ones,
//! 2. steps rapier with the engine's fixed dt,
//! 3. copies position, velocity and rotation of dynamic bodies back into the
//!    scene nodes.
//!
//! A node's `position` is its pivot point. The rigid body sits on the pivot
//! and the collider is offset by [`Node::center_offset`], so a centred pivot
//! gives a body whose origin is the shape's centre.
//!
//! # Determinism
//!
//! rapier2d is compiled with `enhanced-determinism`. With a fixed timestep and
//! results sorted by node id, identical inputs give identical trajectories on
//! the same platform.

use std::collections::HashMap;

use rapier2d::prelude::*;
use serde::{Deserialize, Serialize};
use tumble_scene::entity::NodeId;
use tumble_scene::node::{BodyType, Node, Shape, Vec2};

// ---------------------------------------------------------------------------
// PhysicsConfig
// ---------------------------------------------------------------------------

/// Tunables for the simulated world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity in world units per second squared. Positive y pulls downward.
    pub gravity: Vec2,
    /// How many world units make one rapier length unit. Scales solver
    /// tolerances for pixel-sized bodies.
    pub length_unit: f64,
    /// Bounciness applied to every collider.
    pub restitution: f64,
    /// Friction applied to every collider.
    pub friction: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, 980.0),
            length_unit: 100.0,
            restitution: 0.1,
            friction: 0.5,
        }
    }
}

// ---------------------------------------------------------------------------
// BodyState / ContactPair
// ---------------------------------------------------------------------------

/// Simulated state of one dynamic body after a step.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyState {
    pub node: NodeId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub rotation: f64,
}

/// Two nodes whose colliders started touching during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactPair {
    pub a: NodeId,
    pub b: NodeId,
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// rapier2d state plus the node <-> handle maps.
pub struct PhysicsWorld {
    config: PhysicsConfig,
    pipeline: PhysicsPipeline,
    gravity: Vector<Real>,
    integration_params: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    /// Raw node id -> rigid body.
    node_to_body: HashMap<u64, RigidBodyHandle>,
    /// Collider -> raw node id, for contact lookup.
    collider_to_node: HashMap<ColliderHandle, u64>,
}

impl PhysicsWorld {
    pub fn new(config: PhysicsConfig) -> Self {
        let mut integration_params = IntegrationParameters::default();
        integration_params.length_unit = config.length_unit as Real;
        Self {
            gravity: vector![config.gravity.x as Real, config.gravity.y as Real],
            config,
            pipeline: PhysicsPipeline::new(),
            integration_params,
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            node_to_body: HashMap::new(),
            collider_to_node: HashMap::new(),
        }
    }

    /// The settings this world was built with.
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Create a rigid body and collider for `node`.
    ///
    /// Returns `false` if the node is already registered.
    pub fn register_node(&mut self, id: NodeId, node: &Node) -> bool {
        let raw = id.to_raw();
        if self.node_to_body.contains_key(&raw) {
            return false;
        }

        let translation = vector![node.position.x as Real, node.position.y as Real];
        let body = match node.body_type {
            BodyType::Dynamic => RigidBodyBuilder::dynamic()
                .translation(translation)
                .rotation(node.rotation as Real)
                .linvel(vector![node.velocity.x as Real, node.velocity.y as Real])
                .build(),
            BodyType::Static => RigidBodyBuilder::fixed()
                .translation(translation)
                .rotation(node.rotation as Real)
                .build(),
        };
        let body_handle = self.rigid_body_set.insert(body);
        self.node_to_body.insert(raw, body_handle);

        let shape = match node.shape {
            Shape::Rectangle => SharedShape::cuboid(
                (node.size.x * 0.5) as Real,
                (node.size.y * 0.5) as Real,
            ),
            Shape::Circle => SharedShape::ball((node.size.x * 0.5) as Real),
        };
        let offset = node.center_offset();
        let collider = ColliderBuilder::new(shape)
            .translation(vector![offset.x as Real, offset.y as Real])
            .restitution(self.config.restitution as Real)
            .friction(self.config.friction as Real)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let collider_handle =
            self.collider_set
                .insert_with_parent(collider, body_handle, &mut self.rigid_body_set);
        self.collider_to_node.insert(collider_handle, raw);
        true
    }

    /// Drop the body and collider of `id`. Returns `false` if it had none.
    pub fn unregister_node(&mut self, id: NodeId) -> bool {
        let raw = id.to_raw();
        let Some(body_handle) = self.node_to_body.remove(&raw) else {
            return false;
        };
        if let Some(rb) = self.rigid_body_set.get(body_handle) {
            for collider in rb.colliders() {
                self.collider_to_node.remove(collider);
            }
        }
        self.rigid_body_set.remove(
            body_handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        true
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Returns the contacts that started during the step, sorted by node id.
    pub fn step(&mut self, dt: f64) -> Vec<ContactPair> {
        self.integration_params.dt = dt as Real;

        let (collision_send, collision_recv) =
            rapier2d::crossbeam::channel::unbounded::<CollisionEvent>();
        let (force_send, _force_recv) =
            rapier2d::crossbeam::channel::unbounded::<ContactForceEvent>();
        let event_handler = ChannelEventCollector::new(collision_send, force_send);

        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &event_handler,
        );

        let mut contacts = Vec::new();
        while let Ok(event) = collision_recv.try_recv() {
            if let CollisionEvent::Started(h1, h2, _flags) = event {
                let a = self.collider_to_node.get(&h1).copied();
                let b = self.collider_to_node.get(&h2).copied();
                if let (Some(a), Some(b)) = (a, b) {
                    let (lo, hi) = (a.min(b), a.max(b));
                    contacts.push(ContactPair {
                        a: NodeId::from_raw(lo),
                        b: NodeId::from_raw(hi),
                    });
                }
            }
        }
        // Channel delivery order is not stable across runs.
        contacts.sort_by_key(|c| (c.a.to_raw(), c.b.to_raw()));
        contacts
    }

    /// Current state of every dynamic body, sorted by node id.
    pub fn read_back(&self) -> Vec<BodyState> {
        let mut states: Vec<BodyState> = self
            .node_to_body
            .iter()
            .filter_map(|(&raw, &handle)| {
                let rb = self.rigid_body_set.get(handle)?;
                if !rb.is_dynamic() {
                    return None;
                }
                let t = rb.translation();
                let v = rb.linvel();
                Some(BodyState {
                    node: NodeId::from_raw(raw),
                    position: Vec2::new(t.x as f64, t.y as f64),
                    velocity: Vec2::new(v.x as f64, v.y as f64),
                    rotation: rb.rotation().angle() as f64,
                })
            })
            .collect();
        states.sort_by_key(|s| s.node.to_raw());
        states
    }

    /// `true` if `id` has a body.
    pub fn has_node(&self, id: NodeId) -> bool {
        self.node_to_body.contains_key(&id.to_raw())
    }

    /// Number of rigid bodies currently simulated.
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
