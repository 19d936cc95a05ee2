//! Fixed-timestep tick loop: the frame driver.
//!
//! The [`TickLoop`] owns the scene, the physics bridge, the application state
//! and everything scheduled against them. Each tick:
//!
//! 1. Nodes attached or detached since the last tick are mirrored into
//!    physics.
//! 2. Physics steps by `fixed_dt`; dynamic nodes receive their new position,
//!    velocity and rotation.
//! 3. Node behaviors run (they see post-step positions) and queue commands.
//! 4. Actions resume.
//! 5. Frame callbacks run, in registration order.
//! 6. The command buffer is applied (FIFO).
//! 7. Physics is re-synced, the tick counter advances, stats are recorded.
//!
//! Everything runs on the calling thread; nothing blocks.
//!
//! # Example
//!
//! ```
//! use tumble_engine::prelude::*;
//!
//! let config = TickConfig { fixed_dt: 1.0 / 60.0, ..Default::default() };
//! let mut tick_loop = TickLoop::new(World::new(), PhysicsWorld::default(), (), config);
//!
//! let ball = tick_loop
//!     .world_mut()
//!     .attach(Node::circle(24.0).dynamic().with_centered_pivot());
//!
//! tick_loop.run_ticks(30);
//!
//! assert_eq!(tick_loop.tick_count(), 30);
//! assert!(tick_loop.world().get(ball).unwrap().position.y > 0.0);
//! ```

use std::time::{Duration, Instant};

use tumble_scene::command::{ApplyReport, CommandBuffer};
use tumble_scene::entity::NodeId;
use tumble_scene::world::{World, WorldChange};

use crate::action::{ActionContext, ActionId, ActionRunner, BoxedAction};
use crate::physics::PhysicsWorld;
use crate::stats::Stats;

// ---------------------------------------------------------------------------
// TickConfig
// ---------------------------------------------------------------------------

/// Configuration for the fixed-timestep tick loop.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Seconds per tick. Must be positive and finite.
    pub fixed_dt: f64,
    /// Headless mode: no presentation, tick as fast as possible.
    pub headless: bool,
}

impl Default for TickConfig {
    /// 60 Hz, headless off.
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            headless: false,
        }
    }
}

// ---------------------------------------------------------------------------
// TickDiagnostics
// ---------------------------------------------------------------------------

/// What happened during the last tick.
#[derive(Debug, Clone, Default)]
pub struct TickDiagnostics {
    /// Wall-clock time per phase, in execution order.
    pub phase_times: Vec<(&'static str, Duration)>,
    pub total_time: Duration,
    /// Contacts that started during the physics step.
    pub contacts_started: usize,
    /// Behavior invocations.
    pub behaviors_run: usize,
    /// Actions that finished (or were dropped with their node).
    pub actions_finished: usize,
    pub commands_applied: usize,
    pub commands_skipped: usize,
}

// ---------------------------------------------------------------------------
// Frame callbacks
// ---------------------------------------------------------------------------

/// A callback run once per tick after actions, with the same access as an
/// action. The debug panel lives here.
pub type FrameFn<S> = Box<dyn FnMut(&mut ActionContext<'_, S>)>;

struct FrameCallback<S> {
    name: String,
    func: FrameFn<S>,
}

// ---------------------------------------------------------------------------
// TickLoop
// ---------------------------------------------------------------------------

/// The frame driver.
///
/// Simulation time is `tick_count * fixed_dt`, computed rather than
/// accumulated, so it does not drift.
pub struct TickLoop<S> {
    world: World,
    physics: PhysicsWorld,
    state: S,
    actions: ActionRunner<S>,
    frame_callbacks: Vec<FrameCallback<S>>,
    commands: CommandBuffer,
    tick_counter: u64,
    fixed_dt: f64,
    config: TickConfig,
    stats: Stats,
    last_diagnostics: TickDiagnostics,
}

impl<S> TickLoop<S> {
    /// Build a loop around an existing world and physics bridge.
    ///
    /// Nodes already in `world` are registered with physics on the first
    /// tick.
    ///
    /// # Panics
    ///
    /// Panics if `config.fixed_dt` is not positive and finite.
    pub fn new(world: World, physics: PhysicsWorld, state: S, config: TickConfig) -> Self {
        assert!(
            config.fixed_dt > 0.0 && config.fixed_dt.is_finite(),
            "fixed_dt must be positive and finite, got {}",
            config.fixed_dt
        );
        Self {
            world,
            physics,
            state,
            actions: ActionRunner::new(),
            frame_callbacks: Vec::new(),
            commands: CommandBuffer::new(),
            tick_counter: 0,
            fixed_dt: config.fixed_dt,
            config,
            stats: Stats::default(),
            last_diagnostics: TickDiagnostics::default(),
        }
    }

    // -- scheduling -----------------------------------------------------------

    /// Schedule an action owned by the screen.
    pub fn run_action(&mut self, action: BoxedAction<S>) -> ActionId {
        self.actions.run(action)
    }

    /// Schedule an action that dies with `node`.
    pub fn run_action_on(&mut self, node: NodeId, action: BoxedAction<S>) -> ActionId {
        self.actions.run_on(node, action)
    }

    pub fn cancel_action(&mut self, id: ActionId) -> bool {
        self.actions.cancel(id)
    }

    /// Register a per-frame callback.
    ///
    /// # Panics
    ///
    /// Panics if a callback with the same name is already registered.
    pub fn add_frame_callback(
        &mut self,
        name: &str,
        func: impl FnMut(&mut ActionContext<'_, S>) + 'static,
    ) {
        assert!(
            !self.frame_callbacks.iter().any(|c| c.name == name),
            "duplicate frame callback name: {name:?}"
        );
        self.frame_callbacks.push(FrameCallback {
            name: name.to_owned(),
            func: Box::new(func),
        });
    }

    // -- stepping -------------------------------------------------------------

    /// Execute one tick. Returns the applied command report.
    pub fn tick(&mut self) -> ApplyReport {
        let tick_start = Instant::now();
        let mut phase_times = Vec::with_capacity(6);
        let dt = self.fixed_dt;

        let t = Instant::now();
        self.sync_physics();
        let contacts = self.physics.step(dt);
        for body in self.physics.read_back() {
            if let Some(node) = self.world.get_mut(body.node) {
                node.position = body.position;
                node.velocity = body.velocity;
                node.rotation = body.rotation;
            }
        }
        phase_times.push(("physics", t.elapsed()));

        let t = Instant::now();
        let behaviors_run = self.world.run_behaviors(&mut self.commands);
        phase_times.push(("behaviors", t.elapsed()));

        let t = Instant::now();
        let mut cx = ActionContext::new(
            &mut self.world,
            &mut self.state,
            &mut self.commands,
            dt,
            self.tick_counter,
        );
        let actions_finished = self.actions.update(&mut cx);
        phase_times.push(("actions", t.elapsed()));

        let t = Instant::now();
        for callback in &mut self.frame_callbacks {
            (callback.func)(&mut cx);
        }
        phase_times.push(("frame", t.elapsed()));

        let t = Instant::now();
        let report = self.commands.apply(&mut self.world);
        self.sync_physics();
        phase_times.push(("apply", t.elapsed()));

        self.tick_counter += 1;

        self.last_diagnostics = TickDiagnostics {
            phase_times,
            total_time: tick_start.elapsed(),
            contacts_started: contacts.len(),
            behaviors_run,
            actions_finished,
            commands_applied: report.applied,
            commands_skipped: report.skipped,
        };
        let sim_time = self.sim_time();
        self.stats
            .record(self.tick_counter, sim_time, &self.world, &self.last_diagnostics);

        report
    }

    /// Run `count` ticks. Returns the number of commands applied.
    pub fn run_ticks(&mut self, count: u64) -> u64 {
        let mut applied = 0u64;
        for _ in 0..count {
            applied += self.tick().applied as u64;
        }
        applied
    }

    /// Run enough ticks to cover `seconds` of simulated time. Returns the
    /// number of ticks run.
    pub fn run_for(&mut self, seconds: f64) -> u64 {
        let ticks = (seconds / self.fixed_dt - 1e-9).ceil().max(0.0) as u64;
        self.run_ticks(ticks);
        ticks
    }

    /// Mirror pending attach/detach into physics.
    fn sync_physics(&mut self) {
        for change in self.world.drain_changes() {
            match change {
                WorldChange::Attached(id) => {
                    if let Some(node) = self.world.get(id) {
                        self.physics.register_node(id, node);
                    }
                }
                WorldChange::Detached(id) => {
                    self.physics.unregister_node(id);
                }
            }
        }
    }

    // -- accessors ------------------------------------------------------------

    pub fn tick_count(&self) -> u64 {
        self.tick_counter
    }

    /// Simulated seconds elapsed.
    pub fn sim_time(&self) -> f64 {
        self.tick_counter as f64 * self.fixed_dt
    }

    pub fn fixed_dt(&self) -> f64 {
        self.fixed_dt
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct world access for setup and tests. Changes are mirrored into
    /// physics at the start of the next tick.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// An action context outside of a tick (`dt = 0`), for driving the same
    /// code paths the frame callbacks use.
    pub fn context(&mut self) -> ActionContext<'_, S> {
        ActionContext::new(
            &mut self.world,
            &mut self.state,
            &mut self.commands,
            0.0,
            self.tick_counter,
        )
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut Stats {
        &mut self.stats
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    pub fn frame_callback_names(&self) -> Vec<&str> {
        self.frame_callbacks.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn last_diagnostics(&self) -> &TickDiagnostics {
        &self.last_diagnostics
    }

    pub fn is_headless(&self) -> bool {
        self.config.headless
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{execute, repeat_forever, sequence, wait};
    use crate::physics::PhysicsConfig;
    use tumble_scene::behavior::BehaviorStatus;
    use tumble_scene::node::{Node, Vec2};

    fn tick_loop<S>(state: S) -> TickLoop<S> {
        TickLoop::new(
            World::new(),
            PhysicsWorld::default(),
            state,
            TickConfig::default(),
        )
    }

    #[test]
    fn new_loop_starts_at_zero() {
        let tl = tick_loop(());
        assert_eq!(tl.tick_count(), 0);
        assert_eq!(tl.sim_time(), 0.0);
        assert_eq!(tl.action_count(), 0);
    }

    #[test]
    #[should_panic(expected = "fixed_dt must be positive")]
    fn zero_dt_panics() {
        let _ = TickLoop::new(
            World::new(),
            PhysicsWorld::default(),
            (),
            TickConfig {
                fixed_dt: 0.0,
                ..Default::default()
            },
        );
    }

    #[test]
    #[should_panic(expected = "fixed_dt must be positive")]
    fn nan_dt_panics() {
        let _ = TickLoop::new(
            World::new(),
            PhysicsWorld::default(),
            (),
            TickConfig {
                fixed_dt: f64::NAN,
                ..Default::default()
            },
        );
    }

    #[test]
    fn sim_time_is_computed_not_accumulated() {
        let mut tl = TickLoop::new(
            World::new(),
            PhysicsWorld::default(),
            (),
            TickConfig {
                fixed_dt: 0.1,
                ..Default::default()
            },
        );
        tl.run_ticks(1000);
        assert_eq!(tl.sim_time(), 1000.0 * 0.1);
    }

    #[test]
    fn run_for_covers_requested_time() {
        let mut tl = tick_loop(());
        assert_eq!(tl.run_for(1.0), 60);
        assert_eq!(tl.tick_count(), 60);
    }

    #[test]
    fn nodes_attached_between_ticks_get_bodies() {
        let mut tl = tick_loop(());
        let id = tl
            .world_mut()
            .attach(Node::circle(10.0).dynamic().with_centered_pivot());
        assert!(!tl.physics().has_node(id));
        tl.tick();
        assert!(tl.physics().has_node(id));
        assert!(tl.world().get(id).unwrap().position.y > 0.0);
    }

    #[test]
    fn detached_nodes_lose_their_bodies() {
        let mut tl = tick_loop(());
        let id = tl.world_mut().attach(Node::circle(10.0).dynamic());
        tl.tick();
        tl.world_mut().detach(id);
        tl.tick();
        assert!(!tl.physics().has_node(id));
        assert_eq!(tl.physics().body_count(), 0);
    }

    #[test]
    fn behavior_removal_is_applied_and_synced_same_tick() {
        let mut tl = tick_loop(());
        let id = tl.world_mut().attach_with(
            Node::circle(10.0).dynamic(),
            vec![Box::new(
                |id: NodeId, _: &Node, cmds: &mut CommandBuffer| {
                    cmds.detach(id, "test");
                    BehaviorStatus::Finished
                },
            )],
        );
        let report = tl.tick();
        assert_eq!(report.applied, 1);
        assert!(!tl.world().contains(id));
        assert!(!tl.physics().has_node(id));
    }

    #[test]
    fn actions_and_frame_callbacks_run_every_tick() {
        let mut tl = tick_loop(0u32);
        tl.run_action(repeat_forever(|| {
            sequence(vec![
                wait(0.5),
                execute(|cx: &mut ActionContext<'_, u32>| *cx.state += 100),
            ])
        }));
        tl.add_frame_callback("count", |cx| *cx.state += 1);
        tl.run_ticks(60);
        assert_eq!(*tl.state(), 60 + 200);
        assert_eq!(tl.frame_callback_names(), vec!["count"]);
    }

    #[test]
    #[should_panic(expected = "duplicate frame callback name")]
    fn duplicate_frame_callback_panics() {
        let mut tl = tick_loop(());
        tl.add_frame_callback("ui", |_| {});
        tl.add_frame_callback("ui", |_| {});
    }

    #[test]
    fn frame_callbacks_can_spawn_nodes() {
        let mut tl = tick_loop(());
        tl.add_frame_callback("spawner", |cx| {
            if cx.tick == 0 {
                for _ in 0..10 {
                    cx.world.attach(Node::circle(4.0).dynamic());
                }
            }
        });
        tl.tick();
        assert_eq!(tl.world().len(), 10);
        assert_eq!(tl.physics().body_count(), 10);
    }

    #[test]
    fn diagnostics_record_phases() {
        let mut tl = TickLoop::new(
            World::new(),
            PhysicsWorld::new(PhysicsConfig {
                gravity: Vec2::ZERO,
                ..Default::default()
            }),
            (),
            TickConfig::default(),
        );
        tl.tick();
        let names: Vec<&str> = tl
            .last_diagnostics()
            .phase_times
            .iter()
            .map(|(n, _)| *n)
            .collect();
        assert_eq!(names, vec!["physics", "behaviors", "actions", "frame", "apply"]);
    }
}
