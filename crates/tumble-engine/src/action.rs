//! Cooperatively resumed actions.
//!
//! An [`Action`] is a small state machine the tick loop resumes once per tick
//! until it reports [`ActionStatus::Finished`]. Waiting never blocks: a
//! [`wait`] simply keeps returning `Running` until enough simulated time has
//! been fed to it. Composite actions ([`sequence`], [`repeat_forever`],
//! [`pausable`]) own their children and resume them in turn.
//!
//! Actions are generic over the application state `S` so the application can
//! hand its own parameters to them through [`ActionContext::state`] instead of
//! sharing globals.
//!
//! # Time accounting
//!
//! Each tick's `dt` is consumed once. A [`wait`] takes the whole slice: it
//! sets `cx.dt` to zero as it accumulates, so a second wait later in the same
//! [`sequence`] does not get the same slice of time twice. Steps that spend no
//! time ([`execute`], [`wait_until`]) leave `dt` alone, so a wait that follows
//! a gate still counts the tick the gate opened on.
//!
//! # Example
//!
//! ```
//! use tumble_engine::action::*;
//! use tumble_scene::prelude::*;
//!
//! let mut world = World::new();
//! let mut state = 0u32;
//! let mut cmds = CommandBuffer::new();
//! let mut runner = ActionRunner::new();
//!
//! runner.run(repeat_forever(|| {
//!     sequence(vec![
//!         wait(0.5),
//!         execute(|cx: &mut ActionContext<'_, u32>| *cx.state += 1),
//!     ])
//! }));
//!
//! for tick in 0..20 {
//!     let mut cx = ActionContext::new(&mut world, &mut state, &mut cmds, 0.1, tick);
//!     runner.update(&mut cx);
//! }
//! // 20 ticks of 0.1 s -> 2 s -> four half-second cycles.
//! assert_eq!(state, 4);
//! ```

use tumble_scene::command::CommandBuffer;
use tumble_scene::entity::NodeId;
use tumble_scene::world::World;

/// Slack for comparing accumulated frame time against a duration.
const TIME_EPSILON: f64 = 1e-9;

// ---------------------------------------------------------------------------
// ActionContext
// ---------------------------------------------------------------------------

/// Everything an action may touch while it runs.
pub struct ActionContext<'a, S> {
    /// Live scene. Attaching directly is fine; removals go through `commands`.
    pub world: &'a mut World,
    /// Application state.
    pub state: &'a mut S,
    /// Deferred mutations, applied after every producer has run this tick.
    pub commands: &'a mut CommandBuffer,
    /// Simulated seconds to consume this resume.
    pub dt: f64,
    /// Index of the tick being run.
    pub tick: u64,
}

impl<'a, S> ActionContext<'a, S> {
    pub fn new(
        world: &'a mut World,
        state: &'a mut S,
        commands: &'a mut CommandBuffer,
        dt: f64,
        tick: u64,
    ) -> Self {
        Self {
            world,
            state,
            commands,
            dt,
            tick,
        }
    }
}

// ---------------------------------------------------------------------------
// Action trait
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    Running,
    Finished,
}

/// A resumable unit of behavior.
pub trait Action<S> {
    /// Resume for one tick.
    fn update(&mut self, cx: &mut ActionContext<'_, S>) -> ActionStatus;
}

pub type BoxedAction<S> = Box<dyn Action<S>>;

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

/// Finishes once `duration` seconds of frame time have elapsed.
#[derive(Debug, Clone)]
pub struct Wait {
    duration: f64,
    elapsed: f64,
}

impl<S> Action<S> for Wait {
    fn update(&mut self, cx: &mut ActionContext<'_, S>) -> ActionStatus {
        self.elapsed += cx.dt;
        cx.dt = 0.0;
        if self.elapsed + TIME_EPSILON >= self.duration {
            ActionStatus::Finished
        } else {
            ActionStatus::Running
        }
    }
}

/// Finishes on the first resume where `predicate` holds.
pub struct WaitUntil<P> {
    predicate: P,
}

impl<S, P> Action<S> for WaitUntil<P>
where
    P: FnMut(&S) -> bool,
{
    fn update(&mut self, cx: &mut ActionContext<'_, S>) -> ActionStatus {
        if (self.predicate)(&*cx.state) {
            ActionStatus::Finished
        } else {
            ActionStatus::Running
        }
    }
}

/// Runs a closure once, then finishes.
pub struct Execute<F> {
    func: Option<F>,
}

impl<S, F> Action<S> for Execute<F>
where
    F: FnOnce(&mut ActionContext<'_, S>),
{
    fn update(&mut self, cx: &mut ActionContext<'_, S>) -> ActionStatus {
        if let Some(func) = self.func.take() {
            func(cx);
        }
        ActionStatus::Finished
    }
}

/// Runs its steps one after another.
///
/// Finished steps hand over to the next one within the same tick. Time a
/// step consumed stays consumed for the rest of the sequence and for any
/// enclosing one.
pub struct Sequence<S> {
    steps: Vec<BoxedAction<S>>,
    index: usize,
}

impl<S> Action<S> for Sequence<S> {
    fn update(&mut self, cx: &mut ActionContext<'_, S>) -> ActionStatus {
        while let Some(step) = self.steps.get_mut(self.index) {
            if step.update(cx) == ActionStatus::Running {
                return ActionStatus::Running;
            }
            self.index += 1;
        }
        ActionStatus::Finished
    }
}

/// Rebuilds and runs an action from `factory` forever.
///
/// At most one fresh iteration starts per tick, so a factory whose actions
/// finish instantly still cannot spin the tick.
pub struct RepeatForever<S, F> {
    factory: F,
    current: Option<BoxedAction<S>>,
}

impl<S, F> Action<S> for RepeatForever<S, F>
where
    F: FnMut() -> BoxedAction<S>,
{
    fn update(&mut self, cx: &mut ActionContext<'_, S>) -> ActionStatus {
        if self.current.is_none() {
            self.current = Some((self.factory)());
        }
        if let Some(action) = self.current.as_mut() {
            if action.update(cx) == ActionStatus::Finished {
                self.current = None;
            }
        }
        ActionStatus::Running
    }
}

/// Resumes `inner` only on ticks where `predicate` holds.
///
/// While the predicate is false nothing inside advances: waits keep their
/// elapsed time and no step runs.
pub struct Pausable<S, P> {
    predicate: P,
    inner: BoxedAction<S>,
}

impl<S, P> Action<S> for Pausable<S, P>
where
    P: FnMut(&S) -> bool,
{
    fn update(&mut self, cx: &mut ActionContext<'_, S>) -> ActionStatus {
        if !(self.predicate)(&*cx.state) {
            return ActionStatus::Running;
        }
        self.inner.update(cx)
    }
}

/// Queues removal of a node, then finishes.
#[derive(Debug, Clone, Copy)]
pub struct Kill {
    target: NodeId,
}

impl<S> Action<S> for Kill {
    fn update(&mut self, cx: &mut ActionContext<'_, S>) -> ActionStatus {
        cx.commands.detach(self.target, "kill");
        ActionStatus::Finished
    }
}

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

pub fn wait<S>(seconds: f64) -> BoxedAction<S> {
    Box::new(Wait {
        duration: seconds,
        elapsed: 0.0,
    })
}

pub fn wait_until<S: 'static>(predicate: impl FnMut(&S) -> bool + 'static) -> BoxedAction<S> {
    Box::new(WaitUntil { predicate })
}

pub fn execute<S: 'static>(func: impl FnOnce(&mut ActionContext<'_, S>) + 'static) -> BoxedAction<S> {
    Box::new(Execute { func: Some(func) })
}

pub fn sequence<S: 'static>(steps: Vec<BoxedAction<S>>) -> BoxedAction<S> {
    Box::new(Sequence { steps, index: 0 })
}

pub fn repeat_forever<S: 'static>(
    factory: impl FnMut() -> BoxedAction<S> + 'static,
) -> BoxedAction<S> {
    Box::new(RepeatForever {
        factory,
        current: None,
    })
}

pub fn pausable<S: 'static>(
    predicate: impl FnMut(&S) -> bool + 'static,
    action: BoxedAction<S>,
) -> BoxedAction<S> {
    Box::new(Pausable {
        predicate,
        inner: action,
    })
}

pub fn kill<S>(target: NodeId) -> BoxedAction<S> {
    Box::new(Kill { target })
}

// ---------------------------------------------------------------------------
// ActionRunner
// ---------------------------------------------------------------------------

/// Handle to a scheduled action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionId(u64);

struct Scheduled<S> {
    id: ActionId,
    /// Node the action belongs to; the action dies with it.
    owner: Option<NodeId>,
    action: BoxedAction<S>,
}

/// The set of actions resumed every tick, in scheduling order.
pub struct ActionRunner<S> {
    next_id: u64,
    running: Vec<Scheduled<S>>,
}

impl<S> ActionRunner<S> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            running: Vec::new(),
        }
    }

    /// Schedule an action owned by the screen. It runs until it finishes or
    /// is cancelled.
    pub fn run(&mut self, action: BoxedAction<S>) -> ActionId {
        self.schedule(None, action)
    }

    /// Schedule an action owned by `node`. It is dropped, without another
    /// resume, once the node is no longer attached.
    pub fn run_on(&mut self, node: NodeId, action: BoxedAction<S>) -> ActionId {
        self.schedule(Some(node), action)
    }

    pub fn cancel(&mut self, id: ActionId) -> bool {
        let before = self.running.len();
        self.running.retain(|s| s.id != id);
        self.running.len() != before
    }

    pub fn is_running(&self, id: ActionId) -> bool {
        self.running.iter().any(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    /// Resume every action once. Returns how many finished or were dropped.
    ///
    /// Every action sees the full tick `dt`, whatever the ones before it
    /// consumed.
    pub fn update(&mut self, cx: &mut ActionContext<'_, S>) -> usize {
        let before = self.running.len();
        let tick_dt = cx.dt;
        self.running.retain_mut(|scheduled| {
            if let Some(owner) = scheduled.owner {
                if !cx.world.contains(owner) {
                    return false;
                }
            }
            cx.dt = tick_dt;
            scheduled.action.update(cx) == ActionStatus::Running
        });
        cx.dt = tick_dt;
        before - self.running.len()
    }

    fn schedule(&mut self, owner: Option<NodeId>, action: BoxedAction<S>) -> ActionId {
        let id = ActionId(self.next_id);
        self.next_id += 1;
        self.running.push(Scheduled { id, owner, action });
        id
    }
}

impl<S> Default for ActionRunner<S> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
