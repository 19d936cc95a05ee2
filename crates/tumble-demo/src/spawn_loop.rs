//! The periodic spawn loop: wait one interval, spawn a box or a ball,
//! repeat forever, gated on the auto-spawn flag.

use rand::Rng;
use tumble_engine::action::{
    execute, pausable, repeat_forever, sequence, wait, wait_until, ActionContext, BoxedAction,
};
use tumble_scene::entity::NodeId;

use crate::params::{PauseGranularity, SPAWN_INTERVAL};
use crate::spawner::{spawn, SpawnKind};
use crate::state::DemoState;

/// Box when a uniform draw in `[0, 1)` is below `box_chance`, ball otherwise.
pub fn choose_kind<R: Rng + ?Sized>(rng: &mut R, box_chance: f64) -> SpawnKind {
    if rng.gen::<f64>() < box_chance {
        SpawnKind::Box
    } else {
        SpawnKind::Ball
    }
}

/// Draw a kind from the session rng and spawn it.
pub fn spawn_random(cx: &mut ActionContext<'_, DemoState>) -> NodeId {
    let chance = cx.state.params.box_chance;
    let kind = choose_kind(&mut cx.state.rng, chance);
    let id = spawn(cx.world, &cx.state.params, kind);
    cx.state.loop_spawns += 1;
    id
}

/// One Waiting -> Spawning pass.
pub fn spawn_cycle() -> BoxedAction<DemoState> {
    sequence(vec![
        wait(SPAWN_INTERVAL),
        execute(|cx: &mut ActionContext<'_, DemoState>| {
            spawn_random(cx);
        }),
    ])
}

/// The whole loop. Never finishes; it stops when the tick loop is dropped.
pub fn spawn_loop(granularity: PauseGranularity) -> BoxedAction<DemoState> {
    tracing::debug!(?granularity, interval = SPAWN_INTERVAL, "spawn loop scheduled");
    match granularity {
        PauseGranularity::PerTick => pausable(
            |state: &DemoState| state.params.auto_spawn,
            repeat_forever(spawn_cycle),
        ),
        PauseGranularity::PerCycle => repeat_forever(|| {
            sequence(vec![
                wait_until(|state: &DemoState| state.params.auto_spawn),
                spawn_cycle(),
            ])
        }),
    }
}
