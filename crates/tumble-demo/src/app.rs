//! Session setup: the world with its floor, the spawn loop and the debug
//! panel, wired into a tick loop.

use tumble_engine::action::ActionContext;
use tumble_engine::physics::PhysicsWorld;
use tumble_engine::stats::Corner;
use tumble_engine::tick::{TickConfig, TickLoop};
use tumble_scene::entity::NodeId;
use tumble_scene::node::{Node, Vec2};
use tumble_scene::world::World;

use crate::config::DemoConfig;
use crate::panel::draw_debug_panel;
use crate::spawn_loop::spawn_loop;
use crate::spawner::{spawn_many, SpawnKind};
use crate::state::DemoState;

pub const FLOOR_SIZE: Vec2 = Vec2 { x: 768.0, y: 16.0 };
pub const FLOOR_Y: f64 = 192.0;

/// Name of the frame callback that draws the panel.
pub const PANEL_CALLBACK: &str = "debug_panel";

pub type DemoLoop = TickLoop<DemoState>;

/// The static floor everything lands on.
pub fn floor() -> Node {
    Node::rectangle(FLOOR_SIZE)
        .with_centered_pivot()
        .with_position(Vec2::new(0.0, FLOOR_Y))
}

/// Scene container with its presentation flags set and the floor attached.
pub fn build_world() -> (World, NodeId) {
    let mut world = World::new();
    world.set_anchor(Vec2::splat(0.5));
    world.set_pivot(Vec2::splat(0.5));
    world.set_debug(true);
    let floor = world.attach(floor());
    (world, floor)
}

/// Build a ready-to-run session from `config`.
///
/// The pause granularity is read once here; changing it afterwards has no
/// effect on the running loop.
pub fn build(config: &DemoConfig) -> DemoLoop {
    let (world, _floor) = build_world();
    let state = DemoState::new(config.spawn.clone(), config.seed);
    let granularity = state.params.pause_granularity;

    let mut tick_loop = TickLoop::new(
        world,
        PhysicsWorld::new(config.physics.clone()),
        state,
        TickConfig {
            fixed_dt: config.fixed_dt(),
            headless: true,
        },
    );
    tick_loop.stats_mut().set_alignment(Corner::BottomRight);
    tick_loop.run_action(spawn_loop(granularity));
    tick_loop.add_frame_callback(PANEL_CALLBACK, |cx: &mut ActionContext<'_, DemoState>| {
        let DemoState {
            ui,
            params,
            panel_spawns,
            ..
        } = &mut *cx.state;
        let outcome = draw_debug_panel(ui, cx.world, params);
        *panel_spawns += outcome.spawned() as u64;
    });

    tracing::info!(
        title = %config.window.title,
        width = config.window.width,
        height = config.window.height,
        seed = config.seed,
        tick_rate = config.tick_rate,
        "session ready"
    );
    tick_loop
}

/// Spawn `count` nodes of `kind` right now, outside of any tick.
pub fn burst(tick_loop: &mut DemoLoop, kind: SpawnKind, count: usize) -> Vec<NodeId> {
    let cx = tick_loop.context();
    spawn_many(cx.world, &cx.state.params, kind, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tumble_scene::node::Shape;

    #[test]
    fn world_starts_with_floor_only() {
        let (world, floor) = build_world();
        assert_eq!(world.len(), 1);
        assert_eq!(world.anchor(), Vec2::splat(0.5));
        assert_eq!(world.pivot(), Vec2::splat(0.5));
        assert!(world.debug());

        let node = world.get(floor).unwrap();
        assert!(!node.is_dynamic());
        assert_eq!(node.size, Vec2::new(768.0, 16.0));
        assert_eq!(node.position, Vec2::new(0.0, 192.0));
    }

    #[test]
    fn build_registers_loop_and_panel() {
        let tl = build(&DemoConfig::default());
        assert_eq!(tl.action_count(), 1);
        assert_eq!(tl.frame_callback_names(), vec![PANEL_CALLBACK]);
        assert_eq!(tl.stats().alignment, Corner::BottomRight);
        assert!(tl.is_headless());
    }

    #[test]
    fn burst_spawns_immediately() {
        let mut tl = build(&DemoConfig::default());
        let ids = burst(&mut tl, SpawnKind::Ball, 10);
        assert_eq!(ids.len(), 10);
        assert_eq!(tl.world().count_dynamic(Shape::Circle), 10);
    }
}
