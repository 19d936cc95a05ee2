//! Headless end-to-end runs of the tick loop with real physics.
//!
//! Nothing here presents anything; the loop is driven as fast as it will go
//! and the scene is inspected between ticks.

use tumble_engine::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Removes its node once the node's y exceeds `threshold`.
struct FallOut {
    threshold: f64,
}

impl Behavior for FallOut {
    fn name(&self) -> &str {
        "fall_out"
    }

    fn on_tick(&mut self, id: NodeId, node: &Node, commands: &mut CommandBuffer) -> BehaviorStatus {
        if node.position.y > self.threshold {
            commands.detach(id, "fell out");
            BehaviorStatus::Finished
        } else {
            BehaviorStatus::Continue
        }
    }
}

fn headless_loop() -> TickLoop<()> {
    TickLoop::new(
        World::new(),
        PhysicsWorld::default(),
        (),
        TickConfig {
            headless: true,
            ..Default::default()
        },
    )
}

fn floor() -> Node {
    Node::rectangle(Vec2::new(768.0, 16.0))
        .with_centered_pivot()
        .with_position(Vec2::new(0.0, 192.0))
}

fn falling_box(x: f64) -> Node {
    Node::rectangle(Vec2::splat(24.0))
        .dynamic()
        .with_centered_pivot()
        .with_position(Vec2::new(x, 0.0))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn box_comes_to_rest_on_floor() {
    let mut tl = headless_loop();
    tl.world_mut().attach(floor());
    let id = tl.world_mut().attach(falling_box(0.0));

    tl.run_for(3.0);

    let node = tl.world().get(id).unwrap();
    // Floor top is at 184; a resting 24 px box has its centre near 172.
    assert!(node.position.y > 160.0 && node.position.y < 184.0, "y = {}", node.position.y);
    assert!(node.velocity.y.abs() < 5.0);
    assert!(tl.stats().contacts_total >= 1);
}

#[test]
fn body_past_threshold_is_removed_exactly_once() {
    let mut tl = headless_loop();
    let id = tl.world_mut().attach_with(
        falling_box(0.0),
        vec![Box::new(FallOut { threshold: 1000.0 })],
    );

    let mut removals = 0;
    for _ in 0..600 {
        removals += tl.tick().applied;
        if !tl.world().contains(id) {
            break;
        }
    }

    assert_eq!(removals, 1);
    assert!(!tl.world().contains(id));
    assert!(!tl.physics().has_node(id));
    assert_eq!(tl.world().detached_total(), 1);

    // Further ticks never touch it again.
    assert_eq!(tl.run_ticks(60), 0);
}

#[test]
fn body_held_by_floor_is_never_removed() {
    let mut tl = headless_loop();
    tl.world_mut().attach(floor());
    let id = tl.world_mut().attach_with(
        falling_box(0.0),
        vec![Box::new(FallOut { threshold: 1000.0 })],
    );

    tl.run_for(10.0);

    assert!(tl.world().contains(id));
    assert_eq!(tl.world().behavior_count(id), 1);
}

#[test]
fn stats_follow_the_scene() {
    let mut tl = headless_loop();
    tl.world_mut().attach(floor());
    for i in 0..5 {
        tl.world_mut().attach(falling_box(i as f64 * 30.0));
    }
    tl.world_mut().attach(Node::circle(24.0).dynamic().with_centered_pivot());

    tl.tick();

    let stats = tl.stats();
    assert_eq!(stats.ticks, 1);
    assert_eq!(stats.live_nodes, 7);
    assert_eq!(stats.live_boxes, 5);
    assert_eq!(stats.live_balls, 1);
    assert_eq!(stats.alignment, Corner::BottomRight);
    assert!(tl.is_headless());
}

#[test]
fn identical_runs_hash_identically() {
    fn run() -> String {
        let mut tl = headless_loop();
        tl.world_mut().attach(floor());
        for i in 0..40 {
            let x = (i % 8) as f64 * 20.0 - 80.0;
            let y = -((i / 8) as f64) * 30.0;
            let node = if i % 3 == 0 {
                Node::circle(20.0)
            } else {
                Node::rectangle(Vec2::splat(20.0))
            };
            tl.world_mut()
                .attach(node.dynamic().with_centered_pivot().with_position(Vec2::new(x, y)));
        }
        tl.run_ticks(240);
        tl.state_hash().unwrap()
    }

    assert_eq!(run(), run());
}

#[test]
fn hash_differs_between_ticks() {
    let mut tl = headless_loop();
    tl.world_mut().attach(falling_box(0.0));
    tl.tick();
    let first = tl.state_hash().unwrap();
    tl.tick();
    assert_ne!(first, tl.state_hash().unwrap());
}
