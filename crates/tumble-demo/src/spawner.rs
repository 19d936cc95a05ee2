//! Creates the falling boxes and balls.
//!
//! Every node made here is dynamic, has a centred pivot, starts at
//! `(0, spawn_y)` and carries exactly one [`AutoSuicide`] monitor.

use tumble_scene::entity::NodeId;
use tumble_scene::node::{Node, Shape, Vec2};
use tumble_scene::world::World;

use crate::monitor::AutoSuicide;
use crate::params::SpawnParameters;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpawnKind {
    Box,
    Ball,
}

impl SpawnKind {
    pub fn shape(self) -> Shape {
        match self {
            SpawnKind::Box => Shape::Rectangle,
            SpawnKind::Ball => Shape::Circle,
        }
    }
}

/// Attach one node of `kind` sized from `params`.
pub fn spawn(world: &mut World, params: &SpawnParameters, kind: SpawnKind) -> NodeId {
    let node = match kind {
        SpawnKind::Box => Node::rectangle(params.box_size),
        SpawnKind::Ball => Node::circle(params.ball_diameter),
    }
    .dynamic()
    .with_centered_pivot()
    .with_position(Vec2::new(0.0, params.spawn_y));

    let id = world.attach_with(node, vec![Box::new(AutoSuicide::new(params.removal_threshold))]);
    tracing::trace!(node = %id, ?kind, "spawned");
    id
}

pub fn spawn_box(world: &mut World, params: &SpawnParameters) -> NodeId {
    spawn(world, params, SpawnKind::Box)
}

pub fn spawn_ball(world: &mut World, params: &SpawnParameters) -> NodeId {
    spawn(world, params, SpawnKind::Ball)
}

/// Spawn `count` nodes of one kind synchronously. Handles come back in
/// creation order.
pub fn spawn_many(
    world: &mut World,
    params: &SpawnParameters,
    kind: SpawnKind,
    count: usize,
) -> Vec<NodeId> {
    let ids: Vec<NodeId> = (0..count).map(|_| spawn(world, params, kind)).collect();
    if count > 0 {
        tracing::debug!(?kind, count, live = world.len(), "bulk spawn");
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use tumble_scene::node::BodyType;

    #[test]
    fn box_uses_box_size() {
        let mut world = World::new();
        let params = SpawnParameters {
            box_size: Vec2::new(50.0, 50.0),
            spawn_y: -40.0,
            ..Default::default()
        };
        let id = spawn_box(&mut world, &params);

        let node = world.get(id).unwrap();
        assert_eq!(node.shape, Shape::Rectangle);
        assert_eq!(node.body_type, BodyType::Dynamic);
        assert_eq!(node.size, Vec2::new(50.0, 50.0));
        assert_eq!(node.pivot, Vec2::splat(0.5));
        assert_eq!(node.position, Vec2::new(0.0, -40.0));
        assert_eq!(world.behavior_count(id), 1);
    }

    #[test]
    fn ball_is_square_of_diameter() {
        let mut world = World::new();
        let params = SpawnParameters {
            ball_diameter: 12.0,
            ..Default::default()
        };
        let id = spawn_ball(&mut world, &params);

        let node = world.get(id).unwrap();
        assert_eq!(node.shape, Shape::Circle);
        assert_eq!(node.size, Vec2::new(12.0, 12.0));
        assert_eq!(world.behavior_count(id), 1);
    }

    #[test]
    fn spawn_many_keeps_creation_order() {
        let mut world = World::new();
        let ids = spawn_many(&mut world, &SpawnParameters::default(), SpawnKind::Ball, 25);
        assert_eq!(ids.len(), 25);
        assert_eq!(world.len(), 25);
        assert_eq!(world.ids(), ids);
        assert_eq!(world.count_dynamic(Shape::Circle), 25);
    }

    #[test]
    fn spawn_many_zero_is_a_no_op() {
        let mut world = World::new();
        assert!(spawn_many(&mut world, &SpawnParameters::default(), SpawnKind::Box, 0).is_empty());
        assert!(world.is_empty());
    }
}
