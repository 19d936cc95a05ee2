//! Node descriptors: what a body looks like before and after it is attached.
//!
//! Coordinates are screen-style: x grows to the right, y grows downward, so
//! a falling body's `position.y` increases over time.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Vec2
// ---------------------------------------------------------------------------

/// A 2D vector in world units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both components set to `v`.
    pub const fn splat(v: f64) -> Self {
        Self { x: v, y: v }
    }
}

impl From<(f64, f64)> for Vec2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

// ---------------------------------------------------------------------------
// Shape / BodyType
// ---------------------------------------------------------------------------

/// Collision shape of a node. The node's `size` is the shape's bounding box;
/// circles use `size.x` as their diameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    #[default]
    Rectangle,
    Circle,
}

/// How the physics world treats a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyType {
    /// Never moves (the floor).
    #[default]
    Static,
    /// Fully simulated (spawned boxes and balls).
    Dynamic,
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A physics body as seen by the scene.
///
/// `pivot` is normalised against `size`: `(0.5, 0.5)` puts `position` at the
/// centre of the shape, `(0, 0)` at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Collider outline.
    pub shape: Shape,
    /// Static or dynamic; decides whether physics moves the node.
    pub body_type: BodyType,
    /// Width and height. A circle's diameter is `size.x`.
    pub size: Vec2,
    /// Pivot as a fraction of `size`; (0.5, 0.5) is the centre.
    pub pivot: Vec2,
    /// World position of the pivot. Positive y is down.
    pub position: Vec2,
    /// Linear velocity. Written back by the physics step for dynamic bodies.
    pub velocity: Vec2,
    /// Rotation in radians. Written back by the physics step.
    pub rotation: f64,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            shape: Shape::Rectangle,
            body_type: BodyType::Static,
            size: Vec2::ZERO,
            pivot: Vec2::ZERO,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            rotation: 0.0,
        }
    }
}

impl Node {
    /// A static rectangle of the given size.
    pub fn rectangle(size: Vec2) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    /// A static circle with the given diameter.
    pub fn circle(diameter: f64) -> Self {
        Self {
            shape: Shape::Circle,
            size: Vec2::splat(diameter),
            ..Default::default()
        }
    }

    /// Replace the body type.
    pub fn with_body_type(mut self, body_type: BodyType) -> Self {
        self.body_type = body_type;
        self
    }

    /// Make the node fully simulated.
    pub fn dynamic(self) -> Self {
        self.with_body_type(BodyType::Dynamic)
    }

    /// Set the pivot, as a fraction of `size`.
    pub fn with_pivot(mut self, pivot: Vec2) -> Self {
        self.pivot = pivot;
        self
    }

    /// Shorthand for a pivot with both components equal.
    pub fn with_centered_pivot(self) -> Self {
        self.with_pivot(Vec2::splat(0.5))
    }

    /// Place the pivot at `position`.
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Initial linear velocity.
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn is_dynamic(&self) -> bool {
        self.body_type == BodyType::Dynamic
    }

    /// Offset from `position` to the geometric centre of the shape.
    pub fn center_offset(&self) -> Vec2 {
        Vec2::new(
            (0.5 - self.pivot.x) * self.size.x,
            (0.5 - self.pivot.y) * self.size.y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_pivot_has_no_offset() {
        let node = Node::rectangle(Vec2::new(24.0, 24.0)).with_centered_pivot();
        assert_eq!(node.center_offset(), Vec2::ZERO);
    }

    #[test]
    fn top_left_pivot_offsets_by_half_size() {
        let node = Node::rectangle(Vec2::new(40.0, 10.0));
        assert_eq!(node.center_offset(), Vec2::new(20.0, 5.0));
    }

    #[test]
    fn circle_uses_diameter_for_both_axes() {
        let node = Node::circle(30.0).dynamic();
        assert_eq!(node.shape, Shape::Circle);
        assert_eq!(node.size, Vec2::splat(30.0));
        assert!(node.is_dynamic());
    }

    #[test]
    fn default_node_is_static_rectangle() {
        let node = Node::default();
        assert_eq!(node.shape, Shape::Rectangle);
        assert_eq!(node.body_type, BodyType::Static);
    }
}
