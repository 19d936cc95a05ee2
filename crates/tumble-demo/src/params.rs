//! Live-tunable spawn parameters.

use serde::{Deserialize, Serialize};
use tumble_scene::node::Vec2;

/// Seconds between two automatic spawns.
pub const SPAWN_INTERVAL: f64 = 0.125;

/// Bounds the panel's size sliders impose on box sides and ball diameter.
pub const MIN_SIZE: f64 = 1.0;
pub const MAX_SIZE: f64 = 256.0;

/// Nodes whose y exceeds this are removed. y grows downward.
pub const DEFAULT_REMOVAL_THRESHOLD: f64 = 1000.0;

/// When the auto-spawn flag is consulted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PauseGranularity {
    /// Every tick. While the flag is off no timer advances and nothing spawns.
    #[default]
    PerTick,
    /// Once at the start of each cycle. A started cycle runs to completion.
    PerCycle,
}

/// Everything the spawn loop, the spawner and the panel share.
///
/// Written by the panel, read by the loop and spawner on every use. The only
/// bounds are the ones the widgets impose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnParameters {
    pub box_size: Vec2,
    pub ball_diameter: f64,
    /// Probability that an automatic spawn is a box rather than a ball.
    pub box_chance: f64,
    pub auto_spawn: bool,
    /// Vertical position new nodes start at.
    pub spawn_y: f64,
    pub removal_threshold: f64,
    pub pause_granularity: PauseGranularity,
}

impl Default for SpawnParameters {
    fn default() -> Self {
        Self {
            box_size: Vec2::splat(24.0),
            ball_diameter: 24.0,
            box_chance: 0.5,
            auto_spawn: true,
            spawn_y: 0.0,
            removal_threshold: DEFAULT_REMOVAL_THRESHOLD,
            pause_granularity: PauseGranularity::PerTick,
        }
    }
}

impl SpawnParameters {
    pub fn spawn_interval(&self) -> f64 {
        SPAWN_INTERVAL
    }

    pub fn ball_size(&self) -> Vec2 {
        Vec2::splat(self.ball_diameter)
    }

    /// Copy with sizes and chance pulled into the ranges the panel allows.
    /// NaN falls back to the default value.
    pub fn clamped(&self) -> Self {
        let defaults = Self::default();
        let size = |v: f64, fallback: f64| {
            if v.is_nan() {
                fallback
            } else {
                v.clamp(MIN_SIZE, MAX_SIZE)
            }
        };
        Self {
            box_size: Vec2::new(
                size(self.box_size.x, defaults.box_size.x),
                size(self.box_size.y, defaults.box_size.y),
            ),
            ball_diameter: size(self.ball_diameter, defaults.ball_diameter),
            box_chance: if self.box_chance.is_nan() {
                defaults.box_chance
            } else {
                self.box_chance.clamp(0.0, 1.0)
            },
            ..self.clone()
        }
    }

    pub fn is_within_bounds(&self) -> bool {
        self.clamped() == *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let p = SpawnParameters::default();
        assert_eq!(p.box_size, Vec2::new(24.0, 24.0));
        assert_eq!(p.ball_size(), Vec2::new(24.0, 24.0));
        assert_eq!(p.box_chance, 0.5);
        assert!(p.auto_spawn);
        assert_eq!(p.spawn_y, 0.0);
        assert_eq!(p.spawn_interval(), 0.125);
        assert_eq!(p.pause_granularity, PauseGranularity::PerTick);
        assert!(p.is_within_bounds());
    }

    #[test]
    fn clamped_pulls_values_into_range() {
        let p = SpawnParameters {
            box_size: Vec2::new(0.0, 900.0),
            ball_diameter: -3.0,
            box_chance: 1.5,
            ..Default::default()
        };
        assert!(!p.is_within_bounds());

        let c = p.clamped();
        assert_eq!(c.box_size, Vec2::new(1.0, 256.0));
        assert_eq!(c.ball_diameter, 1.0);
        assert_eq!(c.box_chance, 1.0);
        assert!(c.is_within_bounds());
    }

    #[test]
    fn clamped_replaces_nan() {
        let p = SpawnParameters {
            box_chance: f64::NAN,
            ..Default::default()
        };
        assert_eq!(p.clamped().box_chance, 0.5);
    }

    #[test]
    fn missing_json_fields_take_defaults() {
        let p: SpawnParameters = serde_json::from_str(r#"{ "box_chance": 0.9 }"#).unwrap();
        assert_eq!(p.box_chance, 0.9);
        assert_eq!(p.ball_diameter, 24.0);
        assert!(p.auto_spawn);
    }
}
