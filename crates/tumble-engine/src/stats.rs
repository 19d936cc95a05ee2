//! Stats overlay: running counters rendered as a few text lines.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tumble_scene::node::Shape;
use tumble_scene::world::World;

use crate::tick::TickDiagnostics;

/// Screen corner an overlay or panel is pinned to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

/// Counters refreshed after every tick.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub alignment: Corner,
    pub ticks: u64,
    pub sim_time: f64,
    pub live_nodes: usize,
    pub live_boxes: usize,
    pub live_balls: usize,
    pub attached_total: u64,
    pub detached_total: u64,
    pub contacts_total: u64,
    pub last_tick_time: Duration,
}

impl Stats {
    /// Pin the overlay to another corner.
    pub fn set_alignment(&mut self, alignment: Corner) {
        self.alignment = alignment;
    }

    /// Refresh from the world after tick `tick` finished.
    pub fn record(&mut self, tick: u64, sim_time: f64, world: &World, diag: &TickDiagnostics) {
        self.ticks = tick;
        self.sim_time = sim_time;
        self.live_nodes = world.len();
        self.live_boxes = world.count_dynamic(Shape::Rectangle);
        self.live_balls = world.count_dynamic(Shape::Circle);
        self.attached_total = world.attached_total();
        self.detached_total = world.detached_total();
        self.contacts_total += diag.contacts_started as u64;
        self.last_tick_time = diag.total_time;
    }

    /// Overlay text, one entry per line.
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("tick {} ({:.2}s)", self.ticks, self.sim_time),
            format!(
                "nodes {} (boxes {}, balls {})",
                self.live_nodes, self.live_boxes, self.live_balls
            ),
            format!(
                "spawned {} removed {}",
                self.attached_total, self.detached_total
            ),
            format!("contacts {}", self.contacts_total),
            format!("tick time {:.3}ms", self.last_tick_time.as_secs_f64() * 1000.0),
        ]
    }
}
