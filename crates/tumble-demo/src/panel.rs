//! The "Options" debug panel and the immediate-mode UI surface it draws on.
//!
//! [`draw_debug_panel`] is a stateless pass run once per frame. Each widget
//! call both declares the widget and reports this frame's interaction, the
//! way immediate-mode toolkits work. Buttons spawn synchronously inside the
//! pass; sliders and the checkbox write straight into [`SpawnParameters`].
//!
//! [`ScriptedUi`] is the headless backend: inputs are queued by label ahead
//! of time and consumed the next time a widget with that label is drawn.

use std::collections::HashMap;

use tumble_engine::stats::Corner;
use tumble_scene::node::Vec2;
use tumble_scene::world::World;

use crate::params::{SpawnParameters, MAX_SIZE, MIN_SIZE};
use crate::spawner::{spawn_many, SpawnKind};

pub const WINDOW_TITLE: &str = "Options";
pub const AUTO_SPAWN: &str = "Auto spawn";
pub const BOX_SIZE: &str = "Box size";
pub const BALL_SIZE: &str = "Ball size";
pub const BOX_CHANCE: &str = "Box chance";

/// Panel buttons: label, kind, how many to spawn.
pub const SPAWN_BUTTONS: [(&str, SpawnKind, usize); 6] = [
    ("Spawn 1 box", SpawnKind::Box, 1),
    ("Spawn 25 boxes", SpawnKind::Box, 25),
    ("Spawn 100 boxes", SpawnKind::Box, 100),
    ("Spawn 1 ball", SpawnKind::Ball, 1),
    ("Spawn 25 balls", SpawnKind::Ball, 25),
    ("Spawn 100 balls", SpawnKind::Ball, 100),
];

// ---------------------------------------------------------------------------
// UI surface
// ---------------------------------------------------------------------------

/// The immediate-mode calls the panel needs.
///
/// Interactive widgets return `true` when the user changed or pressed them
/// this frame.
pub trait PanelUi {
    fn begin_window(&mut self, title: &str, corner: Corner);
    fn end_window(&mut self);
    fn button(&mut self, label: &str) -> bool;
    fn checkbox(&mut self, label: &str, value: &mut bool) -> bool;
    fn slider(&mut self, label: &str, value: &mut f64, min: f64, max: f64) -> bool;
    fn slider_vec2(&mut self, label: &str, value: &mut Vec2, min: f64, max: f64) -> bool;
    fn spacing(&mut self);
    fn separator(&mut self);
}

// ---------------------------------------------------------------------------
// Panel
// ---------------------------------------------------------------------------

/// What one panel pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelOutcome {
    pub boxes_spawned: usize,
    pub balls_spawned: usize,
    pub params_changed: bool,
}

impl PanelOutcome {
    pub fn spawned(&self) -> usize {
        self.boxes_spawned + self.balls_spawned
    }
}

/// Draw the panel once and act on this frame's input.
pub fn draw_debug_panel<U: PanelUi + ?Sized>(
    ui: &mut U,
    world: &mut World,
    params: &mut SpawnParameters,
) -> PanelOutcome {
    let mut outcome = PanelOutcome::default();

    ui.begin_window(WINDOW_TITLE, Corner::BottomLeft);

    for (i, (label, kind, count)) in SPAWN_BUTTONS.iter().enumerate() {
        if i == 3 {
            ui.spacing();
        }
        if ui.button(label) {
            let spawned = spawn_many(world, params, *kind, *count).len();
            match kind {
                SpawnKind::Box => outcome.boxes_spawned += spawned,
                SpawnKind::Ball => outcome.balls_spawned += spawned,
            }
        }
    }

    ui.separator();

    let mut changed = ui.checkbox(AUTO_SPAWN, &mut params.auto_spawn);
    changed |= ui.slider_vec2(BOX_SIZE, &mut params.box_size, MIN_SIZE, MAX_SIZE);
    changed |= ui.slider(BALL_SIZE, &mut params.ball_diameter, MIN_SIZE, MAX_SIZE);
    changed |= ui.slider(BOX_CHANCE, &mut params.box_chance, 0.0, 1.0);
    outcome.params_changed = changed;

    ui.end_window();

    if changed {
        tracing::debug!(?params, "spawn parameters changed from panel");
    }
    outcome
}

// ---------------------------------------------------------------------------
// ScriptedUi
// ---------------------------------------------------------------------------

/// A widget as the scripted backend recorded it.
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    Window { title: String, corner: Corner },
    WindowEnd,
    Button(String),
    Checkbox(String, bool),
    Slider(String, f64),
    SliderVec2(String, Vec2),
    Spacing,
    Separator,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Input {
    Press,
    Check(bool),
    Scalar(f64),
    Pair(Vec2),
}

/// Headless [`PanelUi`] driven by queued inputs.
///
/// Slider inputs are clamped to the widget's range when consumed, like a
/// dragged slider would be.
#[derive(Debug, Clone, Default)]
pub struct ScriptedUi {
    pending: HashMap<String, Input>,
    recorded: Vec<Widget>,
}

impl ScriptedUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Press the button `label` on the next frame.
    pub fn press(&mut self, label: &str) {
        self.pending.insert(label.to_owned(), Input::Press);
    }

    /// Set the checkbox `label` to `value` on the next frame.
    pub fn set_checkbox(&mut self, label: &str, value: bool) {
        self.pending.insert(label.to_owned(), Input::Check(value));
    }

    /// Drag the scalar slider `label` to `value` on the next frame.
    pub fn set_slider(&mut self, label: &str, value: f64) {
        self.pending.insert(label.to_owned(), Input::Scalar(value));
    }

    /// Drag the two-component slider `label` to `value` on the next frame.
    pub fn set_slider_vec2(&mut self, label: &str, value: Vec2) {
        self.pending.insert(label.to_owned(), Input::Pair(value));
    }

    /// Inputs not yet consumed by a widget.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Widgets drawn since the last call, in draw order.
    pub fn take_recorded(&mut self) -> Vec<Widget> {
        std::mem::take(&mut self.recorded)
    }
}

impl PanelUi for ScriptedUi {
    fn begin_window(&mut self, title: &str, corner: Corner) {
        self.recorded.push(Widget::Window {
            title: title.to_owned(),
            corner,
        });
    }

    fn end_window(&mut self) {
        self.recorded.push(Widget::WindowEnd);
    }

    fn button(&mut self, label: &str) -> bool {
        self.recorded.push(Widget::Button(label.to_owned()));
        matches!(self.pending.remove(label), Some(Input::Press))
    }

    fn checkbox(&mut self, label: &str, value: &mut bool) -> bool {
        let changed = match self.pending.remove(label) {
            Some(Input::Check(v)) if v != *value => {
                *value = v;
                true
            }
            _ => false,
        };
        self.recorded.push(Widget::Checkbox(label.to_owned(), *value));
        changed
    }

    fn slider(&mut self, label: &str, value: &mut f64, min: f64, max: f64) -> bool {
        let changed = match self.pending.remove(label) {
            Some(Input::Scalar(v)) => {
                let v = v.clamp(min, max);
                let changed = v != *value;
                *value = v;
                changed
            }
            _ => false,
        };
        self.recorded.push(Widget::Slider(label.to_owned(), *value));
        changed
    }

    fn slider_vec2(&mut self, label: &str, value: &mut Vec2, min: f64, max: f64) -> bool {
        let changed = match self.pending.remove(label) {
            Some(Input::Pair(v)) => {
                let v = Vec2::new(v.x.clamp(min, max), v.y.clamp(min, max));
                let changed = v != *value;
                *value = v;
                changed
            }
            _ => false,
        };
        self.recorded.push(Widget::SliderVec2(label.to_owned(), *value));
        changed
    }

    fn spacing(&mut self) {
        self.recorded.push(Widget::Spacing);
    }

    fn separator(&mut self) {
        self.recorded.push(Widget::Separator);
    }
}
