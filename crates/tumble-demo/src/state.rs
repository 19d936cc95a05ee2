//! Session state shared by the spawn loop and the debug panel.

use rand::SeedableRng;
use rand_pcg::Pcg64;

use crate::panel::ScriptedUi;
use crate::params::SpawnParameters;

/// Application state handed to actions and frame callbacks by the tick loop.
#[derive(Debug, Clone)]
pub struct DemoState {
    /// Live spawn parameters, edited by the panel.
    pub params: SpawnParameters,
    /// Source of the box-vs-ball draws.
    pub rng: Pcg64,
    /// Input source for the debug panel.
    pub ui: ScriptedUi,
    /// Nodes created by the periodic loop.
    pub loop_spawns: u64,
    /// Nodes created by panel buttons.
    pub panel_spawns: u64,
}

impl DemoState {
    /// Fresh counters and an rng seeded with `seed`.
    pub fn new(params: SpawnParameters, seed: u64) -> Self {
        Self {
            params,
            rng: Pcg64::seed_from_u64(seed),
            ui: ScriptedUi::new(),
            loop_spawns: 0,
            panel_spawns: 0,
        }
    }
}

impl Default for DemoState {
    fn default() -> Self {
        Self::new(SpawnParameters::default(), 0)
    }
}
