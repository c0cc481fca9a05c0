use hud_core::{Easing, HudEngine, IntensityConfig};

/// Engine read-out refreshed once per frame, after the tick and before the
/// page callbacks run. Getters and key handlers read this instead of the
/// frame context, which stays borrowed for the whole frame.
#[derive(Clone, Debug, PartialEq)]
pub struct HudSnapshot {
    pub state: String,
    pub current_state: String,
    pub state_names: Vec<String>,
    pub easing: Easing,
    pub errors: u32,
    pub intensity: IntensityConfig,
}

impl HudSnapshot {
    pub fn capture(engine: &HudEngine) -> Self {
        Self {
            state: engine.target_state().to_string(),
            current_state: engine.current_state().to_string(),
            state_names: engine.registry().names().map(str::to_owned).collect(),
            easing: engine.controller().easing(),
            errors: engine.diagnostics().total(),
            intensity: engine.intensity_config(),
        }
    }

    /// The state table never changes, so names are kept from `capture`.
    pub fn refresh(&mut self, engine: &HudEngine) {
        self.state.clear();
        self.state.push_str(engine.target_state());
        self.current_state.clear();
        self.current_state.push_str(engine.current_state());
        self.easing = engine.controller().easing();
        self.errors = engine.diagnostics().total();
        self.intensity = engine.intensity_config();
    }

    /// State bound to digit key `n + 1`.
    pub fn nth_state(&self, n: usize) -> Option<&str> {
        self.state_names.get(n).map(String::as_str)
    }
}
