//! State tables loaded from TOML.
//!
//! A table names every state with its parameter bundle and sets the blend
//! duration, easing, modulator seed and the presence driver's state names.
//! Two tables ship embedded; a user file can replace either.

use crate::bundle::ParameterBundle;
use crate::constants::{DEFAULT_TRANSITION_SECS, ORBIT_PARTICLE_COUNT, ORBIT_SEED};
use crate::driver::PresenceStates;
use crate::easing::Easing;
use crate::error::ConfigError;
use crate::registry::StateRegistry;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

const ASSISTANT_TABLE: &str = include_str!("../config/assistant.toml");
const ZAIRO_TABLE: &str = include_str!("../config/zairo.toml");

/// Built-in state tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Preset {
    #[default]
    Assistant,
    Zairo,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::Assistant, Preset::Zairo];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Assistant => "assistant",
            Preset::Zairo => "zairo",
        }
    }

    pub fn source(self) -> &'static str {
        match self {
            Preset::Assistant => ASSISTANT_TABLE,
            Preset::Zairo => ZAIRO_TABLE,
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown preset `{s}` (expected assistant or zairo)"))
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub transition_secs: f32,
    pub easing: Easing,
    pub default_state: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            transition_secs: DEFAULT_TRANSITION_SECS,
            easing: Easing::default(),
            default_state: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModulationConfig {
    pub orbit_particles: usize,
    pub seed: u64,
}

impl Default for ModulationConfig {
    fn default() -> Self {
        Self {
            orbit_particles: ORBIT_PARTICLE_COUNT,
            seed: ORBIT_SEED,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateEntry {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub params: ParameterBundle,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HudConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub modulation: ModulationConfig,
    #[serde(default)]
    pub presence: PresenceStates,
    #[serde(default, rename = "state")]
    pub states: Vec<StateEntry>,
}

impl HudConfig {
    pub fn preset(preset: Preset) -> Result<Self, ConfigError> {
        Self::from_toml_str(preset.source())
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: HudConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        log::info!(
            "[config] loaded {} states from {}",
            config.states.len(),
            path.display()
        );
        Ok(config)
    }

    /// Loads `path` when given, falling back to `preset` if it is missing or
    /// malformed.
    pub fn load_or_preset(path: Option<&Path>, preset: Preset) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            match Self::from_path(path) {
                Ok(config) => return Ok(config),
                Err(e) => log::warn!("[config] ignoring {}: {e}", path.display()),
            }
        }
        log::info!("[config] using built-in `{preset}` table");
        Self::preset(preset)
    }

    /// Same fallback as `load_or_preset`, for tables that arrive as text
    /// (the browser has no file system).
    pub fn parse_or_preset(source: Option<&str>, preset: Preset) -> Result<Self, ConfigError> {
        if let Some(source) = source {
            match Self::from_toml_str(source) {
                Ok(config) => return Ok(config),
                Err(e) => log::warn!("[config] ignoring supplied table: {e}"),
            }
        }
        log::info!("[config] using built-in `{preset}` table");
        Self::preset(preset)
    }

    /// Checks everything `build_registry` would reject.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.build_registry().map(|registry| {
            let presence = &self.presence;
            for name in [&presence.idle, &presence.attentive, &presence.speaking] {
                if registry.resolve(name).is_err() {
                    log::warn!("[config] presence state `{name}` is not in the table");
                }
            }
        })
    }

    pub fn build_registry(&self) -> Result<StateRegistry, ConfigError> {
        let secs = self.engine.transition_secs;
        if !secs.is_finite() || secs <= 0.0 {
            return Err(ConfigError::InvalidDuration(secs));
        }
        let mut builder = StateRegistry::builder();
        for entry in &self.states {
            builder = builder.state(
                &entry.name,
                entry.label.as_deref().unwrap_or(""),
                entry.params,
            );
        }
        if let Some(name) = &self.engine.default_state {
            builder = builder.default_state(name);
        }
        builder.build()
    }
}
