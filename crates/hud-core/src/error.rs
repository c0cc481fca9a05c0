use std::path::PathBuf;
use thiserror::Error;

/// Recoverable runtime errors. None of these stop the frame loop.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum HudError {
    #[error("unknown state `{name}` (known: {known})")]
    UnknownState { name: String, known: String },
    #[error("invalid delta time {0}; treated as 0")]
    InvalidDeltaTime(f32),
    #[error("renderer unavailable: {0}")]
    RendererUnavailable(String),
    #[error("intensity {0} outside [0, 2]")]
    IntensityOutOfRange(f32),
}

/// Errors raised while loading or validating a state table.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed state table: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("state table defines no states")]
    EmptyRegistry,
    #[error("state `{0}` defined more than once")]
    DuplicateState(String),
    #[error("default state `{0}` is not defined")]
    MissingDefaultState(String),
    #[error("state `{state}` has a non-finite `{field}`")]
    NonFiniteField { state: String, field: &'static str },
    #[error("transition duration {0} must be finite and positive")]
    InvalidDuration(f32),
}

/// Counters for the errors the engine absorbed, plus the most recent one.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    pub unknown_states: u32,
    pub invalid_deltas: u32,
    pub renderer_failures: u32,
    pub rejected_intensities: u32,
    pub last: Option<HudError>,
}

impl Diagnostics {
    pub fn record(&mut self, err: HudError) {
        let counter = match &err {
            HudError::UnknownState { .. } => &mut self.unknown_states,
            HudError::InvalidDeltaTime(_) => &mut self.invalid_deltas,
            HudError::RendererUnavailable(_) => &mut self.renderer_failures,
            HudError::IntensityOutOfRange(_) => &mut self.rejected_intensities,
        };
        *counter = counter.saturating_add(1);
        log::warn!("[hud] {err}");
        self.last = Some(err);
    }

    pub fn total(&self) -> u32 {
        self.unknown_states
            .saturating_add(self.invalid_deltas)
            .saturating_add(self.renderer_failures)
            .saturating_add(self.rejected_intensities)
    }
}
