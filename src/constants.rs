// Browser front-end tuning constants.
// Engine behaviour lives in `hud_core::constants`; these only cover how the
// page feeds it.

// DOM ids
pub const STATUS_ELEMENT_ID: &str = "status-text";

// WebAudio analyser
pub const ANALYSER_FFT_SIZE: u32 = 256;

// Longest step handed to the engine; hidden tabs stop rAF and resume with a
// single huge gap.
pub const MAX_FRAME_DT_SECS: f32 = 0.25;

// Keyboard intensity nudge, clamped to the engine's accepted range
pub const INTENSITY_STEP: f32 = 0.1;
pub use hud_core::constants::{INTENSITY_MAX, INTENSITY_MIN};

// Keys 1..=9 select states by position
pub const MAX_STATE_HOTKEYS: usize = 9;
