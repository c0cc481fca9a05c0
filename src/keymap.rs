use crate::constants::*;

/// What a key press asks the HUD to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    /// Zero-based position in the state table.
    SelectState(usize),
    FaceDetected,
    FaceLost,
    SpeechEnded,
    ResetPresence,
    IntensityUp,
    IntensityDown,
    CycleEasing,
}

#[inline]
pub fn command_for_key(key: &str) -> Option<KeyCommand> {
    match key {
        "ArrowUp" => Some(KeyCommand::IntensityUp),
        "ArrowDown" => Some(KeyCommand::IntensityDown),
        "f" | "F" => Some(KeyCommand::FaceDetected),
        "l" | "L" => Some(KeyCommand::FaceLost),
        "s" | "S" => Some(KeyCommand::SpeechEnded),
        "r" | "R" => Some(KeyCommand::ResetPresence),
        "e" | "E" => Some(KeyCommand::CycleEasing),
        _ => state_hotkey(key).map(KeyCommand::SelectState),
    }
}

#[inline]
fn state_hotkey(key: &str) -> Option<usize> {
    let n: usize = key.parse().ok()?;
    (1..=MAX_STATE_HOTKEYS).contains(&n).then(|| n - 1)
}

/// Next intensity target after an arrow key, kept inside the accepted range.
#[inline]
pub fn nudged_intensity(target: f32, up: bool) -> f32 {
    let step = if up { INTENSITY_STEP } else { -INTENSITY_STEP };
    (target + step).clamp(INTENSITY_MIN, INTENSITY_MAX)
}
