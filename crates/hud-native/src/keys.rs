use hud_core::PresenceEvent;
use winit::keyboard::{Key, NamedKey};

pub const INTENSITY_STEP: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    /// Zero-based index into the state table.
    SelectState(usize),
    Presence(PresenceEvent),
    NudgeIntensity(f32),
    CycleEasing,
    Quit,
}

pub fn action_for_key(key: &Key) -> Option<Action> {
    match key {
        Key::Named(NamedKey::ArrowUp) => Some(Action::NudgeIntensity(INTENSITY_STEP)),
        Key::Named(NamedKey::ArrowDown) => Some(Action::NudgeIntensity(-INTENSITY_STEP)),
        Key::Named(NamedKey::Escape) => Some(Action::Quit),
        Key::Character(c) => action_for_char(c.as_str()),
        _ => None,
    }
}

fn action_for_char(key: &str) -> Option<Action> {
    let presence = |e| Some(Action::Presence(e));
    match key {
        "f" | "F" => presence(PresenceEvent::FaceDetected),
        "l" | "L" => presence(PresenceEvent::FaceLost),
        "s" | "S" => presence(PresenceEvent::SpeechEnded),
        "x" | "X" => presence(PresenceEvent::SpeechFailed),
        "r" | "R" => presence(PresenceEvent::Reset),
        "e" | "E" => Some(Action::CycleEasing),
        _ => match key.parse::<usize>() {
            Ok(n @ 1..=9) => Some(Action::SelectState(n - 1)),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(s: &str) -> Key {
        Key::Character(s.into())
    }

    #[test]
    fn digits_select_states_in_order() {
        assert_eq!(action_for_key(&ch("1")), Some(Action::SelectState(0)));
        assert_eq!(action_for_key(&ch("4")), Some(Action::SelectState(3)));
        assert_eq!(action_for_key(&ch("0")), None);
    }

    #[test]
    fn letters_drive_presence_events() {
        assert_eq!(
            action_for_key(&ch("f")),
            Some(Action::Presence(PresenceEvent::FaceDetected))
        );
        assert_eq!(
            action_for_key(&ch("L")),
            Some(Action::Presence(PresenceEvent::FaceLost))
        );
        assert_eq!(
            action_for_key(&ch("r")),
            Some(Action::Presence(PresenceEvent::Reset))
        );
        assert_eq!(action_for_key(&ch("q")), None);
    }

    #[test]
    fn arrows_nudge_intensity() {
        assert_eq!(
            action_for_key(&Key::Named(NamedKey::ArrowUp)),
            Some(Action::NudgeIntensity(INTENSITY_STEP))
        );
        assert_eq!(
            action_for_key(&Key::Named(NamedKey::ArrowDown)),
            Some(Action::NudgeIntensity(-INTENSITY_STEP))
        );
    }
}
