//! Stand-in voice: logs the line and reports start/end after a duration
//! estimated from its length. Real synthesis is out of scope on desktop.

use hud_core::PresenceEvent;

const BASE_SECS: f32 = 0.4;
const SECS_PER_WORD: f32 = 0.35;

#[derive(Debug, Default)]
pub struct SimulatedSpeech {
    remaining: Option<f32>,
    disabled: bool,
}

impl SimulatedSpeech {
    pub fn new(enabled: bool) -> Self {
        Self {
            remaining: None,
            disabled: !enabled,
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.remaining.is_some()
    }

    /// Starts an utterance, replacing any in progress.
    pub fn speak(&mut self, text: &str) -> PresenceEvent {
        if self.disabled {
            log::warn!("[speech] synthesis disabled; not saying {text:?}");
            return PresenceEvent::SpeechUnsupported;
        }
        let words = text.split_whitespace().count() as f32;
        self.remaining = Some(BASE_SECS + words * SECS_PER_WORD);
        log::info!("[speech] \"{text}\"");
        PresenceEvent::SpeechStarted
    }

    pub fn tick(&mut self, dt: f32) -> Option<PresenceEvent> {
        let left = self.remaining.as_mut()?;
        *left -= dt.max(0.0);
        if *left > 0.0 {
            return None;
        }
        self.remaining = None;
        Some(PresenceEvent::SpeechEnded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ends_after_estimated_duration() {
        let mut s = SimulatedSpeech::new(true);
        assert_eq!(s.speak("hi there"), PresenceEvent::SpeechStarted);
        assert!(s.is_speaking());
        assert_eq!(s.tick(0.5), None);
        assert_eq!(s.tick(0.7), Some(PresenceEvent::SpeechEnded));
        assert!(!s.is_speaking());
        assert_eq!(s.tick(1.0), None);
    }

    #[test]
    fn disabled_reports_unsupported() {
        let mut s = SimulatedSpeech::new(false);
        assert_eq!(s.speak("hello"), PresenceEvent::SpeechUnsupported);
        assert!(!s.is_speaking());
    }
}
