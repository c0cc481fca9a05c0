//! Detection and speech sequencing.
//!
//! Turns presence events (face seen, face lost, speech finished...) into
//! state requests with the delays the HUD uses between them. Time only moves
//! through `tick`, so the whole sequence is deterministic under test.

use crate::command::HudCommand;
use crate::constants::*;
use serde::Deserialize;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresenceEvent {
    FaceDetected,
    FaceLost,
    SpeechStarted,
    SpeechEnded,
    SpeechFailed,
    SpeechUnsupported,
    Reset,
}

/// Work the front-end must carry out for the driver.
#[derive(Clone, Debug, PartialEq)]
pub enum DriverEffect {
    SetState(String),
    Speak(String),
}

impl DriverEffect {
    /// The engine command for state effects; speech is the front-end's job.
    pub fn into_command(self) -> Option<HudCommand> {
        match self {
            DriverEffect::SetState(name) => Some(HudCommand::SetState(name)),
            DriverEffect::Speak(_) => None,
        }
    }
}

/// State names the driver requests, plus the greeting line.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PresenceStates {
    pub idle: String,
    pub attentive: String,
    pub speaking: String,
    pub greeting: String,
}

impl Default for PresenceStates {
    fn default() -> Self {
        Self {
            idle: "idle".into(),
            attentive: "active".into(),
            speaking: "speaking".into(),
            greeting: "Hi, I'm online.".into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerKind {
    Greet,
    ReturnToRest,
}

#[derive(Clone, Copy, Debug)]
struct Timer {
    kind: TimerKind,
    remaining: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PresenceDriver {
    states: PresenceStates,
    face_present: bool,
    greeted: bool,
    greeting_in_flight: bool,
    timers: SmallVec<[Timer; 2]>,
}

impl PresenceDriver {
    pub fn new(states: PresenceStates) -> Self {
        Self {
            states,
            ..Self::default()
        }
    }

    pub fn states(&self) -> &PresenceStates {
        &self.states
    }

    pub fn face_present(&self) -> bool {
        self.face_present
    }

    pub fn greeted(&self) -> bool {
        self.greeted
    }

    pub fn has_pending(&self) -> bool {
        !self.timers.is_empty()
    }

    pub fn handle(&mut self, event: PresenceEvent, out: &mut Vec<DriverEffect>) {
        log::debug!("[driver] {event:?}");
        match event {
            PresenceEvent::FaceDetected => {
                if self.face_present {
                    return;
                }
                self.face_present = true;
                out.push(self.set(&self.states.attentive));
                if !self.greeted && !self.greeting_in_flight {
                    log::info!("[driver] face detected; greeting shortly");
                    self.schedule(TimerKind::Greet, GREETING_DELAY_SECS);
                }
            }
            PresenceEvent::FaceLost => {
                if !self.face_present {
                    return;
                }
                log::info!("[driver] face lost");
                self.clear_presence();
                out.push(self.set(&self.states.idle));
            }
            PresenceEvent::SpeechStarted => out.push(self.set(&self.states.speaking)),
            PresenceEvent::SpeechEnded => self.finish_speech(SPEECH_RETURN_DELAY_SECS),
            PresenceEvent::SpeechFailed | PresenceEvent::SpeechUnsupported => {
                log::warn!("[driver] speech unavailable ({event:?}); holding visual feedback");
                self.finish_speech(SPEECH_FAILURE_HOLD_SECS);
            }
            PresenceEvent::Reset => {
                self.clear_presence();
                out.push(self.set(&self.states.idle));
            }
        }
    }

    /// Advance pending delays by `dt` seconds and emit whatever fires.
    pub fn tick(&mut self, dt: f32, out: &mut Vec<DriverEffect>) {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        let mut fired: SmallVec<[TimerKind; 2]> = SmallVec::new();
        self.timers.retain(|t| {
            t.remaining -= dt;
            if t.remaining <= 0.0 {
                fired.push(t.kind);
                false
            } else {
                true
            }
        });
        for kind in fired {
            match kind {
                TimerKind::Greet => {
                    self.greeting_in_flight = true;
                    out.push(self.set(&self.states.speaking));
                    out.push(DriverEffect::Speak(self.states.greeting.clone()));
                }
                TimerKind::ReturnToRest => {
                    let rest = if self.face_present {
                        &self.states.attentive
                    } else {
                        &self.states.idle
                    };
                    out.push(self.set(rest));
                }
            }
        }
    }

    fn finish_speech(&mut self, delay: f32) {
        if self.greeting_in_flight {
            self.greeting_in_flight = false;
            self.greeted = true;
        }
        self.schedule(TimerKind::ReturnToRest, delay);
    }

    fn clear_presence(&mut self) {
        self.face_present = false;
        self.greeted = false;
        self.greeting_in_flight = false;
        self.timers.clear();
    }

    /// Replaces any pending timer of the same kind.
    fn schedule(&mut self, kind: TimerKind, delay: f32) {
        self.timers.retain(|t| t.kind != kind);
        self.timers.push(Timer {
            kind,
            remaining: delay,
        });
    }

    fn set(&self, name: &str) -> DriverEffect {
        DriverEffect::SetState(name.to_string())
    }
}
