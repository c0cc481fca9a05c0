use crate::audio::WebAmplitude;
use crate::constants::MAX_FRAME_DT_SECS;
use crate::renderer::{JsHook, JsRenderer};
use crate::snapshot::HudSnapshot;
use crate::status::DomStatus;
use hud_core::{
    AmplitudeSource, CommandSender, DriverEffect, HudEngine, PresenceDriver, PresenceEvent,
    StatusSink,
};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// Presence events raised by the page, applied at the next frame.
pub type EventQueue = Rc<RefCell<Vec<PresenceEvent>>>;

pub type SharedSnapshot = Rc<RefCell<HudSnapshot>>;

/// Filled by `enableMicrophone`; only borrowed while the engine ticks.
pub type MicSlot = Rc<RefCell<Option<WebAmplitude>>>;

pub struct FrameContext {
    pub engine: HudEngine,
    pub commands: CommandSender,
    pub driver: PresenceDriver,
    pub events: EventQueue,
    pub effects: Vec<DriverEffect>,
    pub renderer: JsRenderer,
    pub speak: JsHook,
    pub status: DomStatus,
    pub mic: MicSlot,
    pub snapshot: SharedSnapshot,
    pub last_instant: Instant,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_instant).as_secs_f32().min(MAX_FRAME_DT_SECS);
        self.last_instant = now;

        let pending: Vec<PresenceEvent> = self.events.borrow_mut().drain(..).collect();
        for event in pending {
            self.driver.handle(event, &mut self.effects);
        }
        self.driver.tick(dt, &mut self.effects);
        self.dispatch();

        let frame = {
            let mut mic = self.mic.borrow_mut();
            let source = mic.as_mut().map(|m| m as &mut dyn AmplitudeSource);
            self.engine.tick(dt, source)
        };
        self.snapshot.borrow_mut().refresh(&self.engine);
        let status: &mut dyn StatusSink = &mut self.status;
        self.engine.present(&frame, &mut self.renderer, Some(status));
    }

    /// Sends state effects to the engine and speech effects to the page.
    pub fn dispatch(&mut self) {
        while !self.effects.is_empty() {
            let batch: Vec<DriverEffect> = self.effects.drain(..).collect();
            for effect in batch {
                match effect {
                    DriverEffect::SetState(name) => {
                        self.commands.set_state(name);
                    }
                    DriverEffect::Speak(text) => {
                        if let Some(outcome) = self.say(&text) {
                            self.driver.handle(outcome, &mut self.effects);
                        }
                    }
                }
            }
        }
    }

    /// `None` means the page took the line; it reports progress through the
    /// speech callbacks.
    fn say(&self, text: &str) -> Option<PresenceEvent> {
        let Some(callback) = self.speak.borrow().clone() else {
            log::warn!("[speech] no speech handler registered");
            return Some(PresenceEvent::SpeechUnsupported);
        };
        match callback.call1(&JsValue::NULL, &JsValue::from_str(text)) {
            Ok(_) => {
                log::info!("[speech] \"{text}\"");
                None
            }
            Err(e) => {
                log::warn!("[speech] handler failed: {:?}", e);
                Some(PresenceEvent::SpeechFailed)
            }
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
