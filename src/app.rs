use crate::audio;
use crate::frame::{self, EventQueue, FrameContext, MicSlot, SharedSnapshot};
use crate::keyboard;
use crate::renderer::{JsHook, JsRenderer};
use crate::snapshot::HudSnapshot;
use crate::status::DomStatus;
use hud_core::{CommandSender, Easing, HudConfig, HudEngine, PresenceDriver, PresenceEvent, Preset};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Page-facing handle: state and intensity control, detection and speech
/// notifications, and the frame/speech callbacks.
///
/// Mutating calls are queued and applied at the start of the next frame.
/// Getters read the snapshot taken after the last tick. Neither touches the
/// frame context, so every call is safe from inside the callbacks.
#[wasm_bindgen]
pub struct HudApp {
    ctx: Rc<RefCell<FrameContext>>,
    commands: CommandSender,
    events: EventQueue,
    snapshot: SharedSnapshot,
    on_frame: JsHook,
    on_speak: JsHook,
    mic: MicSlot,
    started: bool,
}

#[wasm_bindgen]
impl HudApp {
    /// `preset` is `"assistant"` (default) or `"zairo"`; `config_toml`
    /// replaces it when it parses and validates.
    #[wasm_bindgen(constructor)]
    pub fn new(preset: Option<String>, config_toml: Option<String>) -> Result<HudApp, JsValue> {
        let preset = match preset {
            Some(name) => name.parse::<Preset>().map_err(js_err)?,
            None => Preset::default(),
        };
        let config = HudConfig::parse_or_preset(config_toml.as_deref(), preset).map_err(js_err)?;
        let engine = HudEngine::new(&config).map_err(js_err)?;
        let commands = engine.command_sender();

        let document = web::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let events: EventQueue = Rc::new(RefCell::new(Vec::new()));
        let snapshot: SharedSnapshot = Rc::new(RefCell::new(HudSnapshot::capture(&engine)));
        let on_frame: JsHook = Rc::new(RefCell::new(None));
        let on_speak: JsHook = Rc::new(RefCell::new(None));
        let mic: MicSlot = Rc::new(RefCell::new(None));
        log::info!(
            "[hud] states: {}",
            engine.registry().names().collect::<Vec<_>>().join(", ")
        );

        let ctx = FrameContext {
            engine,
            commands: commands.clone(),
            driver: PresenceDriver::new(config.presence.clone()),
            events: events.clone(),
            effects: Vec::new(),
            renderer: JsRenderer::new(on_frame.clone()),
            speak: on_speak.clone(),
            status: DomStatus::new(&document),
            mic: mic.clone(),
            snapshot: snapshot.clone(),
            last_instant: Instant::now(),
        };
        Ok(HudApp {
            ctx: Rc::new(RefCell::new(ctx)),
            commands,
            events,
            snapshot,
            on_frame,
            on_speak,
            mic,
            started: false,
        })
    }

    /// Starts the animation loop and keyboard shortcuts. Repeated calls are
    /// ignored.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        if let Ok(mut ctx) = self.ctx.try_borrow_mut() {
            ctx.last_instant = Instant::now();
        }
        keyboard::wire_global_keydown(
            self.snapshot.clone(),
            self.commands.clone(),
            self.events.clone(),
        );
        frame::start_loop(self.ctx.clone());
        log::info!("[hud] started");
    }

    /// Unknown names are logged and counted, never thrown.
    #[wasm_bindgen(js_name = setState)]
    pub fn set_state(&self, name: String) {
        self.commands.set_state(name);
    }

    /// Values outside `[0, 2]` are logged and counted, never thrown.
    #[wasm_bindgen(js_name = setIntensity)]
    pub fn set_intensity(&self, value: f32) {
        self.commands.set_intensity(value);
    }

    #[wasm_bindgen(js_name = setEasing)]
    pub fn set_easing(&self, name: &str) -> Result<(), JsValue> {
        let easing: Easing = name.parse().map_err(js_err)?;
        self.commands.set_easing(easing);
        Ok(())
    }

    /// Invalid durations fall back to the default with a warning.
    #[wasm_bindgen(js_name = setTransitionDuration)]
    pub fn set_transition_duration(&self, secs: f32) {
        self.commands.set_duration(secs);
    }

    #[wasm_bindgen(js_name = simulateFaceDetection)]
    pub fn simulate_face_detection(&self) {
        self.push(PresenceEvent::FaceDetected);
    }

    #[wasm_bindgen(js_name = faceLost)]
    pub fn face_lost(&self) {
        self.push(PresenceEvent::FaceLost);
    }

    #[wasm_bindgen(js_name = resetFaceDetection)]
    pub fn reset_face_detection(&self) {
        self.push(PresenceEvent::Reset);
    }

    #[wasm_bindgen(js_name = speechStarted)]
    pub fn speech_started(&self) {
        self.push(PresenceEvent::SpeechStarted);
    }

    #[wasm_bindgen(js_name = speechEnded)]
    pub fn speech_ended(&self) {
        self.push(PresenceEvent::SpeechEnded);
    }

    #[wasm_bindgen(js_name = speechFailed)]
    pub fn speech_failed(&self) {
        self.push(PresenceEvent::SpeechFailed);
    }

    /// `callback(frame)` receives every frame as a plain object.
    #[wasm_bindgen(js_name = onFrame)]
    pub fn on_frame(&self, callback: Option<js_sys::Function>) {
        *self.on_frame.borrow_mut() = callback;
    }

    /// `callback(text)` should speak the line and report back through
    /// `speechStarted` / `speechEnded` / `speechFailed`. Without one the
    /// greeting is treated as unsupported.
    #[wasm_bindgen(js_name = onSpeak)]
    pub fn on_speak(&self, callback: Option<js_sys::Function>) {
        *self.on_speak.borrow_mut() = callback;
    }

    /// Hooks the microphone into the amplitude signal. Browsers only allow
    /// this after a user gesture.
    #[wasm_bindgen(js_name = enableMicrophone)]
    pub fn enable_microphone(&self) -> Result<bool, JsValue> {
        let mut mic = self.mic.borrow_mut();
        if mic.is_some() {
            return Ok(true);
        }
        let audio_ctx = web::AudioContext::new()?;
        _ = audio_ctx.resume();
        *mic = audio::open_microphone(&audio_ctx);
        Ok(mic.is_some())
    }

    #[wasm_bindgen(js_name = microphoneConnected)]
    pub fn microphone_connected(&self) -> bool {
        self.mic
            .borrow()
            .as_ref()
            .is_some_and(|m| m.is_connected())
    }

    /// As of the last frame.
    #[wasm_bindgen(js_name = getIntensityConfig)]
    pub fn intensity_config(&self) -> Result<JsValue, JsValue> {
        #[allow(deprecated)]
        JsValue::from_serde(&self.snapshot.borrow().intensity).map_err(js_err)
    }

    /// State being shown or blended toward.
    pub fn state(&self) -> String {
        self.snapshot.borrow().state.clone()
    }

    /// Last state the blend settled in.
    #[wasm_bindgen(js_name = currentState)]
    pub fn current_state(&self) -> String {
        self.snapshot.borrow().current_state.clone()
    }

    #[wasm_bindgen(js_name = stateNames)]
    pub fn state_names(&self) -> js_sys::Array {
        self.snapshot
            .borrow()
            .state_names
            .iter()
            .map(|name| JsValue::from_str(name))
            .collect()
    }

    /// Number of rejected requests and renderer failures so far.
    #[wasm_bindgen(js_name = errorCount)]
    pub fn error_count(&self) -> u32 {
        self.snapshot.borrow().errors
    }

    pub fn easing(&self) -> String {
        self.snapshot.borrow().easing.to_string()
    }
}

impl HudApp {
    fn push(&self, event: PresenceEvent) {
        self.events.borrow_mut().push(event);
    }
}
