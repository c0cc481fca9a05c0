use hud_core::{HudError, HudFrame, RendererAdapter};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsValue;

/// Page callback slot shared with `HudApp`, so the page can swap it while a
/// frame is running.
pub type JsHook = Rc<RefCell<Option<js_sys::Function>>>;

/// Hands each frame to a page callback as a plain JS object.
///
/// The scene graph stays on the JS side; without a callback frames are
/// dropped silently.
pub struct JsRenderer {
    callback: JsHook,
}

impl JsRenderer {
    pub fn new(callback: JsHook) -> Self {
        Self { callback }
    }
}

impl RendererAdapter for JsRenderer {
    fn apply(&mut self, frame: &HudFrame) -> Result<(), HudError> {
        // Cloned out so the callback may replace itself.
        let Some(callback) = self.callback.borrow().clone() else {
            return Ok(());
        };
        #[allow(deprecated)]
        let value = JsValue::from_serde(frame)
            .map_err(|e| HudError::RendererUnavailable(e.to_string()))?;
        callback
            .call1(&JsValue::NULL, &value)
            .map(|_| ())
            .map_err(|e| HudError::RendererUnavailable(format!("{:?}", e)))
    }
}
