#![cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

mod app;
mod audio;
mod constants;
mod frame;
mod keyboard;
mod keymap;
mod renderer;
mod snapshot;
mod status;

pub use app::HudApp;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("hud-web starting");
    Ok(())
}
